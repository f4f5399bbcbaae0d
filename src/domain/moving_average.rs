//! Simple moving average.
//!
//! SMA(w)[i] = mean(P[i-w+1..=i]). Warmup: the first (w-1) points are
//! invalid.

use crate::domain::series::{DerivedPoint, DerivedSeries};

/// Simple moving average over a derived series, named "<window>-day".
///
/// A point is valid only when the full window behind it is valid. A zero
/// window produces an all-invalid series.
pub fn simple_moving_average(source: &DerivedSeries, window: usize) -> DerivedSeries {
    let warmup = window.saturating_sub(1);
    let mut points = Vec::with_capacity(source.len());

    for (i, point) in source.points.iter().enumerate() {
        let in_range = window > 0 && i >= warmup;
        let value = if in_range {
            let start = i + 1 - window;
            let slice = &source.points[start..=i];
            if slice.iter().all(|p| p.valid) {
                Some(slice.iter().map(|p| p.value).sum::<f64>() / window as f64)
            } else {
                None
            }
        } else {
            None
        };

        points.push(DerivedPoint {
            date: point.date,
            valid: value.is_some(),
            value: value.unwrap_or(0.0),
        });
    }

    DerivedSeries {
        name: format!("{}-day", window),
        points,
    }
}
