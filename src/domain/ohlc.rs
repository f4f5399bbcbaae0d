//! OHLC resampling for candlestick rendering.

use crate::domain::series::PriceSeries;
use chrono::NaiveDate;

/// An N-day open-high-low-close summary of a price series.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcBucket {
    pub start: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Resample a price series into consecutive `bucket_days`-day calendar
/// buckets anchored at the first observation. Open/close are the first and
/// last prices in the bucket, high/low the extremes, volume the sum. The
/// trailing partial bucket is kept.
pub fn resample_ohlc(series: &PriceSeries, bucket_days: u32) -> Vec<OhlcBucket> {
    let Some(anchor) = series.first_date() else {
        return Vec::new();
    };
    if bucket_days == 0 {
        return Vec::new();
    }

    let mut buckets: Vec<OhlcBucket> = Vec::new();
    let mut current_index: Option<i64> = None;

    for point in &series.points {
        let index = (point.date - anchor).num_days() / bucket_days as i64;
        match buckets.last_mut() {
            Some(bucket) if current_index == Some(index) => {
                bucket.high = bucket.high.max(point.price);
                bucket.low = bucket.low.min(point.price);
                bucket.close = point.price;
                bucket.volume += point.volume;
            }
            _ => {
                buckets.push(OhlcBucket {
                    start: anchor + chrono::Duration::days(index * bucket_days as i64),
                    open: point.price,
                    high: point.price,
                    low: point.price,
                    close: point.price,
                    volume: point.volume,
                });
                current_index = Some(index);
            }
        }
    }

    buckets
}
