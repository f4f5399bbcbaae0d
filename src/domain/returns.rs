//! Percentage return series.
//!
//! R[0] is undefined (no prior observation); R[i] = P[i]/P[i-1] - 1 for
//! i >= 1. Results are returned as new [`DerivedSeries`] values, never
//! injected back into the source series.

use crate::domain::error::CoinbetaError;
use crate::domain::series::{DerivedPoint, DerivedSeries, PriceSeries};

/// Daily percentage returns of a price series, named "returns".
///
/// Fails with [`CoinbetaError::PricesUnavailable`] on an empty series —
/// never silently returns an empty result.
pub fn price_returns(series: &PriceSeries) -> Result<DerivedSeries, CoinbetaError> {
    if series.is_empty() {
        return Err(CoinbetaError::PricesUnavailable {
            ticker: series.ticker.clone(),
        });
    }
    let source = DerivedSeries::from_prices("price", series);
    Ok(pct_change("returns", &source.points))
}

/// Percentage returns of a derived series (e.g. a USD price column).
///
/// `ticker` labels the unavailable-data error; `name` names the result.
pub fn derived_returns(
    ticker: &str,
    source: &DerivedSeries,
    name: &str,
) -> Result<DerivedSeries, CoinbetaError> {
    if source.is_empty() {
        return Err(CoinbetaError::PricesUnavailable {
            ticker: ticker.to_string(),
        });
    }
    Ok(pct_change(name, &source.points))
}

/// R[i] is valid iff i >= 1 and both P[i] and P[i-1] are valid.
fn pct_change(name: &str, points: &[DerivedPoint]) -> DerivedSeries {
    let mut values = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        let (valid, value) = if i == 0 {
            (false, 0.0)
        } else {
            let prev = &points[i - 1];
            if point.valid && prev.valid {
                (true, point.value / prev.value - 1.0)
            } else {
                (false, 0.0)
            }
        };
        values.push(DerivedPoint {
            date: point.date,
            valid,
            value,
        });
    }
    DerivedSeries {
        name: name.to_string(),
        points: values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                price,
                volume: 1000.0,
            })
            .collect();
        PriceSeries::new("TEST", points)
    }

    #[test]
    fn returns_first_point_undefined() {
        let series = make_series(&[100.0, 110.0, 121.0]);
        let returns = price_returns(&series).unwrap();

        assert_eq!(returns.len(), 3);
        assert!(!returns.points[0].valid);
        assert!(returns.points[1].valid);
        assert!(returns.points[2].valid);
        assert_relative_eq!(returns.points[1].value, 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns.points[2].value, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn returns_empty_series_fails() {
        let series = PriceSeries::empty("ETH");
        let err = price_returns(&series).unwrap_err();
        assert!(matches!(
            err,
            CoinbetaError::PricesUnavailable { ticker } if ticker == "ETH"
        ));
    }

    #[test]
    fn returns_single_point_has_no_valid_values() {
        let series = make_series(&[100.0]);
        let returns = price_returns(&series).unwrap();
        assert_eq!(returns.len(), 1);
        assert!(returns.valid_values().is_empty());
    }

    #[test]
    fn derived_returns_skips_invalid_neighbours() {
        let series = make_series(&[100.0, 110.0, 121.0]);
        let mut source = DerivedSeries::from_prices("usd_price", &series);
        source.points[1].valid = false;

        let returns = derived_returns("ETH", &source, "usd_returns").unwrap();
        assert!(!returns.points[0].valid);
        assert!(!returns.points[1].valid);
        assert!(!returns.points[2].valid);
    }

    #[test]
    fn derived_returns_empty_fails() {
        let source = DerivedSeries {
            name: "usd_price".into(),
            points: vec![],
        };
        let err = derived_returns("ETH", &source, "usd_returns").unwrap_err();
        assert!(matches!(err, CoinbetaError::PricesUnavailable { .. }));
    }

    proptest! {
        #[test]
        fn returns_match_ratio_of_consecutive_prices(
            prices in prop::collection::vec(1.0e-3..1.0e6f64, 1..50)
        ) {
            let series = make_series(&prices);
            let returns = price_returns(&series).unwrap();

            prop_assert_eq!(returns.len(), series.len());
            prop_assert!(!returns.points[0].valid);
            for i in 1..prices.len() {
                let expected = prices[i] / prices[i - 1] - 1.0;
                prop_assert!((returns.points[i].value - expected).abs() < 1e-9);
            }
        }
    }
}
