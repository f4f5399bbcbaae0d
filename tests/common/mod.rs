#![allow(dead_code)]

use chrono::NaiveDate;
use coinbeta::domain::error::CoinbetaError;
pub use coinbeta::domain::series::{PricePoint, PriceSeries};
use coinbeta::ports::data_port::DataPort;
use std::collections::HashMap;

/// In-memory data port. Unknown tickers yield an empty series, matching
/// the provider contract.
pub struct MockDataPort {
    pub data: HashMap<String, PriceSeries>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.ticker.clone(), series);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch(
        &self,
        ticker: &str,
        _start: NaiveDate,
        _end: NaiveDate,
        _refresh: bool,
    ) -> Result<PriceSeries, CoinbetaError> {
        Ok(self
            .data
            .get(ticker)
            .cloned()
            .unwrap_or_else(|| PriceSeries::empty(ticker)))
    }

    fn cached_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CoinbetaError> {
        match self.data.get(ticker) {
            Some(series) if !series.is_empty() => Ok(Some((
                series.first_date().expect("non-empty"),
                series.last_date().expect("non-empty"),
                series.len(),
            ))),
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily series starting at `start`, one point per price.
pub fn make_series(ticker: &str, start: &str, prices: &[f64]) -> PriceSeries {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            price,
            volume: 1000.0,
        })
        .collect();
    PriceSeries::new(ticker, points)
}
