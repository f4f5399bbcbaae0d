//! Price series representation.

use chrono::NaiveDate;

/// One daily observation: trade-volume-weighted average price plus volume.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: f64,
}

/// Ordered daily price history for one ticker.
///
/// Dates are strictly increasing with no duplicates. An empty series means
/// the data source had nothing for the requested range.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub ticker: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw points, sorting by date and dropping
    /// duplicate dates (first observation wins).
    pub fn new(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// A single point in a derived series. `valid = false` marks points with no
/// defined value (first return, moving-average warmup).
#[derive(Debug, Clone)]
pub struct DerivedPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

/// A named numeric sequence aligned index-for-index with the series it was
/// derived from.
#[derive(Debug, Clone)]
pub struct DerivedSeries {
    pub name: String,
    pub points: Vec<DerivedPoint>,
}

impl DerivedSeries {
    /// Wrap the price column of a series as an all-valid derived series.
    pub fn from_prices(name: impl Into<String>, series: &PriceSeries) -> Self {
        Self {
            name: name.into(),
            points: series
                .points
                .iter()
                .map(|p| DerivedPoint {
                    date: p.date,
                    valid: true,
                    value: p.price,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values of the defined points, in order.
    pub fn valid_values(&self) -> Vec<f64> {
        self.points
            .iter()
            .filter(|p| p.valid)
            .map(|p| p.value)
            .collect()
    }
}
