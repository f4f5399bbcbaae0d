//! Chart rendering port trait.

use crate::domain::error::CoinbetaError;
use crate::domain::ohlc::OhlcBucket;
use crate::domain::series::DerivedSeries;

/// What to draw. Line charts take any number of named derived series;
/// candlestick charts take pre-resampled OHLC buckets.
pub enum ChartSpec<'a> {
    Lines {
        title: &'a str,
        series: Vec<&'a DerivedSeries>,
    },
    Candlestick {
        title: &'a str,
        buckets: &'a [OhlcBucket],
    },
}

/// Port for rendering charts. Returns the rendered document; the caller
/// decides where it goes.
pub trait ChartPort {
    fn render(&self, spec: &ChartSpec) -> Result<String, CoinbetaError>;
}
