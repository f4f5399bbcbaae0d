//! Data access port trait.

use crate::domain::error::CoinbetaError;
use crate::domain::series::PriceSeries;
use chrono::NaiveDate;

/// Supplies daily price history for a ticker.
///
/// Unavailability (network down, unknown ticker, empty range) is signalled
/// by an **empty** series, never an error — the analyzers convert empty
/// into [`CoinbetaError::PricesUnavailable`]. Errors are reserved for
/// local faults such as an unreadable cache.
pub trait DataPort {
    /// Fetch daily prices. `refresh = true` bypasses any cache.
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        refresh: bool,
    ) -> Result<PriceSeries, CoinbetaError>;

    /// Date range and observation count held in the local cache, if any.
    fn cached_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CoinbetaError>;
}
