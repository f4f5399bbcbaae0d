//! Cache-first data provider.
//!
//! Composes the CSV cache and the HTTP client into the [`DataPort`]
//! contract: cache hit unless `refresh`, write-back on a successful remote
//! fetch, and a stale cache as last resort when the remote has nothing.

use crate::adapters::csv_cache::CsvCacheAdapter;
use crate::adapters::http_provider::HttpPriceClient;
use crate::domain::error::CoinbetaError;
use crate::domain::series::PriceSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use tracing::{debug, warn};

pub struct CachingProvider {
    cache: CsvCacheAdapter,
    remote: HttpPriceClient,
}

impl CachingProvider {
    pub fn new(cache: CsvCacheAdapter, remote: HttpPriceClient) -> Self {
        Self { cache, remote }
    }

    fn cached_non_empty(&self, ticker: &str) -> Result<Option<PriceSeries>, CoinbetaError> {
        Ok(self.cache.load(ticker)?.filter(|s| !s.is_empty()))
    }
}

impl DataPort for CachingProvider {
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        refresh: bool,
    ) -> Result<PriceSeries, CoinbetaError> {
        if !refresh {
            if let Some(series) = self.cached_non_empty(ticker)? {
                debug!("cache hit for {} ({} observations)", ticker, series.len());
                return Ok(series);
            }
        }

        let fetched = self.remote.fetch_series(ticker, start, end);
        if !fetched.is_empty() {
            self.cache.store(&fetched)?;
            return Ok(fetched);
        }

        // The remote had nothing; a stale cache beats no data at all.
        if refresh {
            if let Some(series) = self.cached_non_empty(ticker)? {
                warn!("remote fetch failed, using stale cache for {}", ticker);
                return Ok(series);
            }
        }

        Ok(PriceSeries::empty(ticker.to_uppercase()))
    }

    fn cached_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CoinbetaError> {
        self.cache.range(ticker)
    }
}
