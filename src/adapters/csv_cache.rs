//! On-disk CSV price cache.
//!
//! One `<TICKER>.csv` per ticker under the cache directory, with
//! `date,price,volume` rows. A corrupt or missing file is a cache miss,
//! not an error.

use crate::domain::error::CoinbetaError;
use crate::domain::series::{PricePoint, PriceSeries};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

pub struct CsvCacheAdapter {
    cache_dir: PathBuf,
}

impl CsvCacheAdapter {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.csv", ticker.to_uppercase()))
    }

    /// Load the cached series for a ticker, or `None` on a miss.
    pub fn load(&self, ticker: &str) -> Result<Option<PriceSeries>, CoinbetaError> {
        let path = self.csv_path(ticker);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Ok(None),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let Some(point) = result.ok().and_then(|record| parse_row(&record)) else {
                warn!(
                    "discarding corrupt cache file {} for {}",
                    path.display(),
                    ticker
                );
                return Ok(None);
            };
            points.push(point);
        }

        Ok(Some(PriceSeries::new(ticker.to_uppercase(), points)))
    }

    /// Write a series to the cache, replacing any previous file.
    pub fn store(&self, series: &PriceSeries) -> Result<(), CoinbetaError> {
        fs::create_dir_all(&self.cache_dir)?;

        let path = self.csv_path(&series.ticker);
        let mut wtr = csv::Writer::from_path(&path).map_err(|e| CoinbetaError::Cache {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        wtr.write_record(["date", "price", "volume"])
            .map_err(|e| CoinbetaError::Cache {
                reason: format!("CSV write error: {}", e),
            })?;
        for point in &series.points {
            wtr.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                point.price.to_string(),
                point.volume.to_string(),
            ])
            .map_err(|e| CoinbetaError::Cache {
                reason: format!("CSV write error: {}", e),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Cached date range and observation count, if any.
    pub fn range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CoinbetaError> {
        let series = match self.load(ticker)? {
            Some(series) if !series.is_empty() => series,
            _ => return Ok(None),
        };
        let first = series.first_date();
        let last = series.last_date();
        match (first, last) {
            (Some(first), Some(last)) => Ok(Some((first, last, series.len()))),
            _ => Ok(None),
        }
    }
}

fn parse_row(record: &csv::StringRecord) -> Option<PricePoint> {
    let date = NaiveDate::parse_from_str(record.get(0)?, "%Y-%m-%d").ok()?;
    let price: f64 = record.get(1)?.parse().ok()?;
    let volume: f64 = record.get(2)?.parse().ok()?;
    Some(PricePoint {
        date,
        price,
        volume,
    })
}
