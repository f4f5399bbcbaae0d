//! HTTP price history client (Poloniex-style chart-data API).
//!
//! Daily candles are requested with `command=returnChartData`; the
//! `weightedAverage` field of each candle is the price observation.

use crate::domain::analyzer::BTCUSD;
use crate::domain::error::CoinbetaError;
use crate::domain::series::{PricePoint, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const DAY_SECS: u64 = 86_400;

#[derive(Debug, Deserialize)]
struct ChartDataRow {
    date: i64,
    #[serde(rename = "weightedAverage")]
    weighted_average: f64,
    #[serde(default)]
    volume: f64,
}

pub struct HttpPriceClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpPriceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CoinbetaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CoinbetaError::Http {
                reason: e.to_string(),
            })?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Exchange pair for a ticker: the reference asset trades against
    /// USDT, altcoins against BTC.
    fn currency_pair(ticker: &str) -> String {
        if ticker.eq_ignore_ascii_case(BTCUSD) {
            "USDT_BTC".to_string()
        } else {
            format!("BTC_{}", ticker.to_uppercase())
        }
    }

    /// Fetch daily prices for a ticker. Unavailability (network failure,
    /// unknown pair, bad response) yields an **empty** series, never an
    /// error.
    pub fn fetch_series(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        match self.request_chart_data(ticker, start, end) {
            Ok(points) => {
                debug!("fetched {} observations for {}", points.len(), ticker);
                PriceSeries::new(ticker.to_uppercase(), points)
            }
            Err(reason) => {
                warn!("price fetch for {} failed: {}", ticker, reason);
                PriceSeries::empty(ticker.to_uppercase())
            }
        }
    }

    fn request_chart_data(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, String> {
        let pair = Self::currency_pair(ticker);
        let start_ts = date_to_unix(start)?;
        let end_ts = date_to_unix(end)?;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("command", "returnChartData"),
                ("currencyPair", pair.as_str()),
                ("start", start_ts.to_string().as_str()),
                ("end", end_ts.to_string().as_str()),
                ("period", DAY_SECS.to_string().as_str()),
            ])
            .send()
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("unexpected status {}", response.status()));
        }

        let rows: Vec<ChartDataRow> = response.json().map_err(|e| e.to_string())?;
        Ok(rows_to_points(rows))
    }
}

fn date_to_unix(date: NaiveDate) -> Result<i64, String> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| format!("invalid date {}", date))
}

/// The API signals an unknown pair with a single zero-dated candle, so
/// zero dates and non-positive prices are dropped.
fn rows_to_points(rows: Vec<ChartDataRow>) -> Vec<PricePoint> {
    rows.into_iter()
        .filter(|row| row.date > 0 && row.weighted_average > 0.0)
        .filter_map(|row| {
            let date = chrono::DateTime::from_timestamp(row.date, 0)?.date_naive();
            Some(PricePoint {
                date,
                price: row.weighted_average,
                volume: row.volume,
            })
        })
        .collect()
}
