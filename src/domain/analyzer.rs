//! Asset analyzers: Bitcoin (the reference asset) and altcoins priced via
//! Bitcoin.
//!
//! Both variants implement the [`Analyzer`] capability set; the Bitcoin
//! variant answers cross-asset statistics with an explicit
//! [`CoinbetaError::NotApplicable`] instead of a silent no-op. Derived
//! series are recomputed on every access.

use crate::domain::align::align_tail;
use crate::domain::error::CoinbetaError;
use crate::domain::moving_average::simple_moving_average;
use crate::domain::regression::{fit_ols, OlsModel};
use crate::domain::returns::{derived_returns, price_returns};
use crate::domain::series::{DerivedPoint, DerivedSeries, PriceSeries};
use crate::domain::stats;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;

/// Ticker of the reference asset.
pub const BTCUSD: &str = "BTCUSD";

fn ensure_available(series: &PriceSeries) -> Result<(), CoinbetaError> {
    if series.is_empty() {
        return Err(CoinbetaError::PricesUnavailable {
            ticker: series.ticker.clone(),
        });
    }
    Ok(())
}

/// Shared capability set of the two analyzer variants.
pub trait Analyzer {
    fn ticker(&self) -> &str;

    /// The asset's own fetched price history (native units).
    fn series(&self) -> &PriceSeries;

    /// USD-denominated price column.
    fn usd_prices(&self) -> Result<DerivedSeries, CoinbetaError>;

    /// Daily returns of the native price column.
    fn returns(&self) -> Result<DerivedSeries, CoinbetaError>;

    /// Daily returns of the USD price column. Not applicable for the
    /// reference asset.
    fn usd_returns(&self) -> Result<DerivedSeries, CoinbetaError>;

    /// OLS fit of this asset's USD returns on the reference asset's USD
    /// returns. Not applicable for the reference asset.
    fn ols_model(&self) -> Result<OlsModel, CoinbetaError>;

    fn mean(&self) -> Result<f64, CoinbetaError> {
        ensure_available(self.series())?;
        Ok(stats::mean(&self.series().prices()))
    }

    fn std(&self) -> Result<f64, CoinbetaError> {
        ensure_available(self.series())?;
        Ok(stats::stddev(&self.series().prices()))
    }

    fn alpha(&self) -> Result<f64, CoinbetaError> {
        Ok(self.ols_model()?.alpha)
    }

    fn beta(&self) -> Result<f64, CoinbetaError> {
        Ok(self.ols_model()?.beta)
    }

    /// Two simple moving averages of the USD price column.
    fn moving_averages(
        &self,
        window1: usize,
        window2: usize,
    ) -> Result<(DerivedSeries, DerivedSeries), CoinbetaError> {
        let prices = self.usd_prices()?;
        Ok((
            simple_moving_average(&prices, window1),
            simple_moving_average(&prices, window2),
        ))
    }
}

/// Analyzer for the reference asset itself (BTC-USD).
#[derive(Debug)]
pub struct BitcoinAnalyzer {
    btcusd: PriceSeries,
}

impl BitcoinAnalyzer {
    /// Fails fast if the series is empty; every accessor may then assume
    /// non-empty ordered input.
    pub fn from_series(btcusd: PriceSeries) -> Result<Self, CoinbetaError> {
        ensure_available(&btcusd)?;
        Ok(Self { btcusd })
    }

    pub fn from_provider(
        provider: &dyn DataPort,
        start: NaiveDate,
        end: NaiveDate,
        refresh: bool,
    ) -> Result<Self, CoinbetaError> {
        let btcusd = provider.fetch(BTCUSD, start, end, refresh)?;
        Self::from_series(btcusd)
    }

    fn not_applicable(&self, what: &str) -> CoinbetaError {
        CoinbetaError::NotApplicable {
            ticker: self.ticker().to_string(),
            what: what.to_string(),
        }
    }
}

impl Analyzer for BitcoinAnalyzer {
    fn ticker(&self) -> &str {
        &self.btcusd.ticker
    }

    fn series(&self) -> &PriceSeries {
        &self.btcusd
    }

    fn usd_prices(&self) -> Result<DerivedSeries, CoinbetaError> {
        ensure_available(&self.btcusd)?;
        Ok(DerivedSeries::from_prices("usd_price", &self.btcusd))
    }

    fn returns(&self) -> Result<DerivedSeries, CoinbetaError> {
        price_returns(&self.btcusd)
    }

    fn usd_returns(&self) -> Result<DerivedSeries, CoinbetaError> {
        Err(self.not_applicable("USD returns"))
    }

    fn ols_model(&self) -> Result<OlsModel, CoinbetaError> {
        Err(self.not_applicable("alpha/beta regression"))
    }
}

/// Analyzer for an altcoin quoted in Bitcoin, with USD statistics derived
/// through the reference series.
#[derive(Debug)]
pub struct AltcoinAnalyzer {
    native: PriceSeries,
    btcusd: PriceSeries,
}

impl AltcoinAnalyzer {
    /// Fails fast if either series is empty.
    pub fn from_series(
        native: PriceSeries,
        btcusd: PriceSeries,
    ) -> Result<Self, CoinbetaError> {
        ensure_available(&native)?;
        ensure_available(&btcusd)?;
        Ok(Self { native, btcusd })
    }

    pub fn from_provider(
        provider: &dyn DataPort,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        refresh: bool,
    ) -> Result<Self, CoinbetaError> {
        let native = provider.fetch(ticker, start, end, refresh)?;
        let btcusd = provider.fetch(BTCUSD, start, end, refresh)?;
        Self::from_series(native, btcusd)
    }
}

impl Analyzer for AltcoinAnalyzer {
    fn ticker(&self) -> &str {
        &self.native.ticker
    }

    fn series(&self) -> &PriceSeries {
        &self.native
    }

    /// usd_price[i] = native[i] * btcusd[aligned_i], with the (typically
    /// longer) reference series tail-aligned to the altcoin length.
    fn usd_prices(&self) -> Result<DerivedSeries, CoinbetaError> {
        ensure_available(&self.native)?;
        ensure_available(&self.btcusd)?;

        let btc_tail = align_tail(self.native.len(), &self.btcusd.points)?;
        let points = self
            .native
            .points
            .iter()
            .zip(btc_tail.iter())
            .map(|(alt, btc)| DerivedPoint {
                date: alt.date,
                valid: true,
                value: alt.price * btc.price,
            })
            .collect();

        Ok(DerivedSeries {
            name: "usd_price".to_string(),
            points,
        })
    }

    fn returns(&self) -> Result<DerivedSeries, CoinbetaError> {
        price_returns(&self.native)
    }

    fn usd_returns(&self) -> Result<DerivedSeries, CoinbetaError> {
        let usd = self.usd_prices()?;
        derived_returns(self.ticker(), &usd, "usd_returns")
    }

    fn ols_model(&self) -> Result<OlsModel, CoinbetaError> {
        let asset = self.usd_returns()?;
        let reference = price_returns(&self.btcusd)?;

        let y = asset.valid_values();
        let x_all = reference.valid_values();
        let x = align_tail(y.len(), &x_all)?;

        fit_ols(x, &y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;
    use approx::assert_relative_eq;

    fn make_series(ticker: &str, prices: &[f64]) -> PriceSeries {
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
        PriceSeries::new(ticker, points)
    }

    #[test]
    fn bitcoin_mean_and_std() {
        let analyzer = BitcoinAnalyzer::from_series(make_series(BTCUSD, &[100.0, 110.0, 121.0]))
            .unwrap();
        assert_relative_eq!(analyzer.mean().unwrap(), 331.0 / 3.0, epsilon = 1e-12);
        assert!(analyzer.std().unwrap() > 0.0);
    }

    #[test]
    fn bitcoin_returns_match_price_ratios() {
        let analyzer = BitcoinAnalyzer::from_series(make_series(BTCUSD, &[100.0, 110.0, 121.0]))
            .unwrap();
        let returns = analyzer.returns().unwrap();

        assert!(!returns.points[0].valid);
        assert_relative_eq!(returns.points[1].value, 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns.points[2].value, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn bitcoin_cross_asset_statistics_not_applicable() {
        let analyzer =
            BitcoinAnalyzer::from_series(make_series(BTCUSD, &[100.0, 110.0])).unwrap();

        assert!(matches!(
            analyzer.beta().unwrap_err(),
            CoinbetaError::NotApplicable { .. }
        ));
        assert!(matches!(
            analyzer.alpha().unwrap_err(),
            CoinbetaError::NotApplicable { .. }
        ));
        assert!(matches!(
            analyzer.usd_returns().unwrap_err(),
            CoinbetaError::NotApplicable { .. }
        ));
        assert!(matches!(
            analyzer.ols_model().unwrap_err(),
            CoinbetaError::NotApplicable { .. }
        ));
    }

    #[test]
    fn failed_accessor_leaves_analyzer_usable() {
        let analyzer =
            BitcoinAnalyzer::from_series(make_series(BTCUSD, &[100.0, 110.0])).unwrap();

        assert!(analyzer.beta().is_err());
        assert_relative_eq!(analyzer.mean().unwrap(), 105.0);
    }

    #[test]
    fn empty_series_fails_construction() {
        let err = BitcoinAnalyzer::from_series(PriceSeries::empty(BTCUSD)).unwrap_err();
        assert!(matches!(err, CoinbetaError::PricesUnavailable { .. }));

        let err = AltcoinAnalyzer::from_series(
            PriceSeries::empty("ETH"),
            make_series(BTCUSD, &[100.0]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoinbetaError::PricesUnavailable { ticker } if ticker == "ETH"
        ));

        let err = AltcoinAnalyzer::from_series(
            make_series("ETH", &[2.0]),
            PriceSeries::empty(BTCUSD),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoinbetaError::PricesUnavailable { ticker } if ticker == BTCUSD
        ));
    }

    #[test]
    fn altcoin_usd_prices_use_reference_tail() {
        let analyzer = AltcoinAnalyzer::from_series(
            make_series("ETH", &[2.0, 2.2]),
            make_series(BTCUSD, &[100.0, 110.0, 121.0]),
        )
        .unwrap();

        let usd = analyzer.usd_prices().unwrap();
        assert_eq!(usd.len(), 2);
        assert_relative_eq!(usd.points[0].value, 220.0, epsilon = 1e-9);
        assert_relative_eq!(usd.points[1].value, 266.2, epsilon = 1e-9);
    }

    #[test]
    fn altcoin_usd_returns_from_usd_prices() {
        let analyzer = AltcoinAnalyzer::from_series(
            make_series("ETH", &[2.0, 2.2]),
            make_series(BTCUSD, &[100.0, 110.0, 121.0]),
        )
        .unwrap();

        let usd_returns = analyzer.usd_returns().unwrap();
        assert_eq!(usd_returns.len(), 2);
        assert!(!usd_returns.points[0].valid);
        assert_relative_eq!(usd_returns.points[1].value, 0.21, epsilon = 1e-9);
    }

    #[test]
    fn altcoin_longer_than_reference_is_misaligned() {
        let analyzer = AltcoinAnalyzer::from_series(
            make_series("ETH", &[2.0, 2.1, 2.2]),
            make_series(BTCUSD, &[100.0, 110.0]),
        )
        .unwrap();

        assert!(matches!(
            analyzer.usd_prices().unwrap_err(),
            CoinbetaError::MisalignedSeries { need: 3, have: 2 }
        ));
    }

    #[test]
    fn constant_native_price_tracks_reference_exactly() {
        // A constant native price makes the USD returns equal Bitcoin's
        // returns, so the regression is the identity line.
        let btc = make_series(
            BTCUSD,
            &[100.0, 103.0, 99.0, 104.0, 108.0, 101.0, 105.0, 110.0],
        );
        let analyzer =
            AltcoinAnalyzer::from_series(make_series("XMR", &[0.02; 8]), btc).unwrap();

        let model = analyzer.ols_model().unwrap();
        assert_relative_eq!(model.beta, 1.0, epsilon = 1e-9);
        assert_relative_eq!(model.alpha, 0.0, epsilon = 1e-9);
        assert_relative_eq!(model.r_squared, 1.0, epsilon = 1e-9);

        assert_relative_eq!(analyzer.beta().unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(analyzer.alpha().unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn moving_averages_over_usd_prices() {
        let analyzer = AltcoinAnalyzer::from_series(
            make_series("ETH", &[2.0; 6]),
            make_series(BTCUSD, &[100.0; 6]),
        )
        .unwrap();

        let (short, long) = analyzer.moving_averages(2, 4).unwrap();
        assert_eq!(short.name, "2-day");
        assert_eq!(long.name, "4-day");
        assert!(!short.points[0].valid);
        assert!(short.points[1].valid);
        assert_relative_eq!(short.points[1].value, 200.0);
        assert!(!long.points[2].valid);
        assert_relative_eq!(long.points[3].value, 200.0);
    }

    #[test]
    fn altcoin_mean_uses_native_prices() {
        let analyzer = AltcoinAnalyzer::from_series(
            make_series("ETH", &[2.0, 4.0]),
            make_series(BTCUSD, &[100.0, 110.0]),
        )
        .unwrap();
        assert_relative_eq!(analyzer.mean().unwrap(), 3.0);
    }
}
