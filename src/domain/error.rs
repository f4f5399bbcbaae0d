//! Domain error types.

/// Top-level error type for coinbeta.
#[derive(Debug, thiserror::Error)]
pub enum CoinbetaError {
    #[error("historical prices unavailable for {ticker}")]
    PricesUnavailable { ticker: String },

    #[error("misaligned series: reference has {have} points, need {need}")]
    MisalignedSeries { need: usize, have: usize },

    #[error("dimension mismatch: x has {x_len} points, y has {y_len}")]
    DimensionMismatch { x_len: usize, y_len: usize },

    #[error("insufficient data: have {have} points, need at least {minimum}")]
    InsufficientData { have: usize, minimum: usize },

    #[error("{what} is not applicable for reference asset {ticker}")]
    NotApplicable { ticker: String, what: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("http client error: {reason}")]
    Http { reason: String },

    #[error("cache error: {reason}")]
    Cache { reason: String },

    #[error("chart error: {reason}")]
    Chart { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CoinbetaError> for std::process::ExitCode {
    fn from(err: &CoinbetaError) -> Self {
        let code: u8 = match err {
            CoinbetaError::Io(_) => 1,
            CoinbetaError::ConfigParse { .. } | CoinbetaError::ConfigInvalid { .. } => 2,
            CoinbetaError::Http { .. }
            | CoinbetaError::Cache { .. }
            | CoinbetaError::Chart { .. } => 3,
            CoinbetaError::NotApplicable { .. } => 4,
            CoinbetaError::PricesUnavailable { .. }
            | CoinbetaError::MisalignedSeries { .. }
            | CoinbetaError::DimensionMismatch { .. }
            | CoinbetaError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_unavailable_names_ticker() {
        let err = CoinbetaError::PricesUnavailable {
            ticker: "ETH".into(),
        };
        assert_eq!(err.to_string(), "historical prices unavailable for ETH");
    }

    #[test]
    fn not_applicable_names_statistic() {
        let err = CoinbetaError::NotApplicable {
            ticker: "BTCUSD".into(),
            what: "beta".into(),
        };
        assert_eq!(
            err.to_string(),
            "beta is not applicable for reference asset BTCUSD"
        );
    }

    #[test]
    fn dimension_mismatch_reports_both_lengths() {
        let err = CoinbetaError::DimensionMismatch { x_len: 5, y_len: 3 };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: x has 5 points, y has 3"
        );
    }
}
