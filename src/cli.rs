//! CLI definition and dispatch.

use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::caching_provider::CachingProvider;
use crate::adapters::csv_cache::CsvCacheAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http_provider::HttpPriceClient;
use crate::adapters::svg_chart::SvgChart;
use crate::domain::analyzer::{AltcoinAnalyzer, Analyzer, BitcoinAnalyzer, BTCUSD};
use crate::domain::error::CoinbetaError;
use crate::domain::ohlc::resample_ohlc;
use crate::domain::series::DerivedSeries;
use crate::ports::chart_port::{ChartPort, ChartSpec};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(
    name = "coinbeta",
    about = "Cryptocurrency return and regression analysis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print summary statistics for one asset, optionally with charts
    Analyze {
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Bypass the local price cache
        #[arg(long)]
        refresh: bool,
        /// Write returns and moving-average charts
        #[arg(long)]
        charts: bool,
        #[arg(long)]
        window1: Option<usize>,
        #[arg(long)]
        window2: Option<usize>,
    },
    /// Write a candlestick chart from N-day OHLC buckets
    Candlestick {
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        refresh: bool,
        #[arg(long)]
        bucket_days: Option<u32>,
    },
    /// Show the cached data range for a ticker
    Info {
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Resolved configuration with defaults for every key.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub cache_dir: PathBuf,
    pub api_base: String,
    pub history_days: i64,
    pub window1: usize,
    pub window2: usize,
    pub chart_dir: PathBuf,
    pub bucket_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("crypto_data"),
            api_base: "https://poloniex.com/public".to_string(),
            history_days: 252,
            window1: 14,
            window2: 42,
            chart_dir: PathBuf::from("charts"),
            bucket_days: 4,
        }
    }
}

pub fn settings_from_config(config: &dyn ConfigPort) -> Settings {
    let defaults = Settings::default();
    Settings {
        cache_dir: config
            .get_string("data", "cache_dir")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir),
        api_base: config
            .get_string("data", "api_base")
            .unwrap_or(defaults.api_base),
        history_days: config.get_int("data", "history_days", defaults.history_days),
        window1: config.get_int("analysis", "window1", defaults.window1 as i64) as usize,
        window2: config.get_int("analysis", "window2", defaults.window2 as i64) as usize,
        chart_dir: config
            .get_string("chart", "output_dir")
            .map(PathBuf::from)
            .unwrap_or(defaults.chart_dir),
        bucket_days: config.get_int("chart", "candle_bucket_days", defaults.bucket_days as i64)
            as u32,
    }
}

pub fn load_settings(config_path: Option<&PathBuf>) -> Result<Settings, CoinbetaError> {
    let Some(path) = config_path else {
        return Ok(Settings::default());
    };
    let adapter =
        FileConfigAdapter::from_file(path).map_err(|e| CoinbetaError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(settings_from_config(&adapter))
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            ticker,
            config,
            refresh,
            charts,
            window1,
            window2,
        } => run_analyze(&ticker, config.as_ref(), refresh, charts, window1, window2),
        Command::Candlestick {
            ticker,
            config,
            refresh,
            bucket_days,
        } => run_candlestick(&ticker, config.as_ref(), refresh, bucket_days),
        Command::Info { ticker, config } => run_info(&ticker, config.as_ref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn build_provider(settings: &Settings) -> Result<CachingProvider, CoinbetaError> {
    let cache = CsvCacheAdapter::new(settings.cache_dir.clone());
    let remote = HttpPriceClient::new(settings.api_base.clone())?;
    Ok(CachingProvider::new(cache, remote))
}

/// Trailing calendar window ending today.
fn date_range(settings: &Settings) -> (NaiveDate, NaiveDate) {
    let end = Utc::now().date_naive();
    (end - Duration::days(settings.history_days), end)
}

fn run_analyze(
    ticker: &str,
    config_path: Option<&PathBuf>,
    refresh: bool,
    charts: bool,
    window1: Option<usize>,
    window2: Option<usize>,
) -> Result<(), CoinbetaError> {
    let settings = load_settings(config_path)?;
    let provider = build_provider(&settings)?;
    let (start, end) = date_range(&settings);
    let ticker = ticker.to_uppercase();
    let window1 = window1.unwrap_or(settings.window1);
    let window2 = window2.unwrap_or(settings.window2);

    eprintln!("Fetching {} history, {} to {}", ticker, start, end);

    if ticker == BTCUSD {
        let analyzer = BitcoinAnalyzer::from_provider(&provider, start, end, refresh)?;
        print_summary(&analyzer)?;
        println!("Alpha:        n/a (reference asset)");
        println!("Beta:         n/a (reference asset)");
        if charts {
            write_analysis_charts(&analyzer, &settings, window1, window2)?;
        }
    } else {
        let analyzer = AltcoinAnalyzer::from_provider(&provider, &ticker, start, end, refresh)?;
        print_summary(&analyzer)?;
        let model = analyzer.ols_model()?;
        println!("Alpha:        {:.6}", model.alpha);
        println!("Beta:         {:.4}", model.beta);
        println!("R-squared:    {:.4}", model.r_squared);
        if charts {
            write_analysis_charts(&analyzer, &settings, window1, window2)?;
        }
    }

    Ok(())
}

fn print_summary(analyzer: &dyn Analyzer) -> Result<(), CoinbetaError> {
    println!("=== {} ===", analyzer.ticker());
    println!("Observations: {}", analyzer.series().len());
    println!("Mean:         {:.6}", analyzer.mean()?);
    println!("Std:          {:.6}", analyzer.std()?);
    Ok(())
}

fn write_analysis_charts(
    analyzer: &dyn Analyzer,
    settings: &Settings,
    window1: usize,
    window2: usize,
) -> Result<(), CoinbetaError> {
    // The reference asset has no USD-return column of its own; its native
    // returns already are USD returns.
    let returns = match analyzer.usd_returns() {
        Ok(returns) => returns,
        Err(CoinbetaError::NotApplicable { .. }) => analyzer.returns()?,
        Err(e) => return Err(e),
    };

    let chart = SvgChart::new();
    let ticker = analyzer.ticker().to_lowercase();

    let returns_svg = chart.render(&ChartSpec::Lines {
        title: &format!("Daily returns of {}", analyzer.ticker()),
        series: vec![&returns],
    })?;
    write_chart(settings, &format!("{}_returns.svg", ticker), &returns_svg)?;

    let prices = analyzer.usd_prices()?;
    let (short, long) = analyzer.moving_averages(window1, window2)?;
    let ma_series: Vec<&DerivedSeries> = vec![&prices, &short, &long];
    let ma_svg = chart.render(&ChartSpec::Lines {
        title: &format!("{} price with moving averages", analyzer.ticker()),
        series: ma_series,
    })?;
    write_chart(
        settings,
        &format!("{}_moving_averages.svg", ticker),
        &ma_svg,
    )?;

    Ok(())
}

fn write_chart(settings: &Settings, filename: &str, svg: &str) -> Result<(), CoinbetaError> {
    fs::create_dir_all(&settings.chart_dir)?;
    let path = settings.chart_dir.join(filename);
    fs::write(&path, svg)?;
    eprintln!("Chart written to: {}", path.display());
    Ok(())
}

fn run_candlestick(
    ticker: &str,
    config_path: Option<&PathBuf>,
    refresh: bool,
    bucket_days: Option<u32>,
) -> Result<(), CoinbetaError> {
    let settings = load_settings(config_path)?;
    let provider = build_provider(&settings)?;
    let (start, end) = date_range(&settings);
    let ticker = ticker.to_uppercase();
    let bucket_days = bucket_days.unwrap_or(settings.bucket_days);

    eprintln!("Fetching {} history, {} to {}", ticker, start, end);
    let series = provider.fetch(&ticker, start, end, refresh)?;
    if series.is_empty() {
        return Err(CoinbetaError::PricesUnavailable { ticker });
    }

    let buckets = resample_ohlc(&series, bucket_days);
    let chart = SvgChart::new();
    let svg = chart.render(&ChartSpec::Candlestick {
        title: &format!("{} ({}-day candles)", ticker, bucket_days),
        buckets: &buckets,
    })?;
    write_chart(
        &settings,
        &format!("{}_candlestick.svg", ticker.to_lowercase()),
        &svg,
    )
}

fn run_info(ticker: &str, config_path: Option<&PathBuf>) -> Result<(), CoinbetaError> {
    let settings = load_settings(config_path)?;
    let provider = build_provider(&settings)?;
    let ticker = ticker.to_uppercase();

    match provider.cached_range(&ticker)? {
        Some((first, last, count)) => {
            println!("{}: {} observations, {} to {}", ticker, count, first, last);
        }
        None => {
            eprintln!("{}: no cached data", ticker);
        }
    }
    Ok(())
}
