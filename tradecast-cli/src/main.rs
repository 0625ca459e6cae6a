//! TradeCast CLI: prediction, dataset and evaluation commands.
//!
//! Commands:
//! - `predict`: decision record for one symbol
//! - `batch`: decision records for many symbols, in input order
//! - `dataset`: build a labelled training dataset and export it as CSV
//! - `evaluate`: held-out accuracy of the variant's saved classifier
//! - `schema`: canonical feature schema with its fingerprint
//!
//! Results go to stdout as JSON; logs go to stderr (`RUST_LOG` to adjust).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tradecast_core::data::DataProvider;
use tradecast_core::features::FeatureSchema;
use tradecast_core::variant::ModelVariant;
use tradecast_runner::dataset::sidecar_path;
use tradecast_runner::{
    build_provider, build_training_dataset, evaluate_holdout, export_csv, normalize_symbol, predict_batch,
    Predictor, RunnerConfig, DEFAULT_TEST_FRACTION,
};

#[derive(Parser)]
#[command(name = "tradecast", about = "TradeCast CLI: UP/DOWN/NO_TRADE signals from OHLCV data")]
struct Cli {
    /// Path to a TOML runner config. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use deterministic synthetic bars instead of Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    synthetic: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict one symbol.
    Predict {
        /// Ticker (e.g., AAPL, RELIANCE.NS). Defaults to AAPL.
        symbol: Option<String>,

        /// Model variant: intraday or daily.
        #[arg(long, default_value = "intraday")]
        variant: String,
    },
    /// Predict several symbols in parallel.
    Batch {
        #[arg(required = true)]
        symbols: Vec<String>,

        #[arg(long, default_value = "intraday")]
        variant: String,
    },
    /// Build the labelled training dataset and write it as CSV.
    Dataset {
        symbol: String,

        #[arg(long, default_value = "intraday")]
        variant: String,

        /// Output CSV path. Defaults to datasets/<SYMBOL>_<variant>.csv.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score the saved classifier on the latest held-out rows.
    Evaluate {
        symbol: String,

        #[arg(long, default_value = "intraday")]
        variant: String,

        /// Fraction of the newest rows held out for scoring.
        #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
        test_fraction: f64,
    },
    /// Print the canonical feature schema.
    Schema,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.synthetic)?;

    match cli.command {
        Commands::Predict { symbol, variant } => run_predict(config, symbol.as_deref(), &variant),
        Commands::Batch { symbols, variant } => run_batch(config, &symbols, &variant),
        Commands::Dataset { symbol, variant, out } => run_dataset(&config, &symbol, &variant, out),
        Commands::Evaluate {
            symbol,
            variant,
            test_fraction,
        } => run_evaluate(&config, &symbol, &variant, test_fraction),
        Commands::Schema => run_schema(),
    }
}

fn load_config(path: Option<&Path>, synthetic: bool) -> Result<RunnerConfig> {
    let mut config = match path {
        Some(p) => RunnerConfig::from_file(p).with_context(|| format!("loading {}", p.display()))?,
        None => RunnerConfig::default(),
    };
    if synthetic {
        config.offline_synthetic = true;
    }
    info!(config_id = %&config.config_id()[..12], "configuration loaded");
    Ok(config)
}

fn provider(config: &RunnerConfig) -> Result<Arc<dyn DataProvider>> {
    Ok(build_provider(config)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_predict(config: RunnerConfig, symbol: Option<&str>, variant: &str) -> Result<()> {
    let provider = provider(&config)?;
    let predictor = Predictor::new(config, provider);
    let response = predictor.get_prediction(symbol, Some(variant));
    print_json(&response)?;
    if response.is_error() {
        bail!("prediction failed");
    }
    Ok(())
}

fn run_batch(config: RunnerConfig, symbols: &[String], variant: &str) -> Result<()> {
    let provider = provider(&config)?;
    let predictor = Predictor::new(config, provider);
    let responses = predict_batch(&predictor, symbols, ModelVariant::parse(variant));
    print_json(&responses)
}

fn run_dataset(config: &RunnerConfig, symbol: &str, variant: &str, out: Option<PathBuf>) -> Result<()> {
    let variant = ModelVariant::parse(variant);
    let symbol = normalize_symbol(Some(symbol));
    let provider = provider(config)?;

    let dataset = build_training_dataset(provider.as_ref(), config, &symbol, variant)?;
    let out = out.unwrap_or_else(|| PathBuf::from("datasets").join(format!("{symbol}_{variant}.csv")));
    let metadata = export_csv(&dataset, &out)?;

    eprintln!("Wrote {} rows to {}", metadata.rows, out.display());
    eprintln!("Metadata: {}", sidecar_path(&out).display());
    print_json(&metadata)
}

fn run_evaluate(config: &RunnerConfig, symbol: &str, variant: &str, test_fraction: f64) -> Result<()> {
    if !(0.0 < test_fraction && test_fraction < 1.0) {
        bail!("--test-fraction must be between 0 and 1, got {test_fraction}");
    }
    let variant = ModelVariant::parse(variant);
    let symbol = normalize_symbol(Some(symbol));
    let provider = provider(config)?;
    let predictor = Predictor::new(config.clone(), provider);

    let classifier = predictor.load_classifier(variant)?;
    let report = evaluate_holdout(
        predictor.provider(),
        config,
        classifier.as_ref(),
        &symbol,
        variant,
        test_fraction,
    )?;
    print_json(&report)
}

fn run_schema() -> Result<()> {
    let schema = FeatureSchema::canonical();
    print_json(&serde_json::json!({
        "version": schema.version(),
        "fingerprint": schema.fingerprint(),
        "features": schema.names(),
        "clipped": schema
            .names()
            .iter()
            .filter(|n| FeatureSchema::is_clipped(n))
            .collect::<Vec<_>>(),
    }))
}
