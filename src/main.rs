use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use configuration::load_config;
use core_types::{PredictionConfig, PredictionResult, PricePoint};
use engine::PredictionEngine;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the Augur forecasting CLI.
fn main() -> Result<()> {
    // A missing .env file is fine; RUST_LOG can come from the shell.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref())?;

    match cli.command {
        Commands::Forecast(args) => handle_forecast(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Price forecasts with confidence bands for illiquid collectibles.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Also write logs to a daily rolling file in this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast the price trajectory of one item.
    Forecast(ForecastArgs),
}

#[derive(Parser)]
struct ForecastArgs {
    /// JSON file with the price `series` and the market `config`.
    #[arg(long)]
    input: PathBuf,

    /// Engine settings. A missing file falls back to the built-in calibration.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Seed for the Monte Carlo generator. Omit for a fresh seed on every run.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the forecast horizon from the input file.
    #[arg(long)]
    days: Option<usize>,

    /// Print the full result as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

/// The on-disk shape of a forecast request.
#[derive(Debug, Deserialize)]
struct ForecastFile {
    series: Vec<PricePoint>,
    #[serde(default)]
    config: PredictionConfig,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the global subscriber. Logs go to stderr so `--json` output stays clean.
///
/// The returned guard flushes the file sink and must live until the program exits.
fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "augur.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(writer)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to install the tracing subscriber")?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to install the tracing subscriber")?;
            Ok(None)
        }
    }
}

// ==============================================================================
// Forecast Command Logic
// ==============================================================================

fn handle_forecast(args: ForecastArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file {}", args.input.display()))?;
    let mut request: ForecastFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse input file {}", args.input.display()))?;
    if let Some(days) = args.days {
        request.config.prediction_days = days;
    }

    let settings = load_config(&args.config)
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;
    let engine = PredictionEngine::new(settings)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    tracing::info!(
        input = %args.input.display(),
        points = request.series.len(),
        seed = ?args.seed,
        "Starting forecast."
    );
    let result = engine
        .generate_full_prediction(&request.series, &request.config, &mut rng)
        .context("Forecast failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
    }
    Ok(())
}

fn print_report(result: &PredictionResult) {
    if result.predicted.is_empty() {
        println!("Not enough price history to forecast.");
        return;
    }

    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL);
    summary.set_header(vec!["Metric", "Value"]);
    summary.add_row(vec!["Regime".to_string(), result.regime.to_string()]);
    summary.add_row(vec![
        "Confidence".to_string(),
        format!("{} ({})", result.confidence_score, result.confidence_level),
    ]);
    summary.add_row(vec![
        "Liquidity".to_string(),
        format!("{} (~{:.1} days to sell)", result.liquidity_rating, result.days_to_sell),
    ]);
    summary.add_row(vec![
        "Pricing pressure".to_string(),
        format!("{} ({})", result.pressure_rating, result.pressure_direction),
    ]);
    summary.add_row(vec![
        "Sanitized".to_string(),
        format!("{} removed, {} snipes", result.sanitized_count, result.snipe_count),
    ]);
    println!("{summary}");

    for factor in &result.confidence_factors {
        println!("  - {factor}");
    }

    let mut forecast = Table::new();
    forecast.load_preset(UTF8_FULL);
    forecast.set_header(vec!["Day", "Date", "Lower", "Predicted", "Upper"]);
    for (day, ((mid, hi), lo)) in result
        .predicted
        .iter()
        .zip(&result.upper_band)
        .zip(&result.lower_band)
        .enumerate()
    {
        forecast.add_row(vec![
            (day + 1).to_string(),
            mid.display_date.clone(),
            format!("{:.0}", lo.price),
            format!("{:.0}", mid.price),
            format!("{:.0}", hi.price),
        ]);
    }
    println!("{forecast}");
}
