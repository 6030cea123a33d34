//! Historical volatility profile for one or more CSV price histories
//!
//! ```text
//! histvol data/SPX_1d.csv data/TLT_1d.csv --interval 1d --kind C-C
//! histvol data/SPX_1mo.csv --interval 1mo --format json > spx_monthly.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use histvol::report::asset_report;
use histvol::{AnalysisConfig, AssetProfile, Interval, ProfileEngine, ReturnKind, load_price_csv};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "histvol",
    version,
    about = "Return distribution and ATRP profile of OHLC price histories"
)]
struct Args {
    /// CSV files with Date,Open,High,Low,Close[,Adj Close,Volume] columns
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Sampling interval of the data (1d, 1wk, 1mo, 3mo)
    #[arg(short, long, default_value = "1d", env = "HISTVOL_INTERVAL")]
    interval: String,

    /// Return kinds to profile (C-C, H-L, O-C); all when omitted
    #[arg(short, long = "kind")]
    kinds: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Optional analysis config file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FileResult {
    file: String,
    success: bool,
    error_message: Option<String>,
    profile: Option<AssetProfile>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn parse_kinds(raw: &[String]) -> Result<Vec<ReturnKind>> {
    if raw.is_empty() {
        return Ok(ReturnKind::ALL.to_vec());
    }
    raw.iter()
        .map(|kind| kind.parse::<ReturnKind>().map_err(anyhow::Error::from))
        .collect()
}

fn run(args: Args) -> Result<bool> {
    let config = AnalysisConfig::load(args.config.as_deref()).context("loading configuration")?;
    let interval: Interval = args.interval.parse()?;
    let kinds = parse_kinds(&args.kinds)?;
    let engine = ProfileEngine::new(config)?;

    info!(
        "🚀 Profiling {} file(s) at {} interval ({} workers)",
        args.files.len(),
        interval.timeframe(),
        rayon::current_num_threads()
    );
    let start = Instant::now();

    // Load sequentially so I/O errors stay attached to their file
    let mut histories = Vec::with_capacity(args.files.len());
    let mut load_errors = Vec::with_capacity(args.files.len());
    for path in &args.files {
        match load_price_csv(path) {
            Ok(rows) => {
                histories.push(rows);
                load_errors.push(None);
            }
            Err(e) => load_errors.push(Some(e.to_string())),
        }
    }

    let mut profiles = engine.analyze_batch(histories, interval, &kinds).into_iter();

    let results: Vec<FileResult> = args
        .files
        .iter()
        .zip(load_errors)
        .map(|(path, load_error)| {
            let outcome = match load_error {
                Some(message) => Err(message),
                None => match profiles.next() {
                    Some(result) => result.map_err(|e| e.to_string()),
                    None => Err("no analysis result".to_string()),
                },
            };
            let file = path.display().to_string();
            match outcome {
                Ok(profile) => FileResult {
                    file,
                    success: true,
                    error_message: None,
                    profile: Some(profile),
                },
                Err(message) => {
                    error!("❌ {}: {}", file, message);
                    FileResult {
                        file,
                        success: false,
                        error_message: Some(message),
                        profile: None,
                    }
                }
            }
        })
        .collect();

    let successful = results.iter().filter(|r| r.success).count();
    info!(
        "✅ {}/{} profiles completed in {:.2}s",
        successful,
        results.len(),
        start.elapsed().as_secs_f64()
    );

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Table => {
            for result in &results {
                match &result.profile {
                    Some(profile) => println!("{}", asset_report(&result.file, profile)),
                    None => println!(
                        "{}: {}\n",
                        result.file,
                        result.error_message.as_deref().unwrap_or("unknown error")
                    ),
                }
            }
        }
    }

    Ok(successful == results.len())
}

fn main() -> ExitCode {
    init_logging();
    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("💥 {:#}", e);
            ExitCode::FAILURE
        }
    }
}
