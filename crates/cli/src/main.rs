//! CLI for ringwatch fraud ring detection.

mod server;

use clap::{Parser, Subcommand};
use ringwatch_detection::{analyze, analyze_batch, prepare_transactions, DetectionConfig};
use ringwatch_ingest::read_ledger_path;
use ringwatch_telemetry::{init_logging, write_report, Metrics};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "ringwatch")]
#[command(about = "Flag accounts in suspicious money-movement patterns and group them into fraud rings")]
struct Cli {
    /// Log level or filter directive (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one ledger CSV
    Analyze {
        /// Ledger CSV with timestamp, sender_id and receiver_id columns
        #[arg(long)]
        input: PathBuf,

        /// Counter for the first ring id
        #[arg(long, default_value = "1")]
        start_ring_counter: u32,

        /// Write the JSON result here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// JSON file overriding detection thresholds
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Analyze several ledgers with non-overlapping ring ids
    Batch {
        /// Ledger CSV (repeat for each dataset, processed in order)
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Counter for the first ring id of the first dataset
        #[arg(long, default_value = "1")]
        start_ring_counter: u32,

        /// Write the JSON results here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// JSON file overriding detection thresholds
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Serve the analysis endpoint over HTTP
    Serve {
        /// Bind address
        #[arg(long, default_value = "0.0.0.0:8000")]
        bind_address: String,

        /// JSON file overriding detection thresholds
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref(), cli.log_json)?;

    match cli.command {
        Commands::Analyze {
            input,
            start_ring_counter,
            output,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            run_analyze(&input, start_ring_counter, output.as_deref(), &config)?;
        }
        Commands::Batch {
            inputs,
            start_ring_counter,
            output,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            run_batch(&inputs, start_ring_counter, output.as_deref(), &config)?;
        }
        Commands::Serve {
            bind_address,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let state = server::AppState {
                config,
                metrics: Metrics::new()?,
            };
            server::serve(&bind_address, Arc::new(state)).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DetectionConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let config: DetectionConfig = serde_json::from_str(&raw)?;
            info!("Loaded detection config from {:?}", path);
            config
        }
        None => DetectionConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run_analyze(
    input: &Path,
    start_ring_counter: u32,
    output: Option<&Path>,
    config: &DetectionConfig,
) -> anyhow::Result<()> {
    info!("Analyzing {:?}", input);
    let records = read_ledger_path(input)?;
    let prepared = prepare_transactions(&records, config)?;
    let result = analyze(&prepared.transactions, start_ring_counter, config)?;
    info!(
        "Flagged {} accounts in {} rings, next ring counter {}",
        result.summary.suspicious_accounts_flagged,
        result.summary.fraud_rings_detected,
        result.next_ring_counter
    );
    emit(output, &result)
}

fn run_batch(
    inputs: &[PathBuf],
    start_ring_counter: u32,
    output: Option<&Path>,
    config: &DetectionConfig,
) -> anyhow::Result<()> {
    info!("Analyzing batch of {} datasets", inputs.len());
    let mut datasets = Vec::with_capacity(inputs.len());
    for input in inputs {
        datasets.push((input.display().to_string(), read_ledger_path(input)?));
    }
    let results = analyze_batch(datasets, start_ring_counter, config)?;
    emit(output, &results)
}

fn emit<T: Serialize>(output: Option<&Path>, payload: &T) -> anyhow::Result<()> {
    match output {
        Some(path) => write_report(path, payload),
        None => {
            println!("{}", serde_json::to_string_pretty(payload)?);
            Ok(())
        }
    }
}
