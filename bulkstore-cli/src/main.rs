use anyhow::{Context, Result};
use bulkstore_core::ledger::{Call, LocalLedger};
use bulkstore_core::logging::{init_logging_with_config, LogLevel};
use bulkstore_core::metrics::init_metrics;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "bulkstore")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON state file, loaded before the command and saved after it
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one call, e.g. '{"method":"bulkStore","params":["a","b"]}'
    Call {
        /// The call as JSON
        json: String,
    },

    /// Run a JSON array of calls in order
    Batch {
        /// File holding the calls
        file: PathBuf,
    },

    /// Estimate gas for a bulk operation
    EstimateGas {
        /// Number of slots touched
        count: u64,

        /// Operation code: 0 store, 1 retrieve, 2 remove
        op_type: u64,
    },

    /// Print the per-call batch limits
    Limits,

    /// Print total, filled and average length
    Stats,

    /// Run the reference bulk workflow against the store
    Demo,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = commands::load_config(args.config.as_deref())?;
    if let Some(level) = &args.log_level {
        let level = LogLevel::parse(level).unwrap_or_else(|e| {
            eprintln!("{}, using 'info'", e);
            LogLevel::Info
        });
        config.logging.level = level.to_string();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    init_logging_with_config(config.logging.to_log_config())?;
    if config.metrics.enabled {
        init_metrics();
    }

    info!("BulkStore CLI started");

    let store = Arc::new(commands::load_store(&config, args.state.as_deref())?);
    let ledger = LocalLedger::new(Arc::clone(&store));

    let lines = match args.command {
        Command::Call { json } => vec![commands::run_call(&ledger, &json)?],
        Command::Batch { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read batch file {}", file.display()))?;
            commands::run_batch(&ledger, &contents)?
        }
        Command::EstimateGas { count, op_type } => {
            vec![commands::run(&ledger, Call::EstimateGas(count, op_type))?]
        }
        Command::Limits => vec![commands::run(&ledger, Call::GetLimits)?],
        Command::Stats => vec![commands::run(&ledger, Call::GetStats)?],
        Command::Demo => commands::run_demo(&ledger)?,
    };

    for line in lines {
        println!("{}", line);
    }

    if let Some(path) = &args.state {
        commands::save_state(&store, path)?;
        debug!(path = %path.display(), "State saved");
    }

    info!("BulkStore CLI finished");

    Ok(())
}
