//! `file-table` command line tool.
//!
//! Loads a set of table files the same way a long-running service would, and
//! either answers one query (`lookup`, `dump`) or keeps the table live
//! (`watch`) until interrupted.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use file_table::config::{load_config, LogFormat, TableConfig};
use file_table::lifecycle::{Signal, Signals};
use file_table::observability::{logging, metrics};
use file_table::FileTable;

#[derive(Parser)]
#[command(name = "file-table")]
#[command(about = "Hot-reloading key-value tables backed by text files", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source file (repeatable, later files win). Replaces `files` from --config.
    #[arg(short, long = "file")]
    files: Vec<PathBuf>,

    /// Reload interval in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Log output format.
    #[arg(long, value_enum)]
    log_format: Option<Format>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

impl From<Format> for LogFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Pretty => LogFormat::Pretty,
            Format::Json => LogFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value for KEY (exit code 1 if absent)
    Lookup { key: String },
    /// Print all entries sorted by key
    Dump {
        /// Print a JSON object instead of `key: value` lines
        #[arg(long)]
        json: bool,
    },
    /// Keep the table loaded and reloading until interrupted (SIGHUP reloads)
    Watch,
}

impl Cli {
    fn table_config(&self) -> file_table::Result<TableConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => TableConfig::default(),
        };
        if !self.files.is_empty() {
            config.files = self.files.clone();
        }
        if let Some(ms) = self.interval_ms {
            config.reload_interval_ms = ms;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format.into();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.table_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    logging::init_logging(
        config.observability.log_format,
        &config.observability.log_level,
    );

    match run(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "file-table failed");
            ExitCode::from(2)
        }
    }
}

async fn run(
    command: Commands,
    config: TableConfig,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut table = FileTable::new(&config)?;

    match command {
        Commands::Lookup { key } => match table.lookup(&key) {
            Some(value) => {
                println!("{}", value);
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(ExitCode::from(1)),
        },
        Commands::Dump { json } => {
            let snapshot = table.snapshot();
            let sorted: BTreeMap<&String, &String> = snapshot.iter().collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&sorted)?);
            } else {
                for (key, value) in &sorted {
                    println!("{}: {}", key, value);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Watch => {
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr)?,
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let mut signals = Signals::new()?;
            table.init()?;

            loop {
                match signals.recv().await {
                    Signal::Reload => {
                        tracing::info!(table = %table.name(), "SIGHUP received, reloading");
                        table.reload_now();
                    }
                    Signal::Terminate => break,
                }
            }

            table.close().await;
            tracing::info!("Shutdown complete");
            Ok(ExitCode::SUCCESS)
        }
    }
}
