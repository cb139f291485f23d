use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Submit card payments from a CSV file through the payment gateway
#[derive(Parser, Debug)]
#[command(name = "payment-gateway")]
#[command(about = "Submit card payments from a CSV file through the payment gateway", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing payment submissions
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// YAML configuration file
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "Path to a YAML configuration file (default: mock acquiring bank)"
    )]
    pub config: Option<PathBuf>,

    /// Processing strategy to use for submitting payments
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Number of rows per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of rows per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of submissions in flight (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of submissions in flight (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,

    /// Report written to stdout once the input is processed
    #[arg(
        long = "output",
        value_name = "REPORT",
        default_value = "responses",
        help = "Report to write: 'responses' per input row or 'payments' stored"
    )]
    pub output: OutputKind,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available output reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    /// One line per input row with its submission result
    Responses,
    /// Masked views of every stored payment
    Payments,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced by
    /// the defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent.unwrap_or(default.max_concurrent),
            )
        } else {
            BatchConfig::default()
        }
    }
}
