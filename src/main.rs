//! Card Payment Gateway CLI
//!
//! Command-line interface for submitting card payments from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- payments.csv > responses.csv
//! cargo run -- --output payments payments.csv > stored.csv
//! cargo run -- --config gateway.yaml --strategy async --max-concurrent 8 payments.csv
//! ```
//!
//! The program reads submissions from the input CSV file, submits them
//! through the gateway using the selected processing strategy, and writes the
//! selected report to stdout. Logs go to stderr; set `RUST_LOG` to change the
//! level (default `info`).
//!
//! # Exit Codes
//!
//! - 0: Success (individual rows may still have failed)
//! - 1: Error (unreadable input or configuration, invalid arguments)

use card_payment_gateway::cli::{self, CliArgs, StrategyType};
use card_payment_gateway::config::GatewayConfig;
use card_payment_gateway::core::PaymentGateway;
use card_payment_gateway::strategy;
use card_payment_gateway::types::GatewayError;
use std::process;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: &CliArgs) -> Result<(), GatewayError> {
    let config = match &args.config {
        Some(path) => GatewayConfig::from_yaml_file(path)?,
        None => GatewayConfig::default(),
    };

    // Built outside the async strategy's runtime: the live bank client
    // owns a blocking HTTP client
    let gateway = Arc::new(PaymentGateway::from_config(&config)?);

    let strategy = {
        let config = if args.strategy == StrategyType::Async {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let outcomes = strategy.process(&gateway, &args.input_file)?;

    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    strategy::write_report(&gateway, &outcomes, args.output, &mut output)
}

fn main() {
    init_tracing();
    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}
