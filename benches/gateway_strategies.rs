//! Benchmark suite for comparing processing strategies
//!
//! This benchmark compares the synchronous and asynchronous processing
//! strategies using the divan benchmarking framework. Every run submits
//! through a fresh gateway backed by the mock acquiring bank.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Benchmark Fixtures
//!
//! - `benchmark_small.csv` - Small dataset (100 submissions)
//! - `benchmark_medium.csv` - Medium dataset (1,000 submissions)
//!
//! Each fixture mixes accepted and rejected payments and reuses cards across
//! rows. Expiration dates are far in the future so the system clock can be
//! used.

use card_payment_gateway::cli::{OutputKind, StrategyType};
use card_payment_gateway::config::GatewayConfig;
use card_payment_gateway::core::PaymentGateway;
use card_payment_gateway::strategy::{create_strategy, write_report, BatchConfig};
use std::path::Path;
use std::sync::Arc;

fn main() {
    divan::main();
}

fn run(strategy_type: StrategyType, fixture: &str) {
    let gateway = Arc::new(
        PaymentGateway::from_config(&GatewayConfig::default()).expect("mock configuration"),
    );
    let config = match strategy_type {
        StrategyType::Sync => None,
        StrategyType::Async => Some(BatchConfig::default()),
    };
    let strategy = create_strategy(strategy_type, config);
    let path = Path::new("benches/fixtures").join(fixture);

    let outcomes = strategy
        .process(&gateway, &path)
        .expect("Processing failed");

    let mut output = Vec::new();
    write_report(&gateway, &outcomes, OutputKind::Responses, &mut output)
        .expect("Report failed");
}

/// Benchmark synchronous processing strategy with small dataset (100 submissions)
#[divan::bench]
fn sync_strategy_small() {
    run(StrategyType::Sync, "benchmark_small.csv");
}

/// Benchmark asynchronous processing strategy with small dataset (100 submissions)
#[divan::bench]
fn async_strategy_small() {
    run(StrategyType::Async, "benchmark_small.csv");
}

/// Benchmark synchronous processing strategy with medium dataset (1,000 submissions)
#[divan::bench]
fn sync_strategy_medium() {
    run(StrategyType::Sync, "benchmark_medium.csv");
}

/// Benchmark asynchronous processing strategy with medium dataset (1,000 submissions)
#[divan::bench]
fn async_strategy_medium() {
    run(StrategyType::Async, "benchmark_medium.csv");
}
