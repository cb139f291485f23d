//! Processing strategy module for batch payment submission
//!
//! This module defines the Strategy pattern for complete batch pipelines,
//! encompassing both CSV parsing and submission through the gateway. This
//! allows different processing implementations (synchronous, asynchronous
//! batch) to be selected at runtime.

use crate::cli::{OutputKind, StrategyType};
use crate::core::PaymentGateway;
use crate::io::csv_format::{write_payments_csv, write_responses_csv};
use crate::types::{GatewayError, SubmissionOutcome};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete batch pipelines
///
/// Each strategy reads submission rows from a CSV file and submits them
/// through the given gateway, producing one outcome per row.
pub trait ProcessingStrategy: Send + Sync {
    /// Submit every row of the input file
    ///
    /// # Arguments
    ///
    /// * `gateway` - Gateway the rows are submitted to
    /// * `input_path` - Path to the input CSV file
    ///
    /// # Returns
    ///
    /// * `Ok(outcomes)` with one outcome per data row, in input order
    /// * `Err(GatewayError)` if a fatal error occurred (file not found, runtime failure)
    ///
    /// Row-level failures (undecodable rows, validation errors, bank
    /// failures) are carried in the outcomes and do not stop processing.
    fn process(
        &self,
        gateway: &Arc<PaymentGateway>,
        input_path: &Path,
    ) -> Result<Vec<SubmissionOutcome>, GatewayError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

/// Write the selected report for a finished batch
///
/// `Responses` writes the per-row outcomes; `Payments` writes the masked
/// views of every payment the gateway has stored.
pub fn write_report(
    gateway: &PaymentGateway,
    outcomes: &[SubmissionOutcome],
    kind: OutputKind,
    output: &mut dyn Write,
) -> Result<(), GatewayError> {
    match kind {
        OutputKind::Responses => write_responses_csv(outcomes, output),
        OutputKind::Payments => write_payments_csv(&gateway.payments()?, output),
    }
}

/// Log a summary of a finished batch
pub(crate) fn log_summary(outcomes: &[SubmissionOutcome]) {
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    tracing::info!(
        rows = outcomes.len(),
        processed = outcomes.len() - failed,
        failed,
        "batch complete"
    );
}
