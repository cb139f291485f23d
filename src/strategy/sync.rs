//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates batch submission by coordinating
//! between the SyncReader (for CSV input) and the PaymentGateway.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Submission to `PaymentGateway` (business logic)
//!
//! Rows are submitted one at a time in file order, so payment ids follow the
//! order of the successfully submitted rows.

use crate::core::PaymentGateway;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{log_summary, ProcessingStrategy};
use crate::types::{GatewayError, SubmissionOutcome};
use std::path::Path;
use std::sync::Arc;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use card_payment_gateway::config::GatewayConfig;
/// use card_payment_gateway::core::PaymentGateway;
/// use card_payment_gateway::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let gateway = Arc::new(PaymentGateway::from_config(&GatewayConfig::default()).unwrap());
/// let outcomes = SyncProcessingStrategy
///     .process(&gateway, Path::new("payments.csv"))
///     .expect("Processing failed");
/// println!("{} rows processed", outcomes.len());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Submit every row of the input file, one after the other
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, unreadable input) are returned
    /// immediately. Row errors are logged and kept in the outcomes, and
    /// processing continues.
    fn process(
        &self,
        gateway: &Arc<PaymentGateway>,
        input_path: &Path,
    ) -> Result<Vec<SubmissionOutcome>, GatewayError> {
        let reader = SyncReader::new(input_path)?;
        tracing::info!(input = %input_path.display(), "processing batch synchronously");

        let mut outcomes = Vec::new();
        for row in reader {
            let row = row?;
            let result = row.request.and_then(|request| gateway.submit(&request));
            if let Err(e) = &result {
                tracing::warn!(row = row.row, "row failed: {}", e);
            }
            outcomes.push(SubmissionOutcome {
                row: row.row,
                result,
            });
        }

        log_summary(&outcomes);
        Ok(outcomes)
    }
}
