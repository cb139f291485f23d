//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. It reads submissions in batches and submits the
//! rows of each batch concurrently.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (bounded concurrent submission)
//!         └── Arc<PaymentGateway> (shared pipeline and store)
//! ```
//!
//! # Ordering
//!
//! - Batches are processed one after the other
//! - Within a batch, submissions run concurrently, so payment ids are not
//!   assigned in row order
//! - Outcomes are always reported in row order

use crate::core::{BatchProcessor, PaymentGateway};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{log_summary, ProcessingStrategy};
use crate::types::{GatewayError, SubmissionOutcome};
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how many rows are read per batch and how many submissions may be
/// in flight at once.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of rows per batch
    pub batch_size: usize,
    /// Maximum number of submissions in flight
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            tracing::warn!(
                "Invalid max_concurrent ({}), using default ({})",
                max_concurrent,
                default.max_concurrent
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// # Thread Safety
///
/// AsyncProcessingStrategy is Send + Sync. It builds its own tokio runtime
/// per call, so it must not be invoked from inside another runtime.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Submit every row of the input file in concurrent batches
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads rows in batches with AsyncReader
    /// 3. Submits each batch through a BatchProcessor and waits for it
    /// 4. Returns the outcomes of all batches in row order
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, unreadable input, runtime creation) are
    /// returned immediately. Row errors are logged and kept in the outcomes.
    fn process(
        &self,
        gateway: &Arc<PaymentGateway>,
        input_path: &Path,
    ) -> Result<Vec<SubmissionOutcome>, GatewayError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent)
            .build()
            .map_err(|e| GatewayError::Io {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let processor = BatchProcessor::new(Arc::clone(gateway), self.config.max_concurrent);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| GatewayError::Io {
                    message: format!("Failed to open file '{}': {}", input_path.display(), e),
                })?;
            tracing::info!(
                input = %input_path.display(),
                batch_size = self.config.batch_size,
                max_concurrent = self.config.max_concurrent,
                "processing batch asynchronously"
            );

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);
            reader.read_headers().await?;

            let mut outcomes = Vec::new();
            loop {
                let batch = reader.read_batch(self.config.batch_size).await?;
                if batch.is_empty() {
                    break;
                }

                for outcome in processor.process_batch(batch).await {
                    if let Err(e) = &outcome.result {
                        tracing::warn!(row = outcome.row, "row failed: {}", e);
                    }
                    outcomes.push(outcome);
                }
            }

            log_summary(&outcomes);
            Ok(outcomes)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedClock, MockAcquiringBank};
    use crate::types::PaymentOutcome;
    use std::collections::HashSet;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn gateway() -> Arc<PaymentGateway> {
        let clock = FixedClock::at_date(2024, 1, 25).unwrap();
        Arc::new(PaymentGateway::with_components(
            Box::new(MockAcquiringBank),
            Arc::new(clock),
        ))
    }

    #[test]
    fn test_async_strategy_processes_valid_row() {
        let file = create_temp_csv(
            "card_owner,card_number,expiration_date,ccv,amount,currency\n\
             John Doe,4012888888881881,12/25,123,50,USD\n",
        );
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());

        let outcomes = strategy.process(&gateway(), file.path()).unwrap();

        assert_eq!(outcomes.len(), 1);
        let response = outcomes[0].result.as_ref().unwrap();
        assert_eq!(response.payment_id, 1);
        assert_eq!(response.status, PaymentOutcome::Successful);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());

        let result = strategy.process(&gateway(), Path::new("nonexistent.csv"));

        match result {
            Err(GatewayError::Io { message }) => assert!(message.contains("Failed to open file")),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_async_strategy_fails_on_unreadable_input() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());
        let gateway = gateway();

        let result = strategy.process(&gateway, dir.path());

        assert!(matches!(result, Err(GatewayError::Io { .. })));
        assert_eq!(gateway.store().payment_count(), 0);
    }

    #[test]
    fn test_async_strategy_keeps_row_order_across_batches() {
        let file = create_temp_csv(
            "card_owner,card_number,expiration_date,ccv,amount,currency\n\
             John Doe,4012888888881881,12/25,123,50,USD\n\
             Martin Fail,8142740445497749,12/25,123,20,USD\n\
             Martin,4012888888881881,12/25,123,50,USD\n\
             Jane Roe,8142740445497749,12/25,123,bad,USD\n\
             Jane Roe,8142740445497749,12/25,123,30,USD\n",
        );
        // Small batches force the rows to span several of them
        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(2, 2));
        let gateway = gateway();

        let outcomes = strategy.process(&gateway, file.path()).unwrap();

        let rows: Vec<_> = outcomes.iter().map(|o| o.row).collect();
        assert_eq!(rows, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            outcomes[1].result.as_ref().unwrap().status,
            PaymentOutcome::Rejected
        );
        assert!(matches!(outcomes[2].result, Err(GatewayError::Validation(_))));
        assert!(matches!(outcomes[3].result, Err(GatewayError::Parse { .. })));

        let ids: HashSet<_> = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.payment_id)
            .collect();
        assert_eq!(ids, HashSet::from([1, 2, 3]));
        assert_eq!(gateway.store().card_count(), 2);
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_concurrent, num_cpus::get());
    }
}
