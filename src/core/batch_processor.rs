//! Bounded concurrent submission of batch rows
//!
//! This module provides the `BatchProcessor` struct, which submits the rows of
//! one batch concurrently through a shared [`PaymentGateway`].
//!
//! # Design
//!
//! Submissions are blocking (the live bank client uses a blocking HTTP
//! client), so each one runs on tokio's blocking pool. A semaphore caps how
//! many are in flight at once. Rows that failed to decode never reach the
//! gateway and are reported as they are.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<PaymentGateway>  (shared submission pipeline)
//!     └── Arc<Semaphore>       (in-flight submission limit)
//! ```
//!
//! # Thread Safety
//!
//! The processor is cloneable and can be shared across async tasks. The
//! gateway's only shared mutable state is its store, which serializes writes
//! internally.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::core::gateway::PaymentGateway;
use crate::types::{GatewayError, SubmissionOutcome, SubmissionRow};

/// Batch processor with bounded concurrency
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    gateway: Arc<PaymentGateway>,
    permits: Arc<Semaphore>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `gateway` - Gateway shared by every submission
    /// * `max_concurrent` - Maximum submissions in flight; 0 is treated as 1
    pub fn new(gateway: Arc<PaymentGateway>, max_concurrent: usize) -> Self {
        Self {
            gateway,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Submit one row, waiting for a permit first
    async fn submit_row(&self, row: SubmissionRow) -> SubmissionOutcome {
        let request = match row.request {
            Ok(request) => request,
            Err(error) => {
                return SubmissionOutcome {
                    row: row.row,
                    result: Err(error),
                }
            }
        };

        // The semaphore is never closed, so a permit is always granted
        let _permit = Arc::clone(&self.permits).acquire_owned().await.ok();

        let gateway = Arc::clone(&self.gateway);
        let result = tokio::task::spawn_blocking(move || gateway.submit(&request))
            .await
            .unwrap_or_else(|join_error| {
                tracing::error!(row = row.row, "submission task failed: {}", join_error);
                Err(GatewayError::internal(join_error.to_string()))
            });

        SubmissionOutcome {
            row: row.row,
            result,
        }
    }

    /// Submit every row of a batch
    ///
    /// # Returns
    ///
    /// One `SubmissionOutcome` per input row, in input order.
    ///
    /// # Guarantees
    ///
    /// - At most `max_concurrent` submissions run at the same time
    /// - All rows are processed, even if some fail
    /// - Errors are captured in the outcomes and don't stop processing
    pub async fn process_batch(&self, batch: Vec<SubmissionRow>) -> Vec<SubmissionOutcome> {
        join_all(batch.into_iter().map(|row| self.submit_row(row))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bank::MockAcquiringBank;
    use crate::core::traits::AcquiringBank;
    use crate::core::validator::FixedClock;
    use crate::types::{
        BankResponse, PaymentOutcome, TransactionRequest, ValidatedTransaction,
    };
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Bank that tracks how many calls overlap
    #[derive(Default)]
    struct SlowBank {
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl AcquiringBank for SlowBank {
        fn submit(&self, transaction: &ValidatedTransaction) -> Result<BankResponse, GatewayError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            MockAcquiringBank.submit(transaction)
        }
    }

    fn gateway_with(bank: Box<dyn AcquiringBank>) -> Arc<PaymentGateway> {
        let clock = FixedClock::at_date(2024, 1, 25).unwrap();
        Arc::new(PaymentGateway::with_components(bank, Arc::new(clock)))
    }

    fn row(row: u64, owner: &str, card_number: &str) -> SubmissionRow {
        SubmissionRow {
            row,
            request: Ok(TransactionRequest {
                card_owner: owner.to_string(),
                card_number: card_number.to_string(),
                expiration_date: "12/25".to_string(),
                ccv: "123".to_string(),
                amount: Decimal::new(50, 0),
                currency: "USD".to_string(),
            }),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_outcomes_follow_input_order() {
        let processor = BatchProcessor::new(gateway_with(Box::new(MockAcquiringBank)), 4);
        let batch = vec![
            row(1, "John Doe", "4012888888881881"),
            row(2, "Martin Fail", "8142740445497749"),
            row(3, "Martin", "4012888888881881"),
            row(4, "Jane Roe", "8142740445497749"),
        ];

        let outcomes = processor.process_batch(batch).await;

        let rows: Vec<_> = outcomes.iter().map(|o| o.row).collect();
        assert_eq!(rows, vec![1, 2, 3, 4]);
        assert_eq!(
            outcomes[0].result.as_ref().unwrap().status,
            PaymentOutcome::Successful
        );
        assert_eq!(
            outcomes[1].result.as_ref().unwrap().status,
            PaymentOutcome::Rejected
        );
        assert!(matches!(
            outcomes[2].result,
            Err(GatewayError::Validation(_))
        ));
        assert!(outcomes[3].result.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_undecodable_rows_are_passed_through() {
        let gateway = gateway_with(Box::new(MockAcquiringBank));
        let processor = BatchProcessor::new(Arc::clone(&gateway), 2);
        let batch = vec![SubmissionRow {
            row: 1,
            request: Err(GatewayError::parse(Some(2), "invalid amount")),
        }];

        let outcomes = processor.process_batch(batch).await;

        assert_eq!(
            outcomes,
            vec![SubmissionOutcome {
                row: 1,
                result: Err(GatewayError::parse(Some(2), "invalid amount")),
            }]
        );
        assert_eq!(gateway.store().payment_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrency_is_bounded() {
        let peak = Arc::new(AtomicUsize::new(0));
        let bank = SlowBank {
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::clone(&peak),
        };
        let processor = BatchProcessor::new(gateway_with(Box::new(bank)), 2);
        let batch = (1..=8)
            .map(|n| row(n, "John Doe", "4012888888881881"))
            .collect();

        let outcomes = processor.process_batch(batch).await;

        assert_eq!(outcomes.len(), 8);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_identical_cards_in_one_batch_share_a_card() {
        let gateway = gateway_with(Box::new(MockAcquiringBank));
        let processor = BatchProcessor::new(Arc::clone(&gateway), 8);
        let batch = (1..=6)
            .map(|n| row(n, "John Doe", "4012888888881881"))
            .collect();

        processor.process_batch(batch).await;

        assert_eq!(gateway.store().card_count(), 1);
        assert_eq!(gateway.store().payment_count(), 6);
    }
}
