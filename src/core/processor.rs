//! Payment submission pipeline
//!
//! This module provides the `PaymentProcessor` that takes a raw submission
//! through validation, the acquiring bank, card resolution and persistence,
//! and shapes the caller-facing response.
//!
//! ```text
//! Validating ──(field error)──────────────────────────────> Rejected
//!     │
//!     v
//! BankSubmitted ──(transport error)──> failed, nothing persisted
//!     │
//!     v
//! CardResolved ──> Recorded ──> Responded
//! ```
//!
//! The processor enforces these rules:
//! - no bank call and no write happen for an invalid submission
//! - nothing is written when the bank cannot be reached
//! - exactly one payment status is written per bank round trip, whether the
//!   bank accepted the payment or not

use crate::core::card_repository::CardRepository;
use crate::core::payment_status_repository::PaymentStatusRepository;
use crate::core::traits::AcquiringBank;
use crate::core::validator::TransactionValidator;
use crate::types::{GatewayError, PaymentOutcome, PaymentResponse, TransactionRequest};
use std::fmt;

/// Stages a submission moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Validating,
    BankSubmitted,
    CardResolved,
    Recorded,
    Responded,
    Rejected,
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessingStage::Validating => "validating",
            ProcessingStage::BankSubmitted => "bank_submitted",
            ProcessingStage::CardResolved => "card_resolved",
            ProcessingStage::Recorded => "recorded",
            ProcessingStage::Responded => "responded",
            ProcessingStage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Payment processing pipeline
///
/// Holds no per-submission state, so one processor can serve concurrent
/// submissions.
pub struct PaymentProcessor {
    validator: TransactionValidator,
    bank: Box<dyn AcquiringBank>,
    cards: CardRepository,
    payments: PaymentStatusRepository,
}

impl PaymentProcessor {
    pub fn new(
        validator: TransactionValidator,
        bank: Box<dyn AcquiringBank>,
        cards: CardRepository,
        payments: PaymentStatusRepository,
    ) -> Self {
        Self {
            validator,
            bank,
            cards,
            payments,
        }
    }

    /// Process one payment submission
    ///
    /// # Returns
    ///
    /// * `Ok(PaymentResponse)` once the bank answered and the outcome is stored,
    ///   including when the bank rejected the payment
    /// * `Err(GatewayError)` if the submission was invalid or could not be processed
    ///
    /// # Errors
    ///
    /// - `Validation` for the first invalid field; nothing is persisted
    /// - `BankCommunication` if the bank could not be reached; nothing is persisted
    /// - `Storage` if the card or payment status could not be written
    pub fn submit(&self, request: &TransactionRequest) -> Result<PaymentResponse, GatewayError> {
        tracing::debug!(stage = %ProcessingStage::Validating, "processing submission");
        let transaction = match self.validator.validate(request) {
            Ok(transaction) => transaction,
            Err(error) => {
                tracing::warn!(
                    stage = %ProcessingStage::Rejected,
                    field = %error.field,
                    "submission rejected: {}",
                    error.message
                );
                return Err(error.into());
            }
        };

        let bank_response = self.bank.submit(&transaction).inspect_err(|error| {
            tracing::warn!(stage = %ProcessingStage::BankSubmitted, "bank call failed: {}", error);
        })?;
        tracing::debug!(
            stage = %ProcessingStage::BankSubmitted,
            code = bank_response.code,
            "bank replied"
        );

        let expiration_date = transaction.expiration_date.to_string();
        let card_id = self.cards.get_or_create(
            &transaction.card_owner,
            &transaction.card_number,
            &expiration_date,
            &transaction.ccv,
        )?;
        tracing::debug!(stage = %ProcessingStage::CardResolved, card_id, "card resolved");

        let status = bank_response.code.to_string();
        let payment_id = self.payments.record(
            card_id,
            transaction.amount,
            &transaction.currency,
            &status,
            &bank_response.message,
        )?;
        tracing::debug!(stage = %ProcessingStage::Recorded, payment_id, "payment recorded");

        let outcome = PaymentOutcome::from_status(&status);
        let reason = match outcome {
            PaymentOutcome::Successful => None,
            PaymentOutcome::Rejected => Some(bank_response.message),
        };

        tracing::info!(
            stage = %ProcessingStage::Responded,
            payment_id,
            status = outcome.as_str(),
            "payment processed"
        );

        Ok(PaymentResponse {
            payment_id,
            status: outcome,
            reason,
        })
    }
}

impl fmt::Debug for PaymentProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentProcessor")
            .field("validator", &self.validator)
            .field("cards", &self.cards)
            .field("payments", &self.payments)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bank::{MockAcquiringBank, MOCK_FAILURE_MESSAGE, MOCK_SUCCESS_MESSAGE};
    use crate::core::store::Store;
    use crate::core::validator::{FixedClock, INVALID_CARD_OWNER};
    use crate::types::{BankResponse, TransactionField, ValidatedTransaction};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Bank that counts calls and can be told to fail
    #[derive(Default)]
    struct RecordingBank {
        calls: Arc<AtomicUsize>,
        unreachable: bool,
    }

    impl AcquiringBank for RecordingBank {
        fn submit(&self, transaction: &ValidatedTransaction) -> Result<BankResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unreachable {
                return Err(GatewayError::bank_communication("connection refused"));
            }
            MockAcquiringBank.submit(transaction)
        }
    }

    fn processor_with(bank: RecordingBank) -> (PaymentProcessor, Arc<Store>) {
        let store = Arc::new(Store::new());
        let clock = FixedClock::at_date(2024, 1, 25).unwrap();
        let processor = PaymentProcessor::new(
            TransactionValidator::new(Arc::new(clock)),
            Box::new(bank),
            CardRepository::new(Arc::clone(&store)),
            PaymentStatusRepository::new(Arc::clone(&store)),
        );
        (processor, store)
    }

    fn request(owner: &str, amount: i64) -> TransactionRequest {
        TransactionRequest {
            card_owner: owner.to_string(),
            card_number: "4012888888881881".to_string(),
            expiration_date: "12/25".to_string(),
            ccv: "123".to_string(),
            amount: Decimal::new(amount, 0),
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn test_successful_payment() {
        let (processor, store) = processor_with(RecordingBank::default());

        let response = processor.submit(&request("John Doe", 50)).unwrap();

        assert_eq!(
            response,
            PaymentResponse {
                payment_id: 1,
                status: PaymentOutcome::Successful,
                reason: None,
            }
        );
        let record = store.payment(1).unwrap();
        assert_eq!(record.status, "200");
        assert_eq!(record.message, MOCK_SUCCESS_MESSAGE);
        assert_eq!(record.amount, Decimal::new(50, 0));
        assert_eq!(record.currency, "USD");
    }

    #[test]
    fn test_bank_rejection_is_persisted_and_reported() {
        let (processor, store) = processor_with(RecordingBank::default());

        let response = processor.submit(&request("Martin Fail", 25)).unwrap();

        assert_eq!(response.status, PaymentOutcome::Rejected);
        assert_eq!(response.reason.as_deref(), Some(MOCK_FAILURE_MESSAGE));

        let record = store.payment(response.payment_id).unwrap();
        assert_eq!(record.status, "400");
        assert_eq!(record.message, MOCK_FAILURE_MESSAGE);
    }

    #[test]
    fn test_invalid_submission_skips_bank_and_store() {
        let calls = Arc::new(AtomicUsize::new(0));
        let bank = RecordingBank {
            calls: Arc::clone(&calls),
            unreachable: false,
        };
        let (processor, store) = processor_with(bank);

        let error = processor.submit(&request("Martin", 25)).unwrap_err();

        match error {
            GatewayError::Validation(field_error) => {
                assert_eq!(field_error.field, TransactionField::CardOwner);
                assert_eq!(field_error.message, INVALID_CARD_OWNER);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.card_count(), 0);
        assert_eq!(store.payment_count(), 0);
    }

    #[test]
    fn test_unreachable_bank_persists_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let bank = RecordingBank {
            calls: Arc::clone(&calls),
            unreachable: true,
        };
        let (processor, store) = processor_with(bank);

        let error = processor.submit(&request("John Doe", 50)).unwrap_err();

        assert!(matches!(error, GatewayError::BankCommunication { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.card_count(), 0);
        assert_eq!(store.payment_count(), 0);
    }

    #[test]
    fn test_same_card_different_amounts_share_card_id() {
        let (processor, store) = processor_with(RecordingBank::default());

        let first = processor.submit(&request("John Doe", 50)).unwrap();
        let second = processor.submit(&request("John Doe", 75)).unwrap();

        assert_ne!(first.payment_id, second.payment_id);
        let first = store.payment(first.payment_id).unwrap();
        let second = store.payment(second.payment_id).unwrap();
        assert_eq!(first.card_id, second.card_id);
        assert_eq!(store.card_count(), 1);
    }

    #[test]
    fn test_each_submission_records_exactly_one_status() {
        let (processor, store) = processor_with(RecordingBank::default());

        processor.submit(&request("John Doe", 10)).unwrap();
        processor.submit(&request("Martin Fail", 10)).unwrap();
        let _ = processor.submit(&request("Martin", 10));

        assert_eq!(store.payment_count(), 2);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(ProcessingStage::BankSubmitted.to_string(), "bank_submitted");
        assert_eq!(ProcessingStage::Responded.to_string(), "responded");
    }
}
