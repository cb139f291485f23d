//! Types module
//!
//! Contains core data structures used throughout the gateway.
//! This module organizes types into logical submodules:
//! - `transaction`: raw and validated payment submissions
//! - `card`: card records and their uniqueness key
//! - `payment`: payment status records, bank replies and caller-facing views
//! - `submission`: batch input rows and their outcomes
//! - `error`: Error types for the gateway

pub mod card;
pub mod error;
pub mod payment;
pub mod submission;
pub mod transaction;

pub use card::{CardId, CardKey, CardRecord};
pub use error::{FieldValidationError, GatewayError, StorageError, TransactionField};
pub use payment::{
    BankResponse, MaskedPaymentView, PaymentId, PaymentOutcome, PaymentResponse,
    PaymentStatusRecord, BANK_SUCCESS_CODE,
};
pub use submission::{RowNumber, SubmissionOutcome, SubmissionRow};
pub use transaction::{ExpirationDate, TransactionRequest, ValidatedTransaction};
