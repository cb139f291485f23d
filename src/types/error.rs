//! Error types for the card payment gateway
//!
//! This module defines all error types that can occur while validating,
//! submitting, storing and retrieving payments.
//!
//! # Error Categories
//!
//! - **Validation Errors**: the first field of a submission that fails its format rule
//! - **Bank Communication Errors**: transport failures reaching the acquiring bank
//! - **Storage Errors**: constraint violations raised by the store
//! - **Configuration / I/O / Parse Errors**: fatal problems around the batch surface
//!
//! A payment rejected by the bank is a normal outcome and is not represented here.

use std::fmt;
use thiserror::Error;

/// The fields of a payment submission, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionField {
    CardOwner,
    CardNumber,
    ExpirationDate,
    Ccv,
    Amount,
    Currency,
}

impl TransactionField {
    /// Wire name of the field, as used in submissions and error reports
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionField::CardOwner => "card_owner",
            TransactionField::CardNumber => "card_number",
            TransactionField::ExpirationDate => "expiration_date",
            TransactionField::Ccv => "ccv",
            TransactionField::Amount => "amount",
            TransactionField::Currency => "currency",
        }
    }
}

impl fmt::Display for TransactionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First failing field of a submission together with its fixed message
///
/// Validation stops at the first failure, so a submission never carries
/// more than one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldValidationError {
    /// The field that failed validation
    pub field: TransactionField,
    /// Caller-facing message, surfaced verbatim
    pub message: &'static str,
}

impl FieldValidationError {
    pub fn new(field: TransactionField, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Errors raised by the store when a transaction commits or a join is resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A unique index rejected the insert
    ///
    /// For the card table this is recovered by the repository, which re-reads
    /// the record that won the race.
    #[error("Unique constraint '{constraint}' violated")]
    UniqueViolation {
        /// Name of the violated constraint
        constraint: &'static str,
    },

    /// A payment referenced a card that does not exist
    #[error("Foreign key violation: card {card_id} does not exist")]
    ForeignKeyViolation {
        /// The missing card id
        card_id: u64,
    },

    /// A stored payment points at a card that cannot be found
    #[error("Payment {payment_id} references missing card {card_id}")]
    DanglingReference {
        /// The payment holding the reference
        payment_id: u64,
        /// The card id that could not be resolved
        card_id: u64,
    },
}

/// Main error type for the payment gateway
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The submission failed field validation
    ///
    /// Recoverable by the caller correcting its input. Nothing is persisted
    /// and the bank is never called.
    #[error("Validation failed on {}: {}", .0.field, .0.message)]
    Validation(#[from] FieldValidationError),

    /// The acquiring bank could not be reached or answered garbage
    ///
    /// Fatal to the current submission; nothing is persisted.
    #[error("Acquiring bank communication failed: {message}")]
    BankCommunication {
        /// Description of the transport failure
        message: String,
    },

    /// The store rejected an operation
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// A submission task died before producing a result
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable for batch input: the row is reported and processing
    /// continues with the next one.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for GatewayError {
    fn from(error: std::io::Error) -> Self {
        GatewayError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for GatewayError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        GatewayError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for GatewayError {
    fn from(error: serde_yaml::Error) -> Self {
        GatewayError::Config {
            message: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        GatewayError::BankCommunication {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl GatewayError {
    /// Create a Validation error for a field
    pub fn validation(field: TransactionField, message: &'static str) -> Self {
        GatewayError::Validation(FieldValidationError::new(field, message))
    }

    /// Create a BankCommunication error
    pub fn bank_communication(message: impl Into<String>) -> Self {
        GatewayError::BankCommunication {
            message: message.into(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        GatewayError::Config {
            message: message.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        GatewayError::Internal {
            message: message.into(),
        }
    }

    /// Create a Parse error
    pub fn parse(line: Option<u64>, message: impl Into<String>) -> Self {
        GatewayError::Parse {
            line,
            message: message.into(),
        }
    }

    /// True for errors the caller can fix by correcting the submission
    pub fn is_client_error(&self) -> bool {
        matches!(self, GatewayError::Validation(_) | GatewayError::Parse { .. })
    }

    /// Message suitable for a caller
    ///
    /// Validation failures surface their fixed message verbatim; everything
    /// else collapses into a generic processing error.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Validation(err) => err.message.to_string(),
            GatewayError::Parse { .. } => self.to_string(),
            _ => "Payment could not be processed".to_string(),
        }
    }
}
