//! Payment outcome types for the card payment gateway
//!
//! This module defines the persisted payment status record, the acquiring
//! bank's reply, and the two caller-facing shapes: the submission response and
//! the masked retrieval view.

use super::card::CardId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment identifier
///
/// Assigned by the store on creation, starting at 1.
pub type PaymentId = u64;

/// Result code the acquiring bank uses for an executed payment
pub const BANK_SUCCESS_CODE: &str = "200";

/// Reply of the acquiring bank for one submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankResponse {
    /// HTTP-like result code (200 on success)
    pub code: u16,

    /// Human readable outcome
    pub message: String,
}

impl BankResponse {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Persisted outcome of one submitted transaction
///
/// Written exactly once per bank round trip, whether the bank accepted the
/// payment or not. Immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentStatusRecord {
    /// Store-assigned identifier
    pub id: PaymentId,

    /// The card this payment was made with
    pub card_id: CardId,

    pub amount: Decimal,

    pub currency: String,

    /// String form of the bank result code
    pub status: String,

    /// Bank message
    pub message: String,
}

/// Caller-facing verdict on a submitted payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentOutcome {
    #[serde(rename = "payment successful")]
    Successful,
    #[serde(rename = "payment rejected")]
    Rejected,
}

impl PaymentOutcome {
    /// Map a stored status code onto the caller-facing verdict
    pub fn from_status(status: &str) -> Self {
        if status == BANK_SUCCESS_CODE {
            PaymentOutcome::Successful
        } else {
            PaymentOutcome::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentOutcome::Successful => "payment successful",
            PaymentOutcome::Rejected => "payment rejected",
        }
    }
}

/// Response returned for an accepted submission
///
/// `reason` carries the bank message and is present only for rejected payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment_id: PaymentId,
    pub status: PaymentOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Caller-safe view of a stored payment
///
/// The card number is masked down to its last four characters. CCV and
/// expiration are returned as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskedPaymentView {
    pub payment_id: PaymentId,
    pub status_code: String,
    pub message: String,
    pub amount: Decimal,
    pub currency: String,
    pub card_owner: String,
    pub card_number: String,
    pub expiration_date: String,
    pub ccv: String,
}
