//! Transaction-related types for the card payment gateway
//!
//! A submission enters the gateway as a raw [`TransactionRequest`] and, once
//! every field has passed validation, continues as a [`ValidatedTransaction`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw payment submission as received from a merchant
///
/// Nothing about its content is trusted until it passes the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Card owner in 'Firstname Lastname' format
    pub card_owner: String,

    /// 16 digit card number
    pub card_number: String,

    /// Expiration date in MM/YY format
    pub expiration_date: String,

    /// Card verification value
    pub ccv: String,

    /// Transaction amount
    pub amount: Decimal,

    /// Three letter currency code
    pub currency: String,
}

/// Card expiration month and year
///
/// Formats back to the `MM/YY` form it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpirationDate {
    /// Month, 1-12
    pub month: u32,
    /// Four digit year
    pub year: i32,
}

impl fmt::Display for ExpirationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year.rem_euclid(100))
    }
}

impl Serialize for ExpirationDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A submission whose every field passed validation
///
/// Only [`TransactionValidator`](crate::core::TransactionValidator) builds
/// values of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedTransaction {
    pub card_owner: String,
    pub card_number: String,
    pub expiration_date: ExpirationDate,
    pub ccv: String,
    pub amount: Decimal,
    pub currency: String,
}
