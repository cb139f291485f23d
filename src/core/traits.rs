//! Core traits for the collaborators of the payment pipeline
//!
//! This module defines the trait abstractions the processor depends on, so
//! the real bank and system clock can be swapped for deterministic stand-ins.

use crate::types::{BankResponse, GatewayError, ValidatedTransaction};
use chrono::NaiveDateTime;

/// Trait for submitting validated transactions to an acquiring bank
///
/// A rejection reported by the bank is a successful call returning a
/// non-200 code. `Err` is reserved for transport failures.
pub trait AcquiringBank: Send + Sync {
    /// Submit a transaction and return the bank's verdict
    fn submit(&self, transaction: &ValidatedTransaction) -> Result<BankResponse, GatewayError>;
}

/// Trait for reading the current local time
pub trait Clock: Send + Sync {
    /// The current instant, in local time
    fn now(&self) -> NaiveDateTime;
}
