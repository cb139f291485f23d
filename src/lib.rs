//! Card Payment Gateway Library
//! # Overview
//!
//! This library accepts card payment submissions from merchants, validates
//! them, forwards them to an acquiring bank, records the outcome, and lets
//! callers look a payment up again with the card number masked.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (requests, cards, payment records, errors)
//! - [`config`] - YAML configuration of the acquiring bank
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::validator`] - Field validation with a Luhn check
//!   - [`core::bank`] - Mock and live acquiring bank clients
//!   - [`core::store`] - In-process tables with transactional writes
//!   - [`core::processor`] - The submission pipeline
//!   - [`core::retrieval`] - Masked payment views
//!   - [`core::gateway`] - Composition of the above
//! - [`io`] - CSV input and report output
//! - [`strategy`] - Sequential and concurrent batch processing
//!
//! # Submission Flow
//!
//! A submission is validated field by field in a fixed order and stops at the
//! first failure. A valid submission goes to the acquiring bank; whatever the
//! bank answers is recorded against the card, which is created on first use
//! and reused for every later payment with the same number, CCV and
//! expiration date.
//!
//! - **Accepted** (bank code 200): `payment successful`
//! - **Rejected** (any other code): `payment rejected`, with the bank message as reason
//! - **Invalid**: field error, nothing recorded, bank never called
//! - **Bank unreachable**: processing error, nothing recorded

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::{BankConfig, GatewayConfig};
pub use core::{PaymentGateway, PaymentProcessor, RetrievalService, TransactionValidator};
pub use io::{write_payments_csv, write_responses_csv};
pub use types::{
    GatewayError, MaskedPaymentView, PaymentId, PaymentOutcome, PaymentResponse,
    TransactionRequest,
};
