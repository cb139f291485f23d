//! Core business logic module
//!
//! This module contains the payment processing components:
//! - `traits` - Trait abstractions for the bank and the clock
//! - `validator` - Field validation of submissions
//! - `store` - In-process tables with transactional writes
//! - `card_repository` / `payment_status_repository` - Persistence of cards and outcomes
//! - `bank` - Mock and live acquiring bank clients
//! - `processor` - The submission pipeline
//! - `retrieval` - Masked views of stored payments
//! - `gateway` - Composition of all of the above
//! - `batch_processor` - Bounded concurrent submission of batch rows

pub mod bank;
pub mod batch_processor;
pub mod card_repository;
pub mod gateway;
pub mod payment_status_repository;
pub mod processor;
pub mod retrieval;
pub mod store;
pub mod traits;
pub mod validator;

pub use bank::{AcquiringBankClient, HttpAcquiringBank, MockAcquiringBank};
pub use batch_processor::BatchProcessor;
pub use card_repository::CardRepository;
pub use gateway::PaymentGateway;
pub use payment_status_repository::PaymentStatusRepository;
pub use processor::{PaymentProcessor, ProcessingStage};
pub use retrieval::{mask_card_number, RetrievalService};
pub use store::{Store, StoreTransaction};
pub use traits::{AcquiringBank, Clock};
pub use validator::{FixedClock, SystemClock, TransactionValidator};
