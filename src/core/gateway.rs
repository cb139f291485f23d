//! Gateway composition
//!
//! `PaymentGateway` wires the store, repositories, bank client and processor
//! together and exposes the two operations callers use: submit a payment and
//! retrieve a stored one.

use crate::config::GatewayConfig;
use crate::core::bank::AcquiringBankClient;
use crate::core::card_repository::CardRepository;
use crate::core::payment_status_repository::PaymentStatusRepository;
use crate::core::processor::PaymentProcessor;
use crate::core::retrieval::RetrievalService;
use crate::core::store::Store;
use crate::core::traits::{AcquiringBank, Clock};
use crate::core::validator::{SystemClock, TransactionValidator};
use crate::types::{
    GatewayError, MaskedPaymentView, PaymentId, PaymentResponse, TransactionRequest,
};
use std::sync::Arc;

/// Payment gateway
#[derive(Debug)]
pub struct PaymentGateway {
    store: Arc<Store>,
    processor: PaymentProcessor,
    retrieval: RetrievalService,
}

impl PaymentGateway {
    /// Build a gateway from configuration, reading time from the system clock
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;
        let bank = AcquiringBankClient::from_config(&config.acquiring_bank)?;
        Ok(Self::with_components(Box::new(bank), Arc::new(SystemClock)))
    }

    /// Build a gateway around an explicit bank and clock
    pub fn with_components(bank: Box<dyn AcquiringBank>, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(Store::new());
        let cards = CardRepository::new(Arc::clone(&store));
        let payments = PaymentStatusRepository::new(Arc::clone(&store));

        let processor = PaymentProcessor::new(
            TransactionValidator::new(clock),
            bank,
            cards.clone(),
            payments.clone(),
        );
        let retrieval = RetrievalService::new(payments, cards);

        Self {
            store,
            processor,
            retrieval,
        }
    }

    /// Submit a payment
    pub fn submit(&self, request: &TransactionRequest) -> Result<PaymentResponse, GatewayError> {
        self.processor.submit(request)
    }

    /// Retrieve the masked view of a payment
    pub fn retrieve(&self, payment_id: PaymentId) -> Result<Option<MaskedPaymentView>, GatewayError> {
        self.retrieval.get(payment_id)
    }

    /// Masked views of all stored payments
    pub fn payments(&self) -> Result<Vec<MaskedPaymentView>, GatewayError> {
        self.retrieval.all()
    }

    /// The underlying store
    pub fn store(&self) -> &Store {
        &self.store
    }
}
