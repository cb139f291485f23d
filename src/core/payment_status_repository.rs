//! Payment status persistence
//!
//! One `PaymentStatusRecord` is written per bank round trip. Records are
//! immutable once committed and are never deleted.

use crate::core::store::Store;
use crate::types::{CardId, GatewayError, PaymentId, PaymentStatusRecord};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Repository owning the lifetime of payment status records
#[derive(Debug, Clone)]
pub struct PaymentStatusRepository {
    store: Arc<Store>,
}

impl PaymentStatusRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Persist the outcome of a payment and return its id
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if `card_id` does not exist.
    pub fn record(
        &self,
        card_id: CardId,
        amount: Decimal,
        currency: &str,
        status: &str,
        message: &str,
    ) -> Result<PaymentId, GatewayError> {
        let payment_id = self.store.transaction(|tx| {
            Ok(tx.insert_payment(card_id, amount, currency, status, message))
        })?;

        tracing::debug!(payment_id, card_id, status, "payment status recorded");
        Ok(payment_id)
    }

    /// Look up a payment status by id
    pub fn get(&self, payment_id: PaymentId) -> Option<PaymentStatusRecord> {
        self.store.payment(payment_id)
    }

    /// All payment statuses, ordered by id
    pub fn all(&self) -> Vec<PaymentStatusRecord> {
        self.store.payments()
    }
}
