//! Masked retrieval of stored payments

use crate::core::card_repository::CardRepository;
use crate::core::payment_status_repository::PaymentStatusRepository;
use crate::types::{
    GatewayError, MaskedPaymentView, PaymentId, PaymentStatusRecord, StorageError,
};

/// Number of trailing card number characters left readable
const VISIBLE_SUFFIX: usize = 4;

/// Replace every character but the last four with `*`
///
/// Numbers of four characters or fewer come back unchanged.
pub fn mask_card_number(card_number: &str) -> String {
    let length = card_number.chars().count();
    let hidden = length.saturating_sub(VISIBLE_SUFFIX);

    card_number
        .chars()
        .enumerate()
        .map(|(index, ch)| if index < hidden { '*' } else { ch })
        .collect()
}

/// Read side of the gateway
#[derive(Debug, Clone)]
pub struct RetrievalService {
    payments: PaymentStatusRepository,
    cards: CardRepository,
}

impl RetrievalService {
    pub fn new(payments: PaymentStatusRepository, cards: CardRepository) -> Self {
        Self { payments, cards }
    }

    /// Masked view of a stored payment, or `None` if the id was never issued
    ///
    /// # Errors
    ///
    /// Returns `DanglingReference` if the payment's card cannot be found.
    pub fn get(&self, payment_id: PaymentId) -> Result<Option<MaskedPaymentView>, GatewayError> {
        match self.payments.get(payment_id) {
            Some(payment) => self.view(payment).map(Some),
            None => {
                tracing::debug!(payment_id, "payment not found");
                Ok(None)
            }
        }
    }

    /// Masked views of every stored payment, ordered by id
    pub fn all(&self) -> Result<Vec<MaskedPaymentView>, GatewayError> {
        self.payments
            .all()
            .into_iter()
            .map(|payment| self.view(payment))
            .collect()
    }

    fn view(&self, payment: PaymentStatusRecord) -> Result<MaskedPaymentView, GatewayError> {
        let card = self
            .cards
            .get(payment.card_id)
            .ok_or(StorageError::DanglingReference {
                payment_id: payment.id,
                card_id: payment.card_id,
            })?;

        Ok(MaskedPaymentView {
            payment_id: payment.id,
            status_code: payment.status,
            message: payment.message,
            amount: payment.amount,
            currency: payment.currency,
            card_owner: card.owner_name,
            card_number: mask_card_number(&card.card_number),
            expiration_date: card.expiration_date,
            ccv: card.ccv,
        })
    }
}
