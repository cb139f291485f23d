//! Card deduplication
//!
//! The `CardRepository` maps a card submission onto a stable card id. Cards
//! are identified by their key (number, CCV, expiration); the owner name is
//! stored with the first insert and never consulted again.
//!
//! # Creation Races
//!
//! Two submissions of an unseen key may both miss the lookup and both try to
//! create the card. The store's unique index lets exactly one commit through;
//! the loser gets a unique-constraint violation and resolves it by reading the
//! winner's row.

use crate::core::store::Store;
use crate::types::{CardId, CardKey, CardRecord, GatewayError, StorageError};
use std::sync::Arc;

/// Repository owning the lifetime of card records
#[derive(Debug, Clone)]
pub struct CardRepository {
    store: Arc<Store>,
}

impl CardRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Return the id of the card with this key, creating it on first sight
    ///
    /// An existing card is returned unchanged even when `owner_name` differs
    /// from the stored owner.
    ///
    /// # Errors
    ///
    /// Returns a storage error for any failure other than a lost creation race.
    pub fn get_or_create(
        &self,
        owner_name: &str,
        card_number: &str,
        expiration_date: &str,
        ccv: &str,
    ) -> Result<CardId, GatewayError> {
        let key = CardKey::new(card_number, ccv, expiration_date);

        if let Some(card) = self.store.card_by_key(&key) {
            return Ok(card.id);
        }

        let created = self.store.transaction(|tx| {
            Ok(tx.insert_card(owner_name, card_number, expiration_date, ccv))
        });

        match created {
            Ok(card_id) => {
                tracing::debug!(card_id, "card created");
                Ok(card_id)
            }
            Err(GatewayError::Storage(StorageError::UniqueViolation { constraint })) => {
                tracing::debug!(constraint, "card created concurrently, reading it back");
                self.store
                    .card_by_key(&key)
                    .map(|card| card.id)
                    .ok_or(GatewayError::Storage(StorageError::UniqueViolation {
                        constraint,
                    }))
            }
            Err(error) => Err(error),
        }
    }

    /// Look up a card by id
    pub fn get(&self, card_id: CardId) -> Option<CardRecord> {
        self.store.card(card_id)
    }
}
