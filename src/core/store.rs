//! In-process relational store
//!
//! This module provides the `Store` holding the two gateway tables,
//! `card_information` and `payment_status`, together with the constraints the
//! rest of the gateway relies on:
//!
//! - a unique index on the card key (number, CCV, expiration)
//! - a foreign key from each payment to its card
//! - one id sequence per table, starting at 1
//!
//! # Transactions
//!
//! All writes go through a [`StoreTransaction`] guard. Writes are staged on the
//! guard and only become visible when [`StoreTransaction::commit`] succeeds.
//! Dropping a guard without committing rolls it back. Commits serialize on a
//! single lock and check every constraint before applying anything, so a
//! transaction is applied entirely or not at all.
//!
//! # Thread Safety
//!
//! Tables are `DashMap`s: reads never take the commit lock and reads of
//! different rows proceed in parallel. Sequence values handed out to a
//! transaction that later rolls back are not reused.

use crate::types::{
    CardId, CardKey, CardRecord, GatewayError, PaymentId, PaymentStatusRecord, StorageError,
};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Name of the unique index on the card key
pub const UNIQUE_CREDIT_CARD: &str = "_unique_credit_card";

/// Thread-safe store for cards and payment statuses
#[derive(Debug, Default)]
pub struct Store {
    /// card_information rows by id
    cards: DashMap<CardId, CardRecord>,

    /// Unique index: card key -> card id
    card_index: DashMap<CardKey, CardId>,

    /// payment_status rows by id
    payments: DashMap<PaymentId, PaymentStatusRecord>,

    card_sequence: AtomicU64,
    payment_sequence: AtomicU64,

    /// Serializes commits
    commit_lock: Mutex<()>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a transaction
    pub fn begin(&self) -> StoreTransaction<'_> {
        StoreTransaction {
            store: self,
            pending: Vec::new(),
            committed: false,
        }
    }

    /// Run `f` as one unit of work
    ///
    /// Commits when `f` returns `Ok` and rolls back when it returns `Err`.
    /// A failed commit is returned as a storage error.
    pub fn transaction<T, F>(&self, f: F) -> Result<T, GatewayError>
    where
        F: FnOnce(&mut StoreTransaction<'_>) -> Result<T, GatewayError>,
    {
        let mut tx = self.begin();
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(error) => {
                tx.rollback();
                Err(error)
            }
        }
    }

    /// Look up a card by id
    pub fn card(&self, card_id: CardId) -> Option<CardRecord> {
        self.cards.get(&card_id).map(|entry| entry.value().clone())
    }

    /// Look up a card through the unique index
    pub fn card_by_key(&self, key: &CardKey) -> Option<CardRecord> {
        let card_id = *self.card_index.get(key)?.value();
        self.card(card_id)
    }

    /// Look up a payment status by id
    pub fn payment(&self, payment_id: PaymentId) -> Option<PaymentStatusRecord> {
        self.payments
            .get(&payment_id)
            .map(|entry| entry.value().clone())
    }

    /// All payment statuses, ordered by id
    pub fn payments(&self) -> Vec<PaymentStatusRecord> {
        let mut payments: Vec<_> = self
            .payments
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        payments.sort_by_key(|payment| payment.id);
        payments
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    fn next_card_id(&self) -> CardId {
        self.card_sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn next_payment_id(&self) -> PaymentId {
        self.payment_sequence.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[derive(Debug)]
enum PendingWrite {
    Card(CardRecord),
    Payment(PaymentStatusRecord),
}

/// Scoped write transaction on a [`Store`]
///
/// Must be finished with [`commit`](Self::commit); any other exit path,
/// including an early return or a panic, rolls the staged writes back.
#[derive(Debug)]
pub struct StoreTransaction<'a> {
    store: &'a Store,
    pending: Vec<PendingWrite>,
    committed: bool,
}

impl StoreTransaction<'_> {
    /// Stage a new card row and return its id
    pub fn insert_card(
        &mut self,
        owner_name: &str,
        card_number: &str,
        expiration_date: &str,
        ccv: &str,
    ) -> CardId {
        let id = self.store.next_card_id();
        self.pending.push(PendingWrite::Card(CardRecord {
            id,
            owner_name: owner_name.to_string(),
            card_number: card_number.to_string(),
            expiration_date: expiration_date.to_string(),
            ccv: ccv.to_string(),
        }));
        id
    }

    /// Stage a new payment status row and return its id
    pub fn insert_payment(
        &mut self,
        card_id: CardId,
        amount: Decimal,
        currency: &str,
        status: &str,
        message: &str,
    ) -> PaymentId {
        let id = self.store.next_payment_id();
        self.pending.push(PendingWrite::Payment(PaymentStatusRecord {
            id,
            card_id,
            amount,
            currency: currency.to_string(),
            status: status.to_string(),
            message: message.to_string(),
        }));
        id
    }

    /// Apply all staged writes atomically
    ///
    /// # Errors
    ///
    /// - `UniqueViolation` if a staged card's key already exists (or is staged twice)
    /// - `ForeignKeyViolation` if a staged payment references an unknown card
    ///
    /// On error nothing is applied.
    pub fn commit(mut self) -> Result<(), StorageError> {
        let store = self.store;
        let _guard = store
            .commit_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        self.check_constraints()?;

        let writes = std::mem::take(&mut self.pending);
        let count = writes.len();
        for write in writes {
            match write {
                PendingWrite::Card(card) => {
                    let key = card.key();
                    let id = card.id;
                    // Row first, index second: readers going through the index
                    // always find the row.
                    store.cards.insert(id, card);
                    store.card_index.insert(key, id);
                }
                PendingWrite::Payment(payment) => {
                    store.payments.insert(payment.id, payment);
                }
            }
        }

        self.committed = true;
        tracing::trace!(writes = count, "store transaction committed");
        Ok(())
    }

    /// Discard all staged writes
    pub fn rollback(self) {
        // Dropping does the work
    }

    fn check_constraints(&self) -> Result<(), StorageError> {
        let mut staged_keys = HashSet::new();
        let mut staged_cards = HashSet::new();

        for write in &self.pending {
            if let PendingWrite::Card(card) = write {
                let key = card.key();
                if self.store.card_index.contains_key(&key) || !staged_keys.insert(key) {
                    return Err(StorageError::UniqueViolation {
                        constraint: UNIQUE_CREDIT_CARD,
                    });
                }
                staged_cards.insert(card.id);
            }
        }

        for write in &self.pending {
            if let PendingWrite::Payment(payment) = write {
                if !staged_cards.contains(&payment.card_id)
                    && !self.store.cards.contains_key(&payment.card_id)
                {
                    return Err(StorageError::ForeignKeyViolation {
                        card_id: payment.card_id,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Drop for StoreTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.pending.is_empty() {
            tracing::debug!(
                writes = self.pending.len(),
                "store transaction rolled back"
            );
        }
    }
}
