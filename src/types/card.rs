//! Card-related types for the card payment gateway
//!
//! Cards are deduplicated by their [`CardKey`]. The owner name is stored but
//! plays no part in identity: the first owner name seen for a key is the one
//! kept.

/// Card identifier
///
/// Assigned by the store on creation, starting at 1.
pub type CardId = u64;

/// Uniqueness key of a card: number, CCV and expiration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub card_number: String,
    pub ccv: String,
    pub expiration_date: String,
}

impl CardKey {
    pub fn new(card_number: &str, ccv: &str, expiration_date: &str) -> Self {
        Self {
            card_number: card_number.to_string(),
            ccv: ccv.to_string(),
            expiration_date: expiration_date.to_string(),
        }
    }
}

/// Persistent card record
///
/// Created on first sight of a key, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    /// Store-assigned identifier
    pub id: CardId,

    /// Owner name recorded on first insert
    pub owner_name: String,

    pub card_number: String,

    /// Expiration date in MM/YY format
    pub expiration_date: String,

    pub ccv: String,
}

impl CardRecord {
    /// The uniqueness key of this record
    pub fn key(&self) -> CardKey {
        CardKey::new(&self.card_number, &self.ccv, &self.expiration_date)
    }
}
