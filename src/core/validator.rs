//! Field validation for payment submissions
//!
//! The validator turns a raw [`TransactionRequest`] into a
//! [`ValidatedTransaction`], or reports the first field that fails its rule.
//! Fields are checked in a fixed order:
//!
//! 1. `card_owner` - two alphabetic tokens separated by one whitespace character
//! 2. `card_number` - 16 ASCII digits passing the Luhn checksum
//! 3. `expiration_date` - `MM/YY`, strictly later than now
//! 4. `ccv` - 3 ASCII digits
//! 5. `amount` - strictly positive
//! 6. `currency` - 3 ASCII letters
//!
//! Validation performs no I/O. The only outside input is the current time,
//! read through a [`Clock`] so the expiration rule can be pinned in tests.

use crate::core::traits::Clock;
use crate::types::{
    ExpirationDate, FieldValidationError, TransactionField, TransactionRequest,
    ValidatedTransaction,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::{Arc, LazyLock};

pub const INVALID_CARD_OWNER: &str =
    "Invalid card owner name format. Use 'Firstname Lastname' format.";
pub const INVALID_CARD_NUMBER: &str = "Invalid credit card number format.";
pub const INVALID_DATE_FORMAT: &str = "Invalid date format. Use MM/YY format.";
pub const EXPIRED_DATE: &str = "Expiration date must be greater than the current date.";
pub const INVALID_CCV: &str = "Invalid CCV format. Use a three-digit number.";
pub const INVALID_AMOUNT: &str = "Invalid amount. The amount must be greater than 0.";
pub const INVALID_CURRENCY: &str = "Invalid currency format. Use a three-letter code.";

static CARD_OWNER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+\s[A-Za-z]+$").expect("card owner pattern"));
static CARD_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("card number pattern"));
static EXPIRATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}$").expect("expiration pattern"));
static CCV_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("ccv pattern"));
static CURRENCY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}$").expect("currency pattern"));

/// Clock reading the host's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Freeze the clock at midnight of the given day
    pub fn at_date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Validator for raw payment submissions
#[derive(Clone)]
pub struct TransactionValidator {
    clock: Arc<dyn Clock>,
}

impl TransactionValidator {
    /// Create a validator reading the current time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Validate a submission, stopping at the first failing field
    ///
    /// # Errors
    ///
    /// Returns the [`FieldValidationError`] of the first field, in declaration
    /// order, that breaks its rule.
    pub fn validate(
        &self,
        request: &TransactionRequest,
    ) -> Result<ValidatedTransaction, FieldValidationError> {
        validate_card_owner(&request.card_owner)?;
        validate_card_number(&request.card_number)?;
        let expiration_date = validate_expiration_date(&request.expiration_date, self.clock.now())?;
        validate_ccv(&request.ccv)?;
        validate_amount(request.amount)?;
        validate_currency(&request.currency)?;

        Ok(ValidatedTransaction {
            card_owner: request.card_owner.clone(),
            card_number: request.card_number.clone(),
            expiration_date,
            ccv: request.ccv.clone(),
            amount: request.amount,
            currency: request.currency.clone(),
        })
    }
}

impl Default for TransactionValidator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for TransactionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionValidator").finish_non_exhaustive()
    }
}

pub(crate) fn validate_card_owner(card_owner: &str) -> Result<(), FieldValidationError> {
    if CARD_OWNER_PATTERN.is_match(card_owner) {
        Ok(())
    } else {
        Err(FieldValidationError::new(
            TransactionField::CardOwner,
            INVALID_CARD_OWNER,
        ))
    }
}

pub(crate) fn validate_card_number(card_number: &str) -> Result<(), FieldValidationError> {
    if CARD_NUMBER_PATTERN.is_match(card_number) && luhn_checksum_valid(card_number) {
        Ok(())
    } else {
        Err(FieldValidationError::new(
            TransactionField::CardNumber,
            INVALID_CARD_NUMBER,
        ))
    }
}

/// Luhn mod-10 checksum
///
/// Counting from the rightmost digit as position 1, digits at even positions
/// are doubled (minus 9 when the result exceeds 9) and everything is summed.
/// Returns false for anything containing a non-digit.
pub fn luhn_checksum_valid(number: &str) -> bool {
    let mut sum = 0;

    for (index, ch) in number.chars().rev().enumerate() {
        let Some(digit) = ch.to_digit(10) else {
            return false;
        };

        sum += if index % 2 == 1 {
            let doubled = digit * 2;
            if doubled > 9 {
                doubled - 9
            } else {
                doubled
            }
        } else {
            digit
        };
    }

    sum % 10 == 0
}

/// Parse `MM/YY` into a month and four digit year
///
/// Two digit years follow the POSIX pivot: 00-68 map to 2000-2068 and
/// 69-99 to 1969-1999.
pub fn parse_expiration_date(expiration_date: &str) -> Option<ExpirationDate> {
    if !EXPIRATION_PATTERN.is_match(expiration_date) {
        return None;
    }

    let (month, year) = expiration_date.split_once('/')?;
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;

    if !(1..=12).contains(&month) {
        return None;
    }

    let year = if year < 69 { 2000 + year } else { 1900 + year };
    Some(ExpirationDate { month, year })
}

/// Validate the expiration date against `now`
///
/// The card is taken to expire at midnight on the first day of its month, so
/// a card expiring in the current month is already rejected.
pub fn validate_expiration_date(
    expiration_date: &str,
    now: NaiveDateTime,
) -> Result<ExpirationDate, FieldValidationError> {
    let format_error =
        || FieldValidationError::new(TransactionField::ExpirationDate, INVALID_DATE_FORMAT);

    let parsed = parse_expiration_date(expiration_date).ok_or_else(format_error)?;
    let expires_at = NaiveDate::from_ymd_opt(parsed.year, parsed.month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(format_error)?;

    if expires_at <= now {
        return Err(FieldValidationError::new(
            TransactionField::ExpirationDate,
            EXPIRED_DATE,
        ));
    }

    Ok(parsed)
}

pub(crate) fn validate_ccv(ccv: &str) -> Result<(), FieldValidationError> {
    if CCV_PATTERN.is_match(ccv) {
        Ok(())
    } else {
        Err(FieldValidationError::new(TransactionField::Ccv, INVALID_CCV))
    }
}

pub(crate) fn validate_amount(amount: Decimal) -> Result<(), FieldValidationError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(FieldValidationError::new(
            TransactionField::Amount,
            INVALID_AMOUNT,
        ))
    }
}

pub(crate) fn validate_currency(currency: &str) -> Result<(), FieldValidationError> {
    if CURRENCY_PATTERN.is_match(currency) {
        Ok(())
    } else {
        Err(FieldValidationError::new(
            TransactionField::Currency,
            INVALID_CURRENCY,
        ))
    }
}
