//! Defines the core data model for deposit transactions.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// Identifier for a transaction, unique within its goal.
pub type TransactionId = i64;

/// A whole amount of money, e.g. Tanzanian shillings.
pub type Amount = i64;

/// A sum of amounts across goals, wide enough that it cannot overflow.
pub type AmountTotal = i128;

/// The note given to deposits made without one.
pub const DEFAULT_NOTE: &str = "Savings deposit";

/// The note given to deposits made with the quick add action.
pub const MANUAL_ADDITION_NOTE: &str = "Manual addition";

/// How transaction dates are shown, e.g. "5 Oct 2026 09:05".
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day padding:none] [month repr:short] [year] [hour]:[minute]");

// ============================================================================
// MODELS
// ============================================================================

/// A single deposit towards a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the deposit was made, formatted for display in the local timezone.
    pub date: String,
    /// The amount deposited, always greater than zero.
    pub amount: Amount,
    /// A text description of the deposit.
    pub note: String,
    /// When the deposit was made.
    ///
    /// This is the value to sort by; `date` is only for display.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// A blank or missing `note` is replaced by [DEFAULT_NOTE] and `date` is
    /// derived from `timestamp` shown at `local_offset`.
    ///
    /// # Errors
    /// Returns an [Error::InvalidAmount] if `amount` is not greater than zero.
    pub fn new(
        id: TransactionId,
        amount: Amount,
        note: Option<&str>,
        timestamp: OffsetDateTime,
        local_offset: UtcOffset,
    ) -> Result<Self, Error> {
        let amount = validate_amount(amount)?;

        let note = note
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .unwrap_or(DEFAULT_NOTE)
            .to_owned();

        Ok(Self {
            id,
            date: format_display_date(timestamp, local_offset)?,
            amount,
            note,
            timestamp,
        })
    }
}

// ============================================================================
// VALIDATION AND FORMATTING
// ============================================================================

/// Check that `amount` can be deposited.
///
/// # Errors
/// Returns an [Error::InvalidAmount] if `amount` is zero or negative.
pub fn validate_amount(amount: Amount) -> Result<Amount, Error> {
    if amount > 0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

/// Parse an amount typed in by the user.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmountText] if `text` is not a whole number,
/// - or [Error::InvalidAmount] if the number is not greater than zero.
pub fn parse_amount(text: &str) -> Result<Amount, Error> {
    let amount = text
        .trim()
        .parse::<Amount>()
        .map_err(|_| Error::InvalidAmountText(text.to_owned()))?;

    validate_amount(amount)
}

/// Format `timestamp` for display at `local_offset`, e.g. "5 Oct 2026 09:05".
///
/// # Errors
/// Returns an [Error::InvalidFormat] if the timestamp cannot be formatted.
pub fn format_display_date(
    timestamp: OffsetDateTime,
    local_offset: UtcOffset,
) -> Result<String, Error> {
    timestamp
        .to_offset(local_offset)
        .format(DISPLAY_DATE_FORMAT)
        .map_err(|error| Error::InvalidFormat(error.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod transaction_tests {
    use time::{
        UtcOffset,
        macros::{datetime, offset},
    };

    use crate::{
        Error,
        transaction::{DEFAULT_NOTE, Transaction},
    };

    #[test]
    fn new_formats_date_in_local_offset() {
        let transaction = Transaction::new(
            1,
            300,
            Some("Salary top up"),
            datetime!(2026-10-04 21:05 UTC),
            offset!(+3),
        )
        .unwrap();

        assert_eq!(transaction.date, "5 Oct 2026 00:05");
        assert_eq!(transaction.note, "Salary top up");
        assert_eq!(transaction.timestamp, datetime!(2026-10-04 21:05 UTC));
    }

    #[test]
    fn new_uses_default_note() {
        let now = datetime!(2026-10-04 9:30 UTC);

        let missing = Transaction::new(1, 300, None, now, UtcOffset::UTC).unwrap();
        let blank = Transaction::new(2, 300, Some("  "), now, UtcOffset::UTC).unwrap();

        assert_eq!(missing.note, DEFAULT_NOTE);
        assert_eq!(blank.note, DEFAULT_NOTE);
        assert_eq!(missing.date, "4 Oct 2026 09:30");
    }

    #[test]
    fn new_fails_on_zero_amount() {
        let result = Transaction::new(1, 0, None, datetime!(2026-10-04 9:30 UTC), UtcOffset::UTC);

        assert_eq!(result, Err(Error::InvalidAmount(0)));
    }

    #[test]
    fn new_fails_on_negative_amount() {
        let result =
            Transaction::new(1, -20, None, datetime!(2026-10-04 9:30 UTC), UtcOffset::UTC);

        assert_eq!(result, Err(Error::InvalidAmount(-20)));
    }
}

#[cfg(test)]
mod parse_amount_tests {
    use crate::{Error, transaction::parse_amount};

    #[test]
    fn parses_whole_numbers() {
        assert_eq!(parse_amount(" 2500 "), Ok(2500));
    }

    #[test]
    fn rejects_decimals_and_words() {
        assert_eq!(
            parse_amount("12.5"),
            Err(Error::InvalidAmountText("12.5".to_owned()))
        );
        assert_eq!(
            parse_amount("lots"),
            Err(Error::InvalidAmountText("lots".to_owned()))
        );
    }

    #[test]
    fn rejects_non_positive_numbers() {
        assert_eq!(parse_amount("0"), Err(Error::InvalidAmount(0)));
        assert_eq!(parse_amount("-100"), Err(Error::InvalidAmount(-100)));
    }
}
