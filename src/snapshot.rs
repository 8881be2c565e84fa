//! Converts the goal collection to and from its serialized forms.
//!
//! There are two forms:
//! - the flat store blob, a JSON array of goals,
//! - the export document, a JSON object with the goals and some totals that
//!   users download as a backup and import later.
//!
//! Both forms are checked against the goal invariants when read, so a
//! hand-edited or truncated file cannot put the ledger into an inconsistent
//! state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    dashboard::aggregate_stats,
    goal::{Category, DEFAULT_DESCRIPTION, Goal, GoalId, GoalName},
    transaction::{Amount, AmountTotal, Transaction},
};

/// The note on the transaction created for goals saved before transactions
/// were recorded.
pub const OPENING_BALANCE_NOTE: &str = "Opening balance";

/// The backup document users download and import.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    /// Every goal in the ledger.
    pub goals: &'a [Goal],
    /// When the export was made.
    #[serde(with = "time::serde::rfc3339")]
    pub export_date: OffsetDateTime,
    /// How many goals were exported.
    pub total_goals: usize,
    /// The sum of the saved amounts.
    pub total_saved: AmountTotal,
    /// The sum of the target amounts.
    pub total_target: AmountTotal,
}

impl<'a> ExportDocument<'a> {
    /// Create the export document for `goals` made at `export_date`.
    pub fn new(goals: &'a [Goal], export_date: OffsetDateTime) -> Self {
        let stats = aggregate_stats(goals);

        Self {
            goals,
            export_date,
            total_goals: stats.total_goals,
            total_saved: stats.total_saved,
            total_target: stats.total_target,
        }
    }

    /// Serialize the document as indented JSON.
    ///
    /// # Errors
    /// Returns an [Error::InvalidFormat] if the goals cannot be serialized.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The file name for an export made on `date`, e.g.
/// "savings-backup-2026-10-18.json".
pub fn export_file_name(date: Date) -> String {
    // `Date`'s display form is already YYYY-MM-DD.
    format!("savings-backup-{date}.json")
}

/// Serialize `goals` into the flat store blob.
///
/// # Errors
/// Returns an [Error::InvalidFormat] if the goals cannot be serialized.
pub fn encode_goals(goals: &[Goal]) -> Result<String, Error> {
    Ok(serde_json::to_string(goals)?)
}

/// Read goals back from the flat store blob written by [encode_goals].
///
/// `local_offset` is used to format the date of any backfilled transaction.
///
/// # Errors
/// Returns an [Error::InvalidFormat] if `blob` is not a JSON array of valid
/// goals.
pub fn decode_goals(blob: &str, local_offset: UtcOffset) -> Result<Vec<Goal>, Error> {
    let records: Vec<GoalRecord> = serde_json::from_str(blob)?;

    into_goals(records, local_offset)
}

/// Read goals from an imported file.
///
/// The file must be a JSON object with a `goals` array, like the document
/// written by [ExportDocument]. Any other fields are ignored.
///
/// # Errors
/// Returns an [Error::InvalidFormat] if `blob` is not JSON, has no `goals`
/// array, or the goals are not valid.
pub fn parse_import(blob: &str, local_offset: UtcOffset) -> Result<Vec<Goal>, Error> {
    let document: Value = serde_json::from_str(blob)?;

    let goals = match document.get("goals") {
        Some(goals @ Value::Array(_)) => goals.clone(),
        _ => {
            return Err(Error::InvalidFormat(
                "the file does not contain a list of goals".to_owned(),
            ));
        }
    };

    let records: Vec<GoalRecord> = serde_json::from_value(goals)?;

    into_goals(records, local_offset)
}

/// A goal as it is found in stored data, before it has been checked.
///
/// Older snapshots may lack the transaction list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalRecord {
    id: GoalId,
    name: GoalName,
    #[serde(default = "default_description")]
    description: String,
    #[serde(default)]
    category: Category,
    target_amount: Amount,
    current_amount: Amount,
    #[serde(default)]
    deadline: Option<Value>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
    transactions: Option<Vec<Transaction>>,
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_owned()
}

fn into_goals(records: Vec<GoalRecord>, local_offset: UtcOffset) -> Result<Vec<Goal>, Error> {
    let mut goal_ids = HashSet::new();

    records
        .into_iter()
        .map(|record| {
            if !goal_ids.insert(record.id) {
                return Err(Error::InvalidFormat(format!(
                    "goal ID {} is used more than once",
                    record.id
                )));
            }

            into_goal(record, local_offset)
        })
        .collect()
}

fn into_goal(record: GoalRecord, local_offset: UtcOffset) -> Result<Goal, Error> {
    let id = record.id;
    let invalid = |reason: String| Error::InvalidFormat(format!("goal {id}: {reason}"));

    if record.target_amount <= 0 {
        return Err(invalid(format!(
            "target amount {} must be greater than zero",
            record.target_amount
        )));
    }

    if record.current_amount < 0 {
        return Err(invalid(format!(
            "current amount {} cannot be negative",
            record.current_amount
        )));
    }

    let deadline = match record.deadline {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            serde_json::from_value::<DeadlineRecord>(value)
                .map_err(|error| invalid(format!("invalid deadline: {error}")))?
                .0,
        ),
    };

    let transactions = match record.transactions {
        Some(transactions) => {
            check_transactions(&transactions, record.current_amount).map_err(invalid)?;
            transactions
        }
        None => {
            tracing::warn!("Goal {id} has no transaction list, creating one");
            backfill_transactions(record.current_amount, record.updated_at, local_offset)?
        }
    };

    Ok(Goal {
        id,
        name: record.name,
        description: record.description,
        category: record.category,
        target_amount: record.target_amount,
        current_amount: record.current_amount,
        deadline,
        created_at: record.created_at,
        updated_at: record.updated_at,
        transactions,
    })
}

time::serde::format_description!(deadline_record_format, Date, "[year]-[month]-[day]");

#[derive(Deserialize)]
struct DeadlineRecord(#[serde(with = "deadline_record_format")] Date);

fn check_transactions(transactions: &[Transaction], current_amount: Amount) -> Result<(), String> {
    let mut ids = HashSet::new();

    for transaction in transactions {
        if !ids.insert(transaction.id) {
            return Err(format!(
                "transaction ID {} is used more than once",
                transaction.id
            ));
        }

        if transaction.amount <= 0 {
            return Err(format!(
                "transaction {} has amount {}, amounts must be greater than zero",
                transaction.id, transaction.amount
            ));
        }
    }

    let total = transactions
        .iter()
        .try_fold(0 as Amount, |total, transaction| {
            total.checked_add(transaction.amount)
        })
        .ok_or_else(|| "the transaction total is too large to store".to_owned())?;

    if total != current_amount {
        return Err(format!(
            "current amount {current_amount} does not match the transaction total {total}"
        ));
    }

    Ok(())
}

/// Create the transaction list for a goal stored without one.
///
/// A goal with savings gets a single opening balance transaction so the saved
/// amount still equals the transaction total.
fn backfill_transactions(
    current_amount: Amount,
    updated_at: OffsetDateTime,
    local_offset: UtcOffset,
) -> Result<Vec<Transaction>, Error> {
    if current_amount == 0 {
        return Ok(Vec::new());
    }

    let opening_balance = Transaction::new(
        1,
        current_amount,
        Some(OPENING_BALANCE_NOTE),
        updated_at,
        local_offset,
    )?;

    Ok(vec![opening_balance])
}

#[cfg(test)]
mod encode_decode_tests {
    use time::{
        UtcOffset,
        macros::{date, datetime},
    };

    use crate::{
        goal::{Category, Goal},
        snapshot::{decode_goals, encode_goals},
        transaction::Transaction,
    };

    fn sample_goals() -> Vec<Goal> {
        let mut laptop = Goal::build("Laptop", 1000)
            .category(Category::Electronics)
            .finalize(1, datetime!(2025-01-01 8:00 UTC))
            .unwrap();
        for (id, amount) in [(1, 300), (2, 200)] {
            let transaction = Transaction::new(
                id,
                amount,
                None,
                datetime!(2025-01-02 8:00 UTC),
                UtcOffset::UTC,
            )
            .unwrap();
            laptop.current_amount += amount;
            laptop.transactions.insert(0, transaction);
        }

        let trip = Goal::build("Trip", 500)
            .deadline(Some(date!(2025 - 12 - 20)))
            .finalize(2, datetime!(2025-01-03 8:00 UTC))
            .unwrap();

        vec![laptop, trip]
    }

    #[test]
    fn decode_reproduces_encoded_goals() {
        let goals = sample_goals();

        let blob = encode_goals(&goals).unwrap();
        let decoded = decode_goals(&blob, UtcOffset::UTC).unwrap();

        assert_eq!(decoded, goals);
    }

    #[test]
    fn blob_is_a_json_array() {
        let blob = encode_goals(&sample_goals()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn deadline_survives_round_trip() {
        let blob = encode_goals(&sample_goals()).unwrap();

        let decoded = decode_goals(&blob, UtcOffset::UTC).unwrap();

        assert_eq!(decoded[0].deadline, None);
        assert_eq!(decoded[1].deadline, Some(date!(2025 - 12 - 20)));
    }

    #[test]
    fn decode_fails_on_garbage() {
        assert!(decode_goals("not json", UtcOffset::UTC).is_err());
        assert!(decode_goals("{\"goals\": []}", UtcOffset::UTC).is_err());
    }
}
