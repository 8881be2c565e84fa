//! Defines the core data models for savings goals.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    goal::progress,
    transaction::{Amount, Transaction, TransactionId},
};

/// Identifier for a goal, unique within a ledger.
pub type GoalId = i64;

/// The description given to goals created without one.
pub const DEFAULT_DESCRIPTION: &str = "No description";

time::serde::format_description!(deadline_format, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// A validated, non-empty goal name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct GoalName(String);

impl GoalName {
    /// Create a goal name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyGoalName] if `name` is empty
    /// or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyGoalName)
        } else {
            Ok(Self(name.to_string()))
        }
    }
}

impl AsRef<str> for GoalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for GoalName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalName::new(s)
    }
}

impl TryFrom<String> for GoalName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GoalName::new(&value)
    }
}

impl From<GoalName> for String {
    fn from(value: GoalName) -> Self {
        value.0
    }
}

impl Display for GoalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a goal is being saved for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Phones, laptops and other gadgets.
    Electronics,
    /// Trips and holidays.
    Travel,
    /// School fees, courses and books.
    Education,
    /// Furniture, rent deposits and home improvements.
    Home,
    /// Cars, motorbikes and bicycles.
    Vehicle,
    /// A rainy day fund.
    Emergency,
    /// Anything else, including categories this version does not know about.
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// All categories in the order they are offered to the user.
    pub const ALL: [Category; 7] = [
        Category::Electronics,
        Category::Travel,
        Category::Education,
        Category::Home,
        Category::Vehicle,
        Category::Emergency,
        Category::Other,
    ];

    /// The lowercase name used in stored data and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Travel => "travel",
            Category::Education => "education",
            Category::Home => "home",
            Category::Vehicle => "vehicle",
            Category::Emergency => "emergency",
            Category::Other => "other",
        }
    }

    /// A symbol shown next to the goal name.
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Electronics => "💻",
            Category::Travel => "✈️",
            Category::Education => "🎓",
            Category::Home => "🏠",
            Category::Vehicle => "🚗",
            Category::Emergency => "🩺",
            Category::Other => "⭐",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Parse a category name, an empty string gives [Category::Other].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Ok(Category::Other);
        }

        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidCategory(s.to_owned()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named savings target and the deposits made towards it.
///
/// To create a new `Goal`, use [Goal::build] and hand the builder to the
/// ledger, which assigns the ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// The ID of the goal.
    pub id: GoalId,
    /// What the user calls the goal, e.g. "New Laptop".
    pub name: GoalName,
    /// A longer text about the goal.
    pub description: String,
    /// What the goal is being saved for.
    pub category: Category,
    /// The amount the user wants to save, always greater than zero.
    pub target_amount: Amount,
    /// The amount saved so far.
    ///
    /// Always the sum of the amounts in `transactions`. May exceed
    /// `target_amount` when the goal is over-funded.
    pub current_amount: Amount,
    /// The date the user wants to reach the target by, if any.
    #[serde(
        default,
        with = "deadline_format::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<Date>,
    /// When the goal was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the goal was created or last received a deposit.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Deposits towards the goal, newest first.
    pub transactions: Vec<Transaction>,
}

impl Goal {
    /// Create a new goal.
    ///
    /// Shortcut for [NewGoal] for discoverability.
    pub fn build(name: &str, target_amount: Amount) -> NewGoal {
        NewGoal {
            name: name.to_owned(),
            description: None,
            category: Category::Other,
            target_amount,
            deadline: None,
        }
    }

    /// The goal's progress as a percentage, capped at 100.
    pub fn progress(&self) -> u32 {
        progress::compute_progress(self)
    }

    /// How much is left to save, zero once the target has been reached.
    pub fn remaining(&self) -> Amount {
        progress::remaining(self)
    }

    /// How much has been saved beyond the target, zero if the target has not
    /// been passed.
    pub fn over_funded(&self) -> Amount {
        progress::over_funded(self)
    }

    /// The sum of the goal's transaction amounts, or `None` if the sum does
    /// not fit in an [Amount].
    pub fn transaction_total(&self) -> Option<Amount> {
        self.transactions
            .iter()
            .try_fold(0 as Amount, |total, transaction| {
                total.checked_add(transaction.amount)
            })
    }

    /// The ID the next transaction on this goal gets: one more than the
    /// largest existing transaction ID, or 1.
    pub fn next_transaction_id(&self) -> TransactionId {
        self.transactions
            .iter()
            .map(|transaction| transaction.id)
            .max()
            .map_or(1, |id| id + 1)
    }
}

/// A builder for creating [Goal] instances.
///
/// The name and target are validated when the ledger calls
/// [NewGoal::finalize], not when the builder is created.
#[derive(Debug, PartialEq, Clone)]
pub struct NewGoal {
    /// The goal name, surrounding whitespace is trimmed.
    pub name: String,

    /// Defaults to [DEFAULT_DESCRIPTION] when `None` or blank.
    pub description: Option<String>,

    /// Defaults to [Category::Other].
    pub category: Category,

    /// Must be greater than zero.
    pub target_amount: Amount,

    /// Optional date to reach the target by.
    pub deadline: Option<Date>,
}

impl NewGoal {
    /// Set the description of the goal.
    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_owned);
        self
    }

    /// Set the category of the goal.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the deadline of the goal.
    pub fn deadline(mut self, deadline: Option<Date>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Validate the builder and create the goal with the given `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyGoalName] if the name is empty or only whitespace,
    /// - or [Error::InvalidTargetAmount] if the target is not greater than zero.
    pub fn finalize(self, id: GoalId, now: OffsetDateTime) -> Result<Goal, Error> {
        let name = GoalName::new(&self.name)?;

        if self.target_amount <= 0 {
            return Err(Error::InvalidTargetAmount(self.target_amount));
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_owned();

        Ok(Goal {
            id,
            name,
            description,
            category: self.category,
            target_amount: self.target_amount,
            current_amount: 0,
            deadline: self.deadline,
            created_at: now,
            updated_at: now,
            transactions: Vec::new(),
        })
    }
}

/// Parse a deadline entered as `YYYY-MM-DD`.
///
/// # Errors
/// Returns an [Error::InvalidDeadline] if the text is not a valid date.
pub fn parse_deadline(text: &str) -> Result<Date, Error> {
    let format = time::macros::format_description!("[year]-[month]-[day]");

    Date::parse(text.trim(), format).map_err(|_| Error::InvalidDeadline(text.to_owned()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod goal_name_tests {
    use crate::{Error, goal::GoalName};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(GoalName::new(""), Err(Error::EmptyGoalName));
    }

    #[test]
    fn new_fails_on_whitespace() {
        assert_eq!(GoalName::new("  \t "), Err(Error::EmptyGoalName));
    }

    #[test]
    fn new_trims_name() {
        assert_eq!(GoalName::new("  Laptop ").unwrap().as_ref(), "Laptop");
    }
}

#[cfg(test)]
mod category_tests {
    use std::str::FromStr;

    use crate::{Error, goal::Category};

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(Category::from_str("Travel"), Ok(Category::Travel));
        assert_eq!(Category::from_str("vehicle"), Ok(Category::Vehicle));
    }

    #[test]
    fn empty_string_is_other() {
        assert_eq!(Category::from_str(""), Ok(Category::Other));
    }

    #[test]
    fn unknown_name_fails() {
        assert_eq!(
            Category::from_str("groceries"),
            Err(Error::InvalidCategory("groceries".to_owned()))
        );
    }

    #[test]
    fn unknown_stored_category_decodes_as_other() {
        let category: Category = serde_json::from_str("\"pets\"").unwrap();

        assert_eq!(category, Category::Other);
    }
}
