//! Defines the app level error type and its conversion to user-facing alerts.

use crate::{alert::Alert, goal::GoalId, transaction::Amount, ussd::USSD_MINIMUM_AMOUNT};

/// The broad classes of failure an operation can end in.
///
/// Every class is recoverable: the operation is aborted, the ledger is left
/// as it was and the user is shown a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input.
    Validation,
    /// The operation referenced a goal that does not exist.
    NotFound,
    /// Stored or imported data has the wrong shape.
    Format,
    /// The backing store could not be read or written.
    Storage,
    /// The application settings are invalid.
    Configuration,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string (or only whitespace) was used as a goal name.
    #[error("goal name cannot be empty")]
    EmptyGoalName,

    /// A goal was given a target amount that is zero or negative.
    #[error("{0} is not a valid target amount, the target must be greater than zero")]
    InvalidTargetAmount(Amount),

    /// A transaction was given an amount that is zero or negative.
    #[error("{0} is not a valid amount, the amount must be greater than zero")]
    InvalidAmount(Amount),

    /// A deposit would take a goal's saved amount past the largest amount
    /// that can be stored.
    #[error("adding {amount} to the saved amount of {current} is too large to store")]
    AmountTooLarge {
        /// The amount already saved towards the goal.
        current: Amount,
        /// The amount the user tried to add.
        amount: Amount,
    },

    /// User input could not be parsed as a whole number amount.
    #[error("\"{0}\" is not a whole number amount")]
    InvalidAmountText(String),

    /// A USSD payment was started with less than [USSD_MINIMUM_AMOUNT].
    #[error("{0} is below the minimum USSD payment of {min}", min = USSD_MINIMUM_AMOUNT)]
    BelowUssdMinimum(Amount),

    /// A USSD payment step was attempted out of order, e.g. confirming before
    /// a provider was chosen.
    #[error("the USSD payment cannot {0} at this step")]
    UssdStepOutOfOrder(&'static str),

    /// The savings widget was given more than the balance left on its goal.
    #[error("{amount} exceeds the remaining balance of {remaining}")]
    ExceedsRemainingBalance {
        /// The amount the user tried to add.
        amount: f64,
        /// What was left to save.
        remaining: f64,
    },

    /// The savings widget was given a zero, negative or non-finite amount.
    #[error("{0} is not a valid savings amount")]
    InvalidSavingsAmount(f64),

    /// The text did not name one of the goal categories.
    #[error("\"{0}\" is not a goal category")]
    InvalidCategory(String),

    /// The text was neither "all" nor a goal ID.
    #[error("\"{0}\" is not a valid goal filter, use \"all\" or a goal ID")]
    InvalidGoalFilter(String),

    /// The text could not be parsed as a `YYYY-MM-DD` date.
    #[error("\"{0}\" is not a valid deadline, use the format YYYY-MM-DD")]
    InvalidDeadline(String),

    /// No goal exists with the given ID.
    ///
    /// The goal may have been deleted after the caller read its ID.
    #[error("goal {0} could not be found")]
    GoalNotFound(GoalId),

    /// Stored or imported data could not be parsed into goals.
    #[error("invalid data format: {0}")]
    InvalidFormat(String),

    /// The serialized ledger is larger than the store allows.
    #[error("storage quota exceeded: {needed} bytes needed but only {quota} bytes are allowed")]
    QuotaExceeded {
        /// The size of the value that was being written.
        needed: usize,
        /// The maximum number of bytes the store accepts.
        quota: usize,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// A file could not be read or written.
    #[error("file error: {0}")]
    IoError(String),

    /// The canonical timezone name could not be resolved.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl Error {
    /// The class of failure this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyGoalName
            | Error::InvalidTargetAmount(_)
            | Error::InvalidAmount(_)
            | Error::AmountTooLarge { .. }
            | Error::InvalidAmountText(_)
            | Error::BelowUssdMinimum(_)
            | Error::UssdStepOutOfOrder(_)
            | Error::ExceedsRemainingBalance { .. }
            | Error::InvalidSavingsAmount(_)
            | Error::InvalidCategory(_)
            | Error::InvalidGoalFilter(_)
            | Error::InvalidDeadline(_) => ErrorKind::Validation,
            Error::GoalNotFound(_) => ErrorKind::NotFound,
            Error::InvalidFormat(_) => ErrorKind::Format,
            Error::QuotaExceeded { .. } | Error::SqlError(_) | Error::IoError(_) => {
                ErrorKind::Storage
            }
            Error::InvalidTimezoneError(_) => ErrorKind::Configuration,
        }
    }

    /// Convert the error into an alert that can be shown to the user.
    pub fn into_alert(self) -> Alert {
        let (message, details) = match self {
            Error::EmptyGoalName | Error::InvalidTargetAmount(_) => (
                "Invalid goal",
                "Please enter a valid goal name and target amount.".to_owned(),
            ),
            Error::InvalidAmount(_) | Error::InvalidAmountText(_) => (
                "Invalid amount",
                "Please enter a valid amount.".to_owned(),
            ),
            Error::BelowUssdMinimum(_) => (
                "Invalid amount",
                format!("Please enter a valid amount (minimum Tzs. {USSD_MINIMUM_AMOUNT})."),
            ),
            Error::AmountTooLarge { .. } => (
                "Invalid amount",
                "The amount is too large to add to this goal.".to_owned(),
            ),
            Error::ExceedsRemainingBalance { .. } => (
                "Invalid amount",
                "Amount exceeds remaining balance!".to_owned(),
            ),
            Error::GoalNotFound(id) => (
                "Goal not found",
                format!(
                    "Could not find a goal with the ID {id}. \
                    It may have already been deleted."
                ),
            ),
            Error::InvalidFormat(details) => ("Invalid data format", details),
            Error::QuotaExceeded { .. } => (
                "Could not save data",
                "Your storage might be full.".to_owned(),
            ),
            Error::SqlError(error) => {
                tracing::error!("An unexpected SQL error occurred: {error}");
                (
                    "Could not save data",
                    "An unexpected error occurred, please try again.".to_owned(),
                )
            }
            Error::InvalidTimezoneError(timezone) => (
                "Invalid timezone settings",
                format!(
                    "Could not get local timezone \"{timezone}\". Ensure the timezone has \
                    been set to a valid, canonical timezone string."
                ),
            ),
            error => ("Error", error.to_string()),
        };

        Alert::Error {
            message: message.to_owned(),
            details,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IoError(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::InvalidFormat(value.to_string())
    }
}

#[cfg(test)]
mod error_kind_tests {
    use crate::{Error, ErrorKind};

    #[test]
    fn input_errors_are_validation_errors() {
        assert_eq!(Error::EmptyGoalName.kind(), ErrorKind::Validation);
        assert_eq!(Error::InvalidAmount(0).kind(), ErrorKind::Validation);
        assert_eq!(Error::BelowUssdMinimum(99).kind(), ErrorKind::Validation);
    }

    #[test]
    fn missing_goal_is_not_found() {
        assert_eq!(Error::GoalNotFound(3).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn quota_is_storage_error() {
        let error = Error::QuotaExceeded {
            needed: 10,
            quota: 5,
        };

        assert_eq!(error.kind(), ErrorKind::Storage);
    }

    #[test]
    fn json_errors_become_format_errors() {
        let json_error = serde_json::from_str::<Vec<i64>>("{").unwrap_err();

        assert_eq!(Error::from(json_error).kind(), ErrorKind::Format);
    }
}
