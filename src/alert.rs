//! Alert system for displaying success and error messages to users.
//!
//! Every operation outcome the user should hear about, good or bad, is turned
//! into an [Alert] so the front end has one way of presenting it.

use std::fmt::Display;

/// A message for the user with a short headline and optional details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The operation went through.
    Success {
        /// The headline.
        message: String,
        /// Extra lines shown under the headline, may be empty.
        details: String,
    },
    /// The operation was rejected and nothing was changed.
    Error {
        /// The headline.
        message: String,
        /// What went wrong and how to fix it, may be empty.
        details: String,
    },
}

impl Alert {
    /// Create a new success alert.
    pub fn success(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
            details: details.into(),
        }
    }

    /// Create a new success alert without details.
    pub fn success_simple(message: impl Into<String>) -> Self {
        Self::success(message, "")
    }

    /// Create a new error alert without details.
    pub fn error_simple(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            details: String::new(),
        }
    }

    /// Whether the alert reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (icon, message, details) = match self {
            Alert::Success { message, details } => ("✅", message, details),
            Alert::Error { message, details } => ("❌", message, details),
        };

        write!(f, "{icon} {message}")?;

        if !details.is_empty() {
            write!(f, "\n{details}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod alert_tests {
    use super::Alert;

    #[test]
    fn display_omits_empty_details() {
        assert_eq!(
            Alert::success_simple("All data has been cleared.").to_string(),
            "✅ All data has been cleared."
        );
    }

    #[test]
    fn display_puts_details_on_next_line() {
        let alert = Alert::Error {
            message: "Invalid amount".to_owned(),
            details: "Please enter a valid amount.".to_owned(),
        };

        assert_eq!(
            alert.to_string(),
            "❌ Invalid amount\nPlease enter a valid amount."
        );
        assert!(alert.is_error());
    }
}
