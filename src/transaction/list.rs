//! The combined transaction log across all goals.

use std::{fmt::Display, str::FromStr};

use crate::{
    Error,
    goal::{Goal, GoalId},
    transaction::Transaction,
};

/// Which goals to include in the transaction log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GoalFilter {
    /// Every goal, written as "all".
    #[default]
    All,
    /// A single goal.
    Goal(GoalId),
}

impl GoalFilter {
    fn includes(&self, goal_id: GoalId) -> bool {
        match self {
            GoalFilter::All => true,
            GoalFilter::Goal(id) => *id == goal_id,
        }
    }
}

impl FromStr for GoalFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("all") {
            return Ok(GoalFilter::All);
        }

        s.parse::<GoalId>()
            .map(GoalFilter::Goal)
            .map_err(|_| Error::InvalidGoalFilter(s.to_owned()))
    }
}

impl Display for GoalFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalFilter::All => write!(f, "all"),
            GoalFilter::Goal(id) => write!(f, "{id}"),
        }
    }
}

/// A transaction annotated with the goal it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEntry<'a> {
    /// The ID of the goal the transaction belongs to.
    pub goal_id: GoalId,
    /// The name of the goal the transaction belongs to.
    pub goal_name: &'a str,
    /// The transaction itself.
    pub transaction: &'a Transaction,
}

/// Flatten the transactions of `goals` into a single list, newest first.
///
/// Transactions are ordered by their timestamps. Transaction IDs are only
/// unique within a goal, so they are used to break ties, after the goal ID.
pub fn list_transactions(goals: &[Goal], filter: GoalFilter) -> Vec<TransactionEntry<'_>> {
    let mut entries: Vec<TransactionEntry> = goals
        .iter()
        .filter(|goal| filter.includes(goal.id))
        .flat_map(|goal| {
            goal.transactions
                .iter()
                .map(move |transaction| TransactionEntry {
                    goal_id: goal.id,
                    goal_name: goal.name.as_ref(),
                    transaction,
                })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.transaction
            .timestamp
            .cmp(&a.transaction.timestamp)
            .then(b.goal_id.cmp(&a.goal_id))
            .then(b.transaction.id.cmp(&a.transaction.id))
    });

    entries
}

#[cfg(test)]
mod goal_filter_tests {
    use std::str::FromStr;

    use crate::{Error, transaction::GoalFilter};

    #[test]
    fn parses_all() {
        assert_eq!(GoalFilter::from_str("all"), Ok(GoalFilter::All));
        assert_eq!(GoalFilter::from_str("ALL"), Ok(GoalFilter::All));
    }

    #[test]
    fn parses_goal_id() {
        assert_eq!(GoalFilter::from_str("12"), Ok(GoalFilter::Goal(12)));
    }

    #[test]
    fn rejects_other_text() {
        assert_eq!(
            GoalFilter::from_str("laptop"),
            Err(Error::InvalidGoalFilter("laptop".to_owned()))
        );
    }
}
