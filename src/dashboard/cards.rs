//! Summary cards for the goals shown on the dashboard.

use crate::{
    format::truncate_summary,
    goal::{Goal, GoalId},
    transaction::Amount,
};

/// How many goals the dashboard shows.
pub const RECENT_GOALS_LIMIT: usize = 4;

/// A condensed view of a goal for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalCard {
    /// The ID of the goal, for looking up the details.
    pub id: GoalId,
    /// The goal name.
    pub name: String,
    /// The description, cut to [crate::format::SUMMARY_LENGTH] characters.
    pub summary: String,
    /// The amount saved so far.
    pub current_amount: Amount,
    /// The target amount.
    pub target_amount: Amount,
    /// The capped progress percentage.
    pub progress: u32,
}

impl From<&Goal> for GoalCard {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id,
            name: goal.name.to_string(),
            summary: truncate_summary(&goal.description),
            current_amount: goal.current_amount,
            target_amount: goal.target_amount,
            progress: goal.progress(),
        }
    }
}

/// The cards for the first [RECENT_GOALS_LIMIT] goals, in ledger order.
pub fn recent_goals(goals: &[Goal]) -> Vec<GoalCard> {
    goals
        .iter()
        .take(RECENT_GOALS_LIMIT)
        .map(GoalCard::from)
        .collect()
}
