//! Totals and averages across all goals for the dashboard.

use serde::Serialize;

use crate::{
    goal::{Goal, uncapped_percent},
    transaction::{Amount, AmountTotal},
};

/// Summary figures across every goal in the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// How many goals there are.
    pub total_goals: usize,
    /// The sum of the saved amounts.
    pub total_saved: AmountTotal,
    /// The sum of the target amounts.
    pub total_target: AmountTotal,
    /// The rounded mean of each goal's progress.
    ///
    /// Computed from the uncapped ratios, so an over-funded goal can pull the
    /// average above what the capped per-goal percentages suggest.
    pub avg_progress_percent: u32,
}

/// Aggregate the saved and target amounts of `goals`.
///
/// # Returns
/// All zeros when there are no goals.
pub fn aggregate_stats(goals: &[Goal]) -> DashboardStats {
    if goals.is_empty() {
        return DashboardStats::default();
    }

    let total_saved = sum_amounts(goals.iter().map(|goal| goal.current_amount));
    let total_target = sum_amounts(goals.iter().map(|goal| goal.target_amount));
    let percent_sum: f64 = goals.iter().map(uncapped_percent).sum();
    let avg_progress_percent = (percent_sum / goals.len() as f64).round() as u32;

    DashboardStats {
        total_goals: goals.len(),
        total_saved,
        total_target,
        avg_progress_percent,
    }
}

fn sum_amounts(amounts: impl Iterator<Item = Amount>) -> AmountTotal {
    amounts.map(AmountTotal::from).sum()
}
