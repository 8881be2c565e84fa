//! Progress calculations for a single goal.

use crate::{goal::Goal, transaction::Amount};

/// The goal's progress as a rounded percentage, capped at 100.
///
/// Division is safe because goals cannot be created with a target of zero.
pub fn compute_progress(goal: &Goal) -> u32 {
    uncapped_percent(goal).round().min(100.0) as u32
}

/// The saved amount as a percentage of the target, without rounding or a cap.
///
/// Over-funded goals give values above 100.
pub fn uncapped_percent(goal: &Goal) -> f64 {
    goal.current_amount as f64 / goal.target_amount as f64 * 100.0
}

/// How much is left to save, clamped at zero for over-funded goals.
pub fn remaining(goal: &Goal) -> Amount {
    (goal.target_amount - goal.current_amount).max(0)
}

/// How much has been saved past the target, zero if the target has not been
/// passed.
pub fn over_funded(goal: &Goal) -> Amount {
    (goal.current_amount - goal.target_amount).max(0)
}

#[cfg(test)]
mod progress_tests {
    use time::macros::datetime;

    use crate::goal::{Goal, compute_progress, over_funded, remaining, uncapped_percent};

    fn goal_with(target: i64, current: i64) -> Goal {
        let mut goal = Goal::build("Laptop", target)
            .finalize(1, datetime!(2025-01-01 0:00 UTC))
            .unwrap();
        goal.current_amount = current;
        goal
    }

    #[test]
    fn empty_goal_has_no_progress() {
        assert_eq!(compute_progress(&goal_with(1000, 0)), 0);
    }

    #[test]
    fn progress_is_rounded() {
        assert_eq!(compute_progress(&goal_with(3, 1)), 33);
        assert_eq!(compute_progress(&goal_with(3, 2)), 67);
        assert_eq!(compute_progress(&goal_with(1000, 300)), 30);
    }

    #[test]
    fn progress_is_capped_at_one_hundred() {
        let goal = goal_with(1000, 1500);

        assert_eq!(compute_progress(&goal), 100);
        assert_eq!(uncapped_percent(&goal), 150.0);
    }

    #[test]
    fn progress_never_decreases_as_savings_grow() {
        let mut previous = 0;

        for current in (0..=2000).step_by(37) {
            let progress = compute_progress(&goal_with(1000, current));
            assert!(progress >= previous, "{progress} < {previous} at {current}");
            assert!(progress <= 100);
            previous = progress;
        }
    }

    #[test]
    fn remaining_is_clamped_at_zero() {
        assert_eq!(remaining(&goal_with(1000, 300)), 700);
        assert_eq!(remaining(&goal_with(1000, 1100)), 0);
    }

    #[test]
    fn over_funded_reports_excess() {
        assert_eq!(over_funded(&goal_with(1000, 300)), 0);
        assert_eq!(over_funded(&goal_with(1000, 1100)), 100);
    }
}
