//! Savings goals.
//!
//! This module contains:
//! - The `Goal` model and the `NewGoal` builder for creating goals
//! - Goal categories and the validated `GoalName`
//! - Progress calculations for a single goal

mod core;
mod progress;

pub use core::{
    Category, DEFAULT_DESCRIPTION, Goal, GoalId, GoalName, NewGoal, parse_deadline,
};
pub use progress::{compute_progress, over_funded, remaining, uncapped_percent};
