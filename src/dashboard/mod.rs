//! Dashboard module
//!
//! Provides the overview figures across all goals and the summary cards for
//! the goals shown on the dashboard.

mod aggregation;
mod cards;

pub use aggregation::{DashboardStats, aggregate_stats};
pub use cards::{GoalCard, RECENT_GOALS_LIMIT, recent_goals};
