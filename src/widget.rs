//! A single-goal savings tracker with a countdown to the target.
//!
//! The widget is separate from the ledger: it tracks one fixed goal in
//! dollars and cents and counts the days left at a fixed daily saving rate.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, format::format_dollars};

/// The goal the widget tracks.
pub const WIDGET_GOAL_NAME: &str = "New Laptop";

/// The widget's target amount.
pub const WIDGET_TARGET: f64 = 800.0;

/// The amount the widget starts with.
pub const WIDGET_STARTING_SAVINGS: f64 = 520.0;

/// How much the plan expects to be saved each day.
pub const DAILY_TARGET: f64 = 5.0;

/// How much the plan expects to be saved each week.
pub const WEEKLY_TARGET: f64 = 35.0;

/// How much the plan expects to be saved each month.
pub const MONTHLY_TARGET: f64 = 150.0;

/// The key the widget's saved amount is kept under.
pub const WIDGET_STORAGE_KEY: &str = "savings_widget_saved";

/// The file name the plan report is saved as.
pub const PLAN_FILE_NAME: &str = "savings-plan.txt";

const REPORT_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year]");

/// The state of the savings widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsWidget {
    target: f64,
    saved: f64,
}

impl Default for SavingsWidget {
    fn default() -> Self {
        Self {
            target: WIDGET_TARGET,
            saved: WIDGET_STARTING_SAVINGS,
        }
    }
}

impl SavingsWidget {
    /// Create the widget with `saved` already put aside, e.g. restored from
    /// an earlier session.
    ///
    /// # Errors
    /// Returns an [Error::InvalidSavingsAmount] if `saved` is negative, not
    /// finite or more than the target.
    pub fn with_saved(saved: f64) -> Result<Self, Error> {
        if !saved.is_finite() || saved < 0.0 || saved > WIDGET_TARGET {
            return Err(Error::InvalidSavingsAmount(saved));
        }

        Ok(Self {
            target: WIDGET_TARGET,
            saved,
        })
    }

    /// The target amount.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// The amount saved so far.
    pub fn saved(&self) -> f64 {
        self.saved
    }

    /// How much is left to save.
    pub fn balance(&self) -> f64 {
        self.target - self.saved
    }

    /// The saved amount as a percentage of the target.
    pub fn progress_percent(&self) -> f64 {
        self.saved / self.target * 100.0
    }

    /// The days left until the target is reached at [DAILY_TARGET] a day.
    pub fn days_remaining(&self) -> u32 {
        (self.balance() / DAILY_TARGET).ceil().max(0.0) as u32
    }

    /// Put `amount` aside.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidSavingsAmount] if `amount` is zero, negative or not a
    ///   number,
    /// - or [Error::ExceedsRemainingBalance] if `amount` is more than the
    ///   balance.
    pub fn add_savings(&mut self, amount: f64) -> Result<(), Error> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidSavingsAmount(amount));
        }

        let remaining = self.balance();

        if amount > remaining {
            return Err(Error::ExceedsRemainingBalance { amount, remaining });
        }

        self.saved += amount;
        tracing::debug!("Widget savings now {}", self.saved);

        Ok(())
    }

    /// The downloadable plan report, stamped with `today`.
    pub fn plan_report(&self, today: Date) -> String {
        // Formatting a plain date with day, month and year fields cannot fail.
        let today = today
            .format(REPORT_DATE_FORMAT)
            .unwrap_or_else(|_| today.to_string());

        format!(
            "SAVINGS PLAN REPORT\n\
             ====================\n\
             Goal: {WIDGET_GOAL_NAME}\n\
             Target Amount: ${target}\n\
             Amount Saved: {saved}\n\
             Remaining: {remaining}\n\
             Progress: {progress}%\n\
             \n\
             Daily Target: {daily}\n\
             Weekly Target: {weekly}\n\
             Monthly Target: {monthly}\n\
             \n\
             Last Updated: {today}\n\
             \n\
             Keep up the great work!\n",
            target = self.target,
            saved = format_dollars(self.saved),
            remaining = format_dollars(self.balance()),
            progress = self.progress_percent().round(),
            daily = format_dollars(DAILY_TARGET),
            weekly = format_dollars(WEEKLY_TARGET),
            monthly = format_dollars(MONTHLY_TARGET),
        )
    }
}

#[cfg(test)]
mod savings_widget_tests {
    use time::macros::date;

    use crate::{Error, widget::SavingsWidget};

    #[test]
    fn starts_with_seeded_savings() {
        let widget = SavingsWidget::default();

        assert_eq!(widget.saved(), 520.0);
        assert_eq!(widget.balance(), 280.0);
        assert_eq!(widget.progress_percent(), 65.0);
        assert_eq!(widget.days_remaining(), 56);
    }

    #[test]
    fn days_round_up() {
        let mut widget = SavingsWidget::default();

        widget.add_savings(2.5).unwrap();

        assert_eq!(widget.balance(), 277.5);
        assert_eq!(widget.days_remaining(), 56);
    }

    #[test]
    fn can_save_exact_balance() {
        let mut widget = SavingsWidget::default();

        widget.add_savings(280.0).unwrap();

        assert_eq!(widget.balance(), 0.0);
        assert_eq!(widget.days_remaining(), 0);
        assert_eq!(widget.progress_percent(), 100.0);
    }

    #[test]
    fn rejects_amount_over_balance() {
        let mut widget = SavingsWidget::default();

        let result = widget.add_savings(300.0);

        assert_eq!(
            result,
            Err(Error::ExceedsRemainingBalance {
                amount: 300.0,
                remaining: 280.0
            })
        );
        assert_eq!(widget.saved(), 520.0);
    }

    #[test]
    fn rejects_invalid_amounts() {
        let mut widget = SavingsWidget::default();

        for amount in [0.0, -10.0] {
            assert_eq!(
                widget.add_savings(amount),
                Err(Error::InvalidSavingsAmount(amount))
            );
        }
        assert!(widget.add_savings(f64::NAN).is_err());
    }

    #[test]
    fn with_saved_checks_bounds() {
        assert_eq!(SavingsWidget::with_saved(700.0).map(|w| w.balance()), Ok(100.0));
        assert!(SavingsWidget::with_saved(900.0).is_err());
        assert!(SavingsWidget::with_saved(-1.0).is_err());
    }

    #[test]
    fn plan_report_lists_figures() {
        let widget = SavingsWidget::default();

        let report = widget.plan_report(date!(2026 - 10 - 18));

        assert!(report.starts_with("SAVINGS PLAN REPORT\n"));
        for line in [
            "Goal: New Laptop",
            "Target Amount: $800",
            "Amount Saved: $520.00",
            "Remaining: $280.00",
            "Progress: 65%",
            "Daily Target: $5.00",
            "Weekly Target: $35.00",
            "Monthly Target: $150.00",
            "Last Updated: 18/10/2026",
        ] {
            assert!(report.contains(line), "missing {line:?} in {report}");
        }
    }
}
