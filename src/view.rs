//! Plain text views of the ledger for the command line.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    alert::Alert,
    dashboard::{DashboardStats, GoalCard},
    format::{format_currency, format_dollars},
    goal::Goal,
    transaction::{Amount, Transaction, TransactionEntry},
    ussd::{Provider, USSD_MINIMUM_AMOUNT},
    widget::{SavingsWidget, WIDGET_GOAL_NAME},
};

const PROGRESS_BAR_WIDTH: usize = 20;

const DEADLINE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day padding:none] [month repr:short] [year]");

const NO_DEADLINE: &str = "No deadline - Save at your own pace!";

/// A bar like `[#######.............]` filled to `percent`.
pub fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * PROGRESS_BAR_WIDTH + 50) / 100;

    format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

fn deadline_line(deadline: Option<Date>) -> String {
    match deadline {
        Some(deadline) => match deadline.format(DEADLINE_FORMAT) {
            Ok(formatted) => format!("Deadline: {formatted}"),
            Err(_) => format!("Deadline: {deadline}"),
        },
        None => NO_DEADLINE.to_owned(),
    }
}

fn remaining_text(goal: &Goal) -> String {
    match goal.over_funded() {
        0 => format!("{} to go", format_currency(goal.remaining())),
        extra => format!("Target reached, {} over", format_currency(extra)),
    }
}

/// Every goal with its progress, or a hint to create one.
pub fn goal_list(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return "No goals yet. Create your first savings goal with `savings create`.".to_owned();
    }

    goals
        .iter()
        .map(|goal| {
            let progress = goal.progress();

            [
                format!("#{} {} {}", goal.id, goal.category.icon(), goal.name),
                format!("   {}", goal.description),
                format!(
                    "   Saved: {} / {}",
                    format_currency(goal.current_amount),
                    format_currency(goal.target_amount)
                ),
                format!(
                    "   {} {progress}% complete, {}",
                    progress_bar(progress),
                    remaining_text(goal)
                ),
                format!("   {}", deadline_line(goal.deadline)),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The full details of one goal including its transaction history.
pub fn goal_detail(goal: &Goal) -> String {
    let progress = goal.progress();

    let mut lines = vec![
        format!("{} {} (#{})", goal.category.icon(), goal.name, goal.id),
        goal.description.clone(),
        String::new(),
        format!("Target Amount:   {}", format_currency(goal.target_amount)),
        format!("Currently Saved: {}", format_currency(goal.current_amount)),
        deadline_line(goal.deadline),
        String::new(),
        format!(
            "{} {progress}% complete, {} saved of {}",
            progress_bar(progress),
            format_currency(goal.current_amount),
            format_currency(goal.target_amount)
        ),
        remaining_text(goal),
        String::new(),
        "Transaction History".to_owned(),
    ];

    if goal.transactions.is_empty() {
        lines.push("No transactions yet. Add your first savings deposit!".to_owned());
    } else {
        lines.extend(goal.transactions.iter().map(transaction_line));
    }

    lines.push(String::new());
    lines.push(format!(
        "Last updated: {}",
        goal.updated_at.date().format(DEADLINE_FORMAT).unwrap_or_default()
    ));

    lines.join("\n")
}

fn transaction_line(transaction: &Transaction) -> String {
    format!(
        "  {:<18} + {:<14} {}",
        transaction.date,
        format_currency(transaction.amount),
        transaction.note
    )
}

/// The totals across all goals and the cards for the first few goals.
pub fn dashboard(stats: &DashboardStats, cards: &[GoalCard]) -> String {
    if stats.total_goals == 0 {
        return "Welcome! You have no savings goals yet. \
                Create one with `savings create` to get started."
            .to_owned();
    }

    let mut lines = vec![
        format!("Total Goals:  {}", stats.total_goals),
        format!("Total Saved:  {}", format_currency(stats.total_saved)),
        format!("Total Target: {}", format_currency(stats.total_target)),
        format!("Avg Progress: {}%", stats.avg_progress_percent),
        String::new(),
        "Your Goals".to_owned(),
    ];

    for card in cards {
        lines.push(format!("#{} {}", card.id, card.name));
        lines.push(format!("   {}", card.summary));
        lines.push(format!(
            "   {} / {}  {} {}%",
            format_currency(card.current_amount),
            format_currency(card.target_amount),
            progress_bar(card.progress),
            card.progress
        ));
    }

    lines.join("\n")
}

/// The combined transaction log.
pub fn transaction_log(entries: &[TransactionEntry<'_>]) -> String {
    if entries.is_empty() {
        return "No transactions yet.".to_owned();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "{} (goal #{})\n{}",
                entry.goal_name,
                entry.goal_id,
                transaction_line(entry.transaction)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The message shown after a goal is created.
pub fn goal_created(goal: &Goal) -> Alert {
    Alert::success(
        format!("Successfully created \"{}\" goal!", goal.name),
        format!(
            "Target: {}\nGoal ID: {}",
            format_currency(goal.target_amount),
            goal.id
        ),
    )
}

/// The message shown after a deposit is recorded.
pub fn deposit_added(goal: &Goal, amount: Amount) -> Alert {
    Alert::success(
        format!(
            "Successfully added {} to your \"{}\" goal!",
            format_currency(amount),
            goal.name
        ),
        format!(
            "Total saved: {}\nRemaining: {}",
            format_currency(goal.current_amount),
            format_currency(goal.remaining())
        ),
    )
}

/// The question asked before a goal is deleted.
pub fn delete_prompt(goal: &Goal) -> String {
    format!(
        "Delete \"{}\"? This will also delete {} transactions.",
        goal.name,
        goal.transactions.len()
    )
}

/// The question asked before an import replaces the ledger.
pub fn import_prompt(goal_count: usize) -> String {
    format!("Import {goal_count} goals? Current data will be replaced.")
}

/// The question asked before every goal is deleted.
pub const RESET_PROMPT: &str = "⚠️ This will delete ALL your data. Are you sure?";

// ============================================================================
// USSD SCREENS
// ============================================================================

/// The first USSD screen, asking for the amount.
pub fn ussd_amount_prompt(goal: &Goal) -> String {
    format!(
        "🎯 {}\nEnter amount to save (Tzs.)\nMinimum: {}",
        goal.name,
        format_currency(USSD_MINIMUM_AMOUNT)
    )
}

/// The second USSD screen, listing the providers.
pub fn ussd_provider_menu(amount: Amount) -> String {
    let mut lines = vec![
        "📱 Select Payment Method".to_owned(),
        format!("Amount: {}", format_currency(amount)),
        String::new(),
    ];

    lines.extend(Provider::ALL.iter().enumerate().map(|(index, provider)| {
        format!(
            "{}. {} (Dial {})",
            index + 1,
            provider.name(),
            provider.dial_code()
        )
    }));

    lines.push("0. Back".to_owned());

    lines.join("\n")
}

/// The third USSD screen, with the dialling instructions.
pub fn ussd_confirmation(amount: Amount, provider: Provider) -> String {
    [
        "✅ Confirm Payment".to_owned(),
        format!("Provider: {}", provider.name()),
        format_currency(amount),
        String::new(),
        "📱 Payment Instructions:".to_owned(),
        format!("1. Dial {} on your phone", provider.dial_code()),
        "2. Select \"Send Money\" or \"Payments\"".to_owned(),
        "3. Enter recipient number (your business number)".to_owned(),
        format!("4. Enter amount: {amount} Tzs."),
        "5. Enter your PIN to complete payment".to_owned(),
        "6. Return here to confirm payment".to_owned(),
    ]
    .join("\n")
}

/// The final USSD screen after the payment was recorded.
pub fn ussd_success(goal: &Goal, transaction: &Transaction, provider: Provider) -> String {
    [
        "Payment Successful! 🎉".to_owned(),
        format!("{} received", format_currency(transaction.amount)),
        format!("Added to: {}", goal.name),
        format!("via {}", provider.wallet()),
        String::new(),
        format!(
            "New Total: {} / {}",
            format_currency(goal.current_amount),
            format_currency(goal.target_amount)
        ),
        format!("Progress: {}%", goal.progress()),
    ]
    .join("\n")
}

// ============================================================================
// WIDGET
// ============================================================================

/// The savings widget with its countdown.
pub fn widget_status(widget: &SavingsWidget) -> String {
    let progress = widget.progress_percent().round() as u32;

    [
        format!("🎯 {}", WIDGET_GOAL_NAME),
        format!("Saved:   {}", format_dollars(widget.saved())),
        format!("Balance: {}", format_dollars(widget.balance())),
        format!("{} {progress}% Complete", progress_bar(progress)),
        format!("{} days to go", widget.days_remaining()),
    ]
    .join("\n")
}


#[cfg(test)]
mod goal_view_tests {
    use time::{
        UtcOffset,
        macros::{date, datetime},
    };

    use crate::{
        goal::Goal,
        transaction::Transaction,
        view::{NO_DEADLINE, delete_prompt, goal_detail, goal_list},
    };

    fn laptop() -> Goal {
        Goal::build("Laptop", 1000)
            .description(Some("For school"))
            .finalize(1, datetime!(2025-01-01 8:00 UTC))
            .unwrap()
    }

    #[test]
    fn empty_list_shows_hint() {
        assert!(goal_list(&[]).starts_with("No goals yet."));
    }

    #[test]
    fn list_shows_amounts_and_deadline() {
        let trip = Goal::build("Trip", 500)
            .deadline(Some(date!(2025 - 12 - 24)))
            .finalize(2, datetime!(2025-01-01 8:00 UTC))
            .unwrap();

        let text = goal_list(&[laptop(), trip]);

        assert!(text.contains("#1"));
        assert!(text.contains("Saved: Tzs. 0 / Tzs. 1,000"));
        assert!(text.contains(NO_DEADLINE));
        assert!(text.contains("Deadline: 24 Dec 2025"));
    }

    #[test]
    fn list_reports_over_funding() {
        let mut goal = laptop();
        goal.current_amount = 1100;

        let text = goal_list(&[goal]);

        assert!(text.contains("100% complete, Target reached, Tzs. 100 over"));
    }

    #[test]
    fn detail_lists_transactions() {
        let mut goal = laptop();
        goal.transactions.push(
            Transaction::new(
                1,
                300,
                Some("Pocket money"),
                datetime!(2025-01-02 8:00 UTC),
                UtcOffset::UTC,
            )
            .unwrap(),
        );
        goal.current_amount = 300;

        let text = goal_detail(&goal);

        assert!(text.contains("Pocket money"));
        assert!(text.contains("2 Jan 2025 08:00"));
        assert!(text.contains("30% complete"));
        assert!(text.contains("Tzs. 700 to go"));
    }

    #[test]
    fn detail_without_transactions_shows_hint() {
        assert!(goal_detail(&laptop()).contains("No transactions yet."));
    }

    #[test]
    fn delete_prompt_counts_transactions() {
        assert_eq!(
            delete_prompt(&laptop()),
            "Delete \"Laptop\"? This will also delete 0 transactions."
        );
    }
}


#[cfg(test)]
mod ussd_view_tests {
    use crate::{
        ussd::Provider,
        view::{ussd_confirmation, ussd_provider_menu},
    };

    #[test]
    fn menu_lists_every_provider() {
        let text = ussd_provider_menu(2500);

        assert!(text.contains("Amount: Tzs. 2,500"));
        assert!(text.contains("1. Airtel Tanzania (Dial *150*60#)"));
        assert!(text.contains("4. Tigo Tanzania (Dial *150*01#)"));
        assert!(text.contains("0. Back"));
    }

    #[test]
    fn confirmation_shows_dial_code() {
        let text = ussd_confirmation(2500, Provider::Halotel);

        assert!(text.contains("Provider: Halotel Tanzania"));
        assert!(text.contains("Dial *150*88# on your phone"));
    }
}
