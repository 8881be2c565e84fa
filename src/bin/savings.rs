use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    str::FromStr,
};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};
use tokio::io::{AsyncBufReadExt, BufReader};

use savings_goals::{
    Alert, Config, Error, ErrorKind, Ledger,
    goal::{Category, Goal, GoalId, parse_deadline},
    logging::{LOG_FILE_NAME, setup_logging},
    snapshot::{export_file_name, parse_import},
    stores::{KeyValueStore, SQLiteStore},
    timer::{CONFIRMATION_DISMISS_DELAY, DeferredTask},
    transaction::{Amount, GoalFilter, parse_amount},
    ussd::{Provider, UssdSession, UssdStep},
    view,
    widget::{PLAN_FILE_NAME, SavingsWidget, WIDGET_STORAGE_KEY},
};

/// Track savings goals and the deposits made towards them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "SAVINGS_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Canonical name of the timezone dates are shown in, e.g. "Africa/Nairobi".
    #[arg(long, env = "SAVINGS_TIMEZONE", global = true)]
    timezone: Option<String>,

    /// The key the goals are saved under in the database.
    #[arg(long, env = "SAVINGS_STORAGE_KEY", global = true)]
    storage_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new savings goal.
    Create {
        /// What the goal is called, e.g. "New Laptop".
        name: String,
        /// The amount to save in Tzs.
        #[arg(long, allow_negative_numbers = true)]
        target: Amount,
        /// A longer description of the goal.
        #[arg(long)]
        description: Option<String>,
        /// One of electronics, travel, education, home, vehicle, emergency or other.
        #[arg(long, default_value = "other")]
        category: String,
        /// The date to reach the target by, as YYYY-MM-DD.
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List every goal.
    Goals,
    /// Show a goal and its transactions.
    Show {
        /// The ID of the goal.
        id: GoalId,
    },
    /// Quickly add money to a goal.
    Add {
        /// The ID of the goal.
        id: GoalId,
        /// The amount in Tzs.
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },
    /// Record a savings deposit with a note.
    Deposit {
        /// The ID of the goal.
        id: GoalId,
        /// The amount in Tzs.
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// What the deposit was for.
        #[arg(long)]
        note: Option<String>,
    },
    /// Pay into a goal through mobile money.
    Ussd {
        /// The ID of the goal.
        id: GoalId,
    },
    /// Delete a goal and its transactions.
    Delete {
        /// The ID of the goal.
        id: GoalId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// List transactions across goals, newest first.
    Transactions {
        /// "all" or the ID of a goal.
        #[arg(long, default_value = "all")]
        goal: String,
    },
    /// Show the totals across all goals.
    Dashboard,
    /// Save a backup of every goal to a JSON file.
    Export {
        /// Where to write the backup, defaults to savings-backup-<date>.json.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace every goal with the goals in a backup file.
    Import {
        /// The backup file to read.
        file: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Delete all saved data.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Show the laptop savings widget.
    Widget {
        /// Put an amount aside in dollars.
        #[arg(long, allow_negative_numbers = true)]
        add: Option<f64>,
        /// Save the savings plan report to a file.
        #[arg(long, num_args = 0..=1, default_missing_value = PLAN_FILE_NAME)]
        plan: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(Path::new(LOG_FILE_NAME)) {
        eprintln!("Could not set up logging: {error}");
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let is_format_error = error.kind() == ErrorKind::Format;
            eprintln!("{}", error.into_alert());

            if is_format_error {
                eprintln!(
                    "If the saved data is damaged, `savings reset` clears it and \
                    `savings import` replaces it with a backup."
                );
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let config = Config::new(
        args.db_path,
        args.timezone.as_deref(),
        args.storage_key.as_deref(),
    )?;
    tracing::debug!("Using {config:?}");

    match args.command {
        Command::Create {
            name,
            target,
            description,
            category,
            deadline,
        } => {
            let category = Category::from_str(&category)?;
            let deadline = deadline.as_deref().map(parse_deadline).transpose()?;
            let mut ledger = open_ledger(&config)?;

            let goal = ledger.create_goal(
                Goal::build(&name, target)
                    .description(description.as_deref())
                    .category(category)
                    .deadline(deadline),
            )?;

            println!("{}", view::goal_created(&goal));
        }
        Command::Goals => {
            let ledger = open_ledger(&config)?;
            println!("{}", view::goal_list(ledger.goals()));
        }
        Command::Show { id } => {
            let ledger = open_ledger(&config)?;
            println!("{}", view::goal_detail(ledger.goal(id)?));
        }
        Command::Add { id, amount } => {
            let amount = parse_amount(&amount)?;
            let mut ledger = open_ledger(&config)?;

            ledger.quick_add(id, amount)?;

            println!("{}", view::deposit_added(ledger.goal(id)?, amount));
        }
        Command::Deposit { id, amount, note } => {
            let amount = parse_amount(&amount)?;
            let mut ledger = open_ledger(&config)?;

            ledger.add_transaction(id, amount, note.as_deref())?;

            println!("{}", view::deposit_added(ledger.goal(id)?, amount));
        }
        Command::Ussd { id } => {
            let mut ledger = open_ledger(&config)?;
            run_ussd_session(&mut ledger, id).await?;
        }
        Command::Delete { id, yes } => {
            let mut ledger = open_ledger(&config)?;
            let prompt = view::delete_prompt(ledger.goal(id)?);

            if !yes && !confirm(&prompt)? {
                return Ok(());
            }

            ledger.delete_goal(id)?;
            println!("{}", Alert::success_simple("Goal deleted successfully."));
        }
        Command::Transactions { goal } => {
            let filter = GoalFilter::from_str(&goal)?;
            let ledger = open_ledger(&config)?;

            println!("{}", view::transaction_log(&ledger.list_transactions(filter)));
        }
        Command::Dashboard => {
            let ledger = open_ledger(&config)?;
            println!("{}", view::dashboard(&ledger.stats(), &ledger.recent_goals()));
        }
        Command::Export { output } => {
            let ledger = open_ledger(&config)?;
            let json = ledger.export_document().to_json()?;
            let path =
                output.unwrap_or_else(|| PathBuf::from(export_file_name(today(&config))));

            fs::write(&path, json)?;
            tracing::info!("Exported {} goals to {path:?}", ledger.goals().len());

            println!(
                "{}",
                Alert::success("Data exported successfully!", path.display().to_string())
            );
        }
        Command::Import { file, yes } => {
            let text = fs::read_to_string(&file)?;
            let goals = parse_import(&text, config.local_offset)?;
            // Everything is replaced, so unreadable saved data is discarded.
            let mut ledger = Ledger::load_or_discard(
                open_store(&config)?,
                &config.storage_key,
                config.local_offset,
            )?;

            if !yes && !confirm(&view::import_prompt(goals.len()))? {
                return Ok(());
            }

            let count = goals.len();
            ledger.import(goals)?;

            println!(
                "{}",
                Alert::success_simple(format!("Successfully imported {count} goals!"))
            );
        }
        Command::Reset { yes } => {
            if !yes && !confirm(view::RESET_PROMPT)? {
                return Ok(());
            }

            Ledger::load_or_discard(
                open_store(&config)?,
                &config.storage_key,
                config.local_offset,
            )?
            .clear_all()?;

            println!("{}", Alert::success_simple("All data has been cleared."));
        }
        Command::Widget { add, plan } => {
            let mut store = open_store(&config)?;
            let mut widget = load_widget(&store)?;

            if let Some(amount) = add {
                widget.add_savings(amount)?;
                store.set(WIDGET_STORAGE_KEY, &widget.saved().to_string())?;

                println!(
                    "{}",
                    Alert::success_simple(format!(
                        "Successfully added {} to savings!",
                        savings_goals::format::format_dollars(amount)
                    ))
                );
            }

            println!("{}", view::widget_status(&widget));

            if let Some(path) = plan {
                fs::write(&path, widget.plan_report(today(&config)))?;
                println!(
                    "{}",
                    Alert::success(
                        "Savings plan downloaded successfully!",
                        path.display().to_string()
                    )
                );
            }
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> Result<SQLiteStore, Error> {
    let connection = Connection::open(&config.db_path)?;
    SQLiteStore::new(connection)
}

fn open_ledger(config: &Config) -> Result<Ledger<SQLiteStore>, Error> {
    Ledger::load(
        open_store(config)?,
        &config.storage_key,
        config.local_offset,
    )
}

fn today(config: &Config) -> Date {
    OffsetDateTime::now_utc().to_offset(config.local_offset).date()
}

fn load_widget(store: &SQLiteStore) -> Result<SavingsWidget, Error> {
    match store.get(WIDGET_STORAGE_KEY)? {
        Some(saved) => {
            let saved = saved
                .parse::<f64>()
                .map_err(|error| Error::InvalidFormat(error.to_string()))?;
            SavingsWidget::with_saved(saved)
        }
        None => Ok(SavingsWidget::default()),
    }
}

/// Ask a yes/no question on stdin, anything but "y" or "yes" is a no.
fn confirm(prompt: &str) -> Result<bool, Error> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;

    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

async fn run_ussd_session(
    ledger: &mut Ledger<SQLiteStore>,
    goal_id: GoalId,
) -> Result<(), Error> {
    let goal = ledger.goal(goal_id)?.clone();
    let mut session = UssdSession::new(goal_id);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match session.step().clone() {
            UssdStep::EnterAmount => {
                println!("{}", view::ussd_amount_prompt(&goal));

                let Some(line) = read_line(&mut lines, "Amount").await? else {
                    return Ok(());
                };

                if let Err(error) = parse_amount(&line).and_then(|amount| session.enter_amount(amount))
                {
                    println!("{}", error.into_alert());
                }
            }
            UssdStep::SelectProvider { amount } => {
                println!("{}", view::ussd_provider_menu(amount));

                let Some(line) = read_line(&mut lines, "Choice").await? else {
                    return Ok(());
                };

                let choice = line.trim();
                let provider = choice
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| index.checked_sub(1))
                    .and_then(|index| Provider::ALL.get(index).copied())
                    .or_else(|| Provider::from_str(choice).ok());

                match (choice, provider) {
                    ("0", _) => session.back()?,
                    (_, Some(provider)) => session.select_provider(provider)?,
                    (_, None) => println!(
                        "{}",
                        Alert::error_simple("Please pick a provider from the list.")
                    ),
                }
            }
            UssdStep::Confirm { amount, provider } => {
                println!("{}", view::ussd_confirmation(amount, provider));
                println!(
                    "Enter the payment reference from the SMS, leave blank for simulation, \
                    or type \"c\" to change provider."
                );

                let Some(line) = read_line(&mut lines, "Reference").await? else {
                    return Ok(());
                };

                if line.trim().eq_ignore_ascii_case("c") {
                    session.change_provider()?;
                } else {
                    session.confirm(ledger, Some(&line))?;
                }
            }
            UssdStep::Completed {
                transaction,
                provider,
            } => {
                println!(
                    "{}",
                    view::ussd_success(ledger.goal(goal_id)?, &transaction, provider)
                );
                println!("Press Enter to continue to your goals.");

                let mut dismiss = DeferredTask::spawn(CONFIRMATION_DISMISS_DELAY, async {
                    tracing::debug!("Payment confirmation timed out");
                });

                tokio::select! {
                    _ = dismiss.finished() => {}
                    _ = lines.next_line() => {}
                }
                dismiss.cancel();

                println!("{}", view::goal_list(ledger.goals()));
                return Ok(());
            }
        }
    }
}

/// Prompt for and read one line, `None` once stdin is closed.
async fn read_line<R>(
    lines: &mut tokio::io::Lines<R>,
    prompt: &str,
) -> Result<Option<String>, Error>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    print!("{prompt}: ");
    io::stdout().flush()?;

    Ok(lines.next_line().await?)
}
