use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::UtcOffset;

use savings_goals::{
    Ledger,
    goal::{Category, Goal},
    stores::{DEFAULT_STORAGE_KEY, SQLiteStore},
};

/// A utility for creating a database with sample goals for trying out the
/// `savings` command line app.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'savings.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'savings.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let store = SQLiteStore::new(Connection::open(output_path)?)?;
    let mut ledger = Ledger::load(store, DEFAULT_STORAGE_KEY, UtcOffset::UTC)?;

    println!("Creating sample goals...");

    let laptop = ledger.create_goal(
        Goal::build("New Laptop", 1_500_000)
            .description(Some("A laptop for university coursework"))
            .category(Category::Electronics),
    )?;
    ledger.add_transaction(laptop.id, 250_000, Some("First salary"))?;
    ledger.quick_add(laptop.id, 50_000)?;

    let trip = ledger.create_goal(
        Goal::build("Zanzibar Trip", 800_000)
            .description(Some("A week on the beach with family"))
            .category(Category::Travel),
    )?;
    ledger.add_transaction(trip.id, 120_000, Some("USSD Payment via M-Pesa"))?;

    ledger.create_goal(Goal::build("Emergency Fund", 2_000_000).category(Category::Emergency))?;

    println!("Success!");

    Ok(())
}
