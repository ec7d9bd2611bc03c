use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use gandalf_budget::{
    NewBudgetLine, NewCategory, close_month, initialize_db,
    stores::{BudgetStore, SQLiteBudgetStore},
};

/// A utility for creating a demo database for the gandalf_budget server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Categories with their budget lines as (label, expected, actual) in cents.
const DEMO_BUDGET: [(&str, &str, &[(&str, i64, i64)]); 3] = [
    (
        "Food",
        "green",
        &[("Groceries", 50000, 48050), ("Eating Out", 15000, 18075)],
    ),
    ("Housing", "blue", &[("Rent", 150000, 150000)]),
    (
        "Transport",
        "orange",
        &[("Fuel", 12000, 9830), ("Public Transport", 4000, 3600)],
    ),
];

/// Create and populate a database for manual testing.
///
/// The previous calendar month is filled in and finalized, which creates the
/// current month with the same budget lines and nothing spent yet.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    initialize_db(&conn)?;
    let store = SQLiteBudgetStore::new(Arc::new(Mutex::new(conn)));

    let today = OffsetDateTime::now_utc().date();
    let (year, month) = match u8::from(today.month()) {
        1 => (today.year() - 1, 12),
        month => (today.year(), month - 1),
    };

    println!("Creating budget for {year}-{month:02}...");
    let last_month = store.create_month(year, month)?;

    for (name, color, lines) in DEMO_BUDGET {
        let category = store.create_category(NewCategory::new(name, color)?)?;

        for &(label, expected_cents, actual_cents) in lines {
            let line = NewBudgetLine::new(
                last_month.id,
                category.id,
                label,
                Decimal::new(expected_cents, 2),
            )?;
            let budget_line_id = store.create_budget_line(line)?;

            let actual_id = store
                .get_budget_lines_by_month(last_month.id)?
                .into_iter()
                .find(|line| line.id == budget_line_id)
                .and_then(|line| line.actual_id)
                .ok_or("budget line was created without an actual line")?;
            store.update_actual_line(actual_id, Decimal::new(actual_cents, 2))?;
        }
    }

    println!("Finalizing {year}-{month:02}...");
    let current_month_id = close_month(last_month.id, &store)?;
    let current_month = store.get_month(current_month_id)?;
    println!(
        "Created {}-{:02} with {} budget lines.",
        current_month.year,
        current_month.month,
        store.get_budget_lines_by_month(current_month_id)?.len()
    );

    println!("Success!");

    Ok(())
}
