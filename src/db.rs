//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, budget_line::create_budget_line_tables, category::create_category_table,
    month::create_month_table, report::create_annual_snap_table,
};

/// Create all of the database tables for the application.
///
/// Foreign key enforcement is switched on for `connection`. Tables that already
/// exist are left untouched, so this is safe to call on every start up.
///
/// # Errors
/// Returns an error if there is an SQL error. No tables are created in that case.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must run first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_month_table(&transaction)?;
    create_budget_line_tables(&transaction)?;
    create_annual_snap_table(&transaction)?;

    transaction.commit()?;

    tracing::debug!("Database schema initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    fn table_names(connection: &Connection) -> Vec<String> {
        connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name;")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert_eq!(
            table_names(&connection),
            vec![
                "actual_lines",
                "annual_snaps",
                "budget_lines",
                "categories",
                "months"
            ]
        );
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
            .execute(
                "INSERT INTO categories (name, color) VALUES ('Food', 'green');",
                (),
            )
            .unwrap();

        initialize(&connection).unwrap();

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let enabled: i64 = connection
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
