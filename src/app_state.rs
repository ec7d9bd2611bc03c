//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Date;

use crate::{Error, db::initialize, month::seed_initial_month, stores::SQLiteBudgetStore};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<S> {
    /// Where the budget is read from and written to.
    pub store: S,
}

impl<S> AppState<S> {
    /// Create the server state around an existing store.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteBudgetStore>;

/// Create an [AppState] that uses SQLite for the backend.
///
/// This function will initialize the database by adding the tables for the
/// budget to the database, and create the month containing `today` if there
/// are no months yet.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(db_connection: Connection, today: Date) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;
    seed_initial_month(today, &db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(SQLiteBudgetStore::new(connection)))
}
