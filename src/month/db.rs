//! Database operations for months.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    month::{Month, MonthId},
};

/// Create an open month and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateMonth] if the month already exists.
pub fn create_month(year: i32, month: u8, connection: &Connection) -> Result<Month, Error> {
    connection.execute(
        "INSERT INTO months (year, month, finalized) VALUES (?1, ?2, 0);",
        (year, month),
    )?;

    Ok(Month {
        id: connection.last_insert_rowid(),
        year,
        month,
        finalized: false,
    })
}

/// Retrieve a single month by ID.
pub fn get_month(month_id: MonthId, connection: &Connection) -> Result<Month, Error> {
    connection
        .prepare("SELECT id, year, month, finalized FROM months WHERE id = :id;")?
        .query_row(&[(":id", &month_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve the latest month that has not been finalized.
///
/// # Errors
/// Returns [Error::NotFound] if every month has been finalized or there are no months.
pub fn get_current_month(connection: &Connection) -> Result<Month, Error> {
    connection
        .prepare(
            "SELECT id, year, month, finalized FROM months
             WHERE finalized = 0
             ORDER BY year DESC, month DESC
             LIMIT 1;",
        )?
        .query_row([], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all months in calendar order.
pub fn get_all_months(connection: &Connection) -> Result<Vec<Month>, Error> {
    connection
        .prepare("SELECT id, year, month, finalized FROM months ORDER BY year ASC, month ASC;")?
        .query_map([], map_row)?
        .map(|maybe_month| maybe_month.map_err(|error| error.into()))
        .collect()
}

/// Create a month for `today` if there are no months yet.
///
/// Returns the new month, or `None` if months already existed.
pub fn seed_initial_month(today: Date, connection: &Connection) -> Result<Option<Month>, Error> {
    let count: i64 = connection.query_row("SELECT COUNT(*) FROM months;", [], |row| row.get(0))?;

    if count > 0 {
        tracing::debug!("Months table is not empty (count: {count}), no seeding required.");
        return Ok(None);
    }

    let month = create_month(today.year(), today.month().into(), connection)?;
    tracing::info!(
        "Seeded months table with {}-{:02}.",
        month.year,
        month.month
    );

    Ok(Some(month))
}

/// Initialize the month table.
pub fn create_month_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS months (
            id INTEGER PRIMARY KEY,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            finalized INTEGER NOT NULL DEFAULT 0,
            UNIQUE (year, month)
        );",
    )?;

    Ok(())
}

pub(crate) fn map_row(row: &Row) -> Result<Month, rusqlite::Error> {
    Ok(Month {
        id: row.get(0)?,
        year: row.get(1)?,
        month: row.get(2)?,
        finalized: row.get(3)?,
    })
}

#[cfg(test)]
mod month_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        month::{Month, create_month, get_all_months, get_current_month, get_month},
    };

    use super::seed_initial_month;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn create_month_succeeds() {
        let connection = get_test_db_connection();

        let month = create_month(2024, 3, &connection).expect("Could not create month");

        assert_eq!(get_month(month.id, &connection), Ok(month));
    }

    #[test]
    fn create_duplicate_month_fails() {
        let connection = get_test_db_connection();
        create_month(2024, 3, &connection).unwrap();

        let result = create_month(2024, 3, &connection);

        assert_eq!(result, Err(Error::DuplicateMonth));
    }

    #[test]
    fn get_month_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_month(42, &connection), Err(Error::NotFound));
    }

    #[test]
    fn current_month_is_latest_open_month() {
        let connection = get_test_db_connection();
        let december = create_month(2023, 12, &connection).unwrap();
        let january = create_month(2024, 1, &connection).unwrap();
        connection
            .execute("UPDATE months SET finalized = 1 WHERE id = ?1", [december.id])
            .unwrap();

        assert_eq!(get_current_month(&connection), Ok(january));
    }

    #[test]
    fn current_month_not_found_when_all_finalized() {
        let connection = get_test_db_connection();
        let month = create_month(2023, 12, &connection).unwrap();
        connection
            .execute("UPDATE months SET finalized = 1 WHERE id = ?1", [month.id])
            .unwrap();

        assert_eq!(get_current_month(&connection), Err(Error::NotFound));
    }

    #[test]
    fn all_months_in_calendar_order() {
        let connection = get_test_db_connection();
        let january = create_month(2024, 1, &connection).unwrap();
        let november = create_month(2023, 11, &connection).unwrap();

        assert_eq!(get_all_months(&connection), Ok(vec![november, january]));
    }

    #[test]
    fn seeds_month_on_empty_table() {
        let connection = get_test_db_connection();

        let seeded = seed_initial_month(date!(2025 - 07 - 14), &connection)
            .expect("Could not seed month")
            .expect("Expected a month to be seeded");

        assert_eq!(
            seeded,
            Month {
                id: seeded.id,
                year: 2025,
                month: 7,
                finalized: false
            }
        );
    }

    #[test]
    fn does_not_seed_when_months_exist() {
        let connection = get_test_db_connection();
        create_month(2024, 1, &connection).unwrap();

        let seeded = seed_initial_month(date!(2025 - 07 - 14), &connection).unwrap();

        assert_eq!(seeded, None);
        assert_eq!(get_all_months(&connection).unwrap().len(), 1);
    }
}
