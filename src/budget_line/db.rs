//! Database operations for budget lines and their actual lines.
//!
//! Every budget line owns exactly one actual line. Both are created together
//! and deleted together, each pair in one transaction.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;

use crate::{
    Error,
    budget_line::{
        ActualLine, ActualLineId, BudgetLine, BudgetLineEdit, BudgetLineId, MonthBudgetLine,
        NewBudgetLine, validate_actual,
    },
    money::{read_amount, to_sql_text},
    month::MonthId,
};

/// Create a budget line along with an actual line of zero.
///
/// Returns the ID of the new budget line.
///
/// # Errors
/// Returns [Error::InvalidForeignKey] if the month or category does not exist.
/// No rows are written if either insert fails.
pub fn create_budget_line(
    line: NewBudgetLine,
    connection: &Connection,
) -> Result<BudgetLineId, Error> {
    let tx = connection.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO budget_lines (month_id, category_id, label, expected)
         VALUES (?1, ?2, ?3, ?4);",
        (
            line.month_id,
            line.category_id,
            &line.label,
            to_sql_text(line.expected),
        ),
    )?;
    let budget_line_id = tx.last_insert_rowid();

    tx.execute(
        "INSERT INTO actual_lines (budget_line_id, actual) VALUES (?1, ?2);",
        (budget_line_id, to_sql_text(Decimal::ZERO)),
    )?;

    tx.commit()?;

    Ok(budget_line_id)
}

/// Retrieve a single budget line by ID.
pub fn get_budget_line(
    budget_line_id: BudgetLineId,
    connection: &Connection,
) -> Result<BudgetLine, Error> {
    connection
        .prepare("SELECT id, month_id, category_id, label, expected FROM budget_lines WHERE id = :id;")?
        .query_row(&[(":id", &budget_line_id)], map_budget_line_row)
        .map_err(|error| error.into())
}

/// Retrieve the budget lines of a month with their actual lines, in creation order.
pub fn get_budget_lines_by_month(
    month_id: MonthId,
    connection: &Connection,
) -> Result<Vec<MonthBudgetLine>, Error> {
    connection
        .prepare(
            "SELECT bl.id, bl.month_id, bl.category_id, bl.label, bl.expected, al.id, al.actual
             FROM budget_lines bl
             LEFT JOIN actual_lines al ON bl.id = al.budget_line_id
             WHERE bl.month_id = :month_id
             ORDER BY bl.id;",
        )?
        .query_map(&[(":month_id", &month_id)], |row| {
            let actual_id: Option<ActualLineId> = row.get(5)?;
            let actual = match actual_id {
                Some(_) => Some(read_amount(row, 6)?),
                None => None,
            };

            Ok(MonthBudgetLine {
                id: row.get(0)?,
                month_id: row.get(1)?,
                category_id: row.get(2)?,
                label: row.get(3)?,
                expected: read_amount(row, 4)?,
                actual_id,
                actual,
            })
        })?
        .map(|maybe_line| maybe_line.map_err(|error| error.into()))
        .collect()
}

/// Change the label and expected amount of a budget line.
///
/// # Errors
/// Returns [Error::UpdateMissingBudgetLine] if the budget line doesn't exist.
pub fn update_budget_line(
    budget_line_id: BudgetLineId,
    edit: &BudgetLineEdit,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE budget_lines SET label = ?1, expected = ?2 WHERE id = ?3",
        (&edit.label, to_sql_text(edit.expected), budget_line_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudgetLine);
    }

    Ok(())
}

/// Delete a budget line and its actual line.
///
/// # Errors
/// Returns [Error::DeleteMissingBudgetLine] if the budget line doesn't exist.
pub fn delete_budget_line(budget_line_id: BudgetLineId, connection: &Connection) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    // Deleting zero actual lines is fine, the missing budget line is reported below.
    tx.execute(
        "DELETE FROM actual_lines WHERE budget_line_id = ?1",
        [budget_line_id],
    )?;

    let rows_affected = tx.execute("DELETE FROM budget_lines WHERE id = ?1", [budget_line_id])?;

    tx.commit()?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudgetLine);
    }

    Ok(())
}

/// Retrieve a single actual line by ID.
pub fn get_actual_line(
    actual_line_id: ActualLineId,
    connection: &Connection,
) -> Result<ActualLine, Error> {
    connection
        .prepare("SELECT id, budget_line_id, actual FROM actual_lines WHERE id = :id;")?
        .query_row(&[(":id", &actual_line_id)], map_actual_line_row)
        .map_err(|error| error.into())
}

/// Record the amount actually spent for an actual line.
///
/// The amount is rounded to two decimal places before it is stored.
/// Returns the updated actual line.
///
/// # Errors
/// Returns [Error::NegativeActual] without touching the database if `actual`
/// is negative, or [Error::UpdateMissingActualLine] if the actual line doesn't exist.
pub fn update_actual_line(
    actual_line_id: ActualLineId,
    actual: Decimal,
    connection: &Connection,
) -> Result<ActualLine, Error> {
    let actual = validate_actual(actual)?;

    connection
        .prepare(
            "UPDATE actual_lines SET actual = ?1 WHERE id = ?2
             RETURNING id, budget_line_id, actual;",
        )?
        .query_row((to_sql_text(actual), actual_line_id), map_actual_line_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingActualLine,
            error => error.into(),
        })
}

/// Initialize the budget line and actual line tables.
pub fn create_budget_line_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget_lines (
            id INTEGER PRIMARY KEY,
            month_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            label TEXT NOT NULL,
            expected TEXT NOT NULL,
            FOREIGN KEY(month_id) REFERENCES months(id),
            FOREIGN KEY(category_id) REFERENCES categories(id)
        );

        CREATE INDEX IF NOT EXISTS idx_budget_lines_month_id ON budget_lines(month_id);

        CREATE TABLE IF NOT EXISTS actual_lines (
            id INTEGER PRIMARY KEY,
            budget_line_id INTEGER NOT NULL UNIQUE,
            actual TEXT NOT NULL DEFAULT '0',
            FOREIGN KEY(budget_line_id) REFERENCES budget_lines(id)
        );",
    )?;

    Ok(())
}

fn map_budget_line_row(row: &Row) -> Result<BudgetLine, rusqlite::Error> {
    Ok(BudgetLine {
        id: row.get(0)?,
        month_id: row.get(1)?,
        category_id: row.get(2)?,
        label: row.get(3)?,
        expected: read_amount(row, 4)?,
    })
}

fn map_actual_line_row(row: &Row) -> Result<ActualLine, rusqlite::Error> {
    Ok(ActualLine {
        id: row.get(0)?,
        budget_line_id: row.get(1)?,
        actual: read_amount(row, 2)?,
    })
}

#[cfg(test)]
mod budget_line_query_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        budget_line::{
            BudgetLine, BudgetLineEdit, NewBudgetLine, create_budget_line, delete_budget_line,
            get_actual_line, get_budget_line, get_budget_lines_by_month, update_actual_line,
            update_budget_line,
        },
        category::{CategoryId, NewCategory, create_category},
        db::initialize,
        month::{MonthId, create_month},
    };

    fn get_test_db_connection() -> (Connection, MonthId, CategoryId) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        let month = create_month(2024, 6, &connection).unwrap();
        let category =
            create_category(NewCategory::new("Food", "green").unwrap(), &connection).unwrap();

        (connection, month.id, category.id)
    }

    fn count_actual_lines_for(budget_line_id: i64, connection: &Connection) -> i64 {
        connection
            .query_row(
                "SELECT COUNT(*) FROM actual_lines WHERE budget_line_id = ?1",
                [budget_line_id],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn create_budget_line_creates_one_actual_line() {
        let (connection, month_id, category_id) = get_test_db_connection();

        let id = create_budget_line(
            NewBudgetLine::new(month_id, category_id, "Groceries", dec!(500)).unwrap(),
            &connection,
        )
        .expect("Could not create budget line");

        assert_eq!(
            get_budget_line(id, &connection),
            Ok(BudgetLine {
                id,
                month_id,
                category_id,
                label: "Groceries".to_owned(),
                expected: dec!(500),
            })
        );
        assert_eq!(count_actual_lines_for(id, &connection), 1);

        let lines = get_budget_lines_by_month(month_id, &connection).unwrap();
        assert_eq!(lines[0].actual, Some(dec!(0)));
    }

    #[test]
    fn create_budget_line_with_invalid_category_writes_nothing() {
        let (connection, month_id, category_id) = get_test_db_connection();

        let result = create_budget_line(
            NewBudgetLine::new(month_id, category_id + 100, "Groceries", dec!(500)).unwrap(),
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidForeignKey));
        assert_eq!(get_budget_lines_by_month(month_id, &connection), Ok(vec![]));
    }

    #[test]
    fn get_budget_line_with_invalid_id_returns_not_found() {
        let (connection, ..) = get_test_db_connection();

        assert_eq!(get_budget_line(1234, &connection), Err(Error::NotFound));
    }

    #[test]
    fn update_budget_line_changes_label_and_expected() {
        let (connection, month_id, category_id) = get_test_db_connection();
        let id = create_budget_line(
            NewBudgetLine::new(month_id, category_id, "Groceries", dec!(500)).unwrap(),
            &connection,
        )
        .unwrap();

        update_budget_line(
            id,
            &BudgetLineEdit::new("Supermarket", dec!(550.25)).unwrap(),
            &connection,
        )
        .expect("Could not update budget line");

        let line = get_budget_line(id, &connection).unwrap();
        assert_eq!(line.label, "Supermarket");
        assert_eq!(line.expected, dec!(550.25));
        assert_eq!(line.month_id, month_id);
        assert_eq!(line.category_id, category_id);
    }

    #[test]
    fn update_budget_line_with_invalid_id_returns_not_found() {
        let (connection, ..) = get_test_db_connection();

        let result = update_budget_line(
            999,
            &BudgetLineEdit::new("Ghost", dec!(1)).unwrap(),
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingBudgetLine));
    }

    #[test]
    fn delete_budget_line_removes_actual_line() {
        let (connection, month_id, category_id) = get_test_db_connection();
        let id = create_budget_line(
            NewBudgetLine::new(month_id, category_id, "Groceries", dec!(500)).unwrap(),
            &connection,
        )
        .unwrap();

        delete_budget_line(id, &connection).expect("Could not delete budget line");

        assert_eq!(get_budget_line(id, &connection), Err(Error::NotFound));
        assert_eq!(count_actual_lines_for(id, &connection), 0);
    }

    #[test]
    fn delete_budget_line_with_invalid_id_returns_not_found() {
        let (connection, ..) = get_test_db_connection();

        let result = delete_budget_line(999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingBudgetLine));
    }

    #[test]
    fn delete_budget_line_without_actual_line_succeeds() {
        let (connection, month_id, category_id) = get_test_db_connection();
        let id = create_budget_line(
            NewBudgetLine::new(month_id, category_id, "Groceries", dec!(500)).unwrap(),
            &connection,
        )
        .unwrap();
        connection
            .execute("DELETE FROM actual_lines WHERE budget_line_id = ?1", [id])
            .unwrap();

        assert_eq!(delete_budget_line(id, &connection), Ok(()));
    }

    #[test]
    fn update_actual_line_rounds_amount() {
        let (connection, month_id, category_id) = get_test_db_connection();
        create_budget_line(
            NewBudgetLine::new(month_id, category_id, "Groceries", dec!(500)).unwrap(),
            &connection,
        )
        .unwrap();
        let actual_id = get_budget_lines_by_month(month_id, &connection).unwrap()[0]
            .actual_id
            .unwrap();

        let updated = update_actual_line(actual_id, dec!(123.456), &connection)
            .expect("Could not update actual line");

        assert_eq!(updated.actual, dec!(123.46));
        assert_eq!(get_actual_line(actual_id, &connection), Ok(updated));
    }

    #[test]
    fn update_actual_line_rejects_negative_amount() {
        let (connection, month_id, category_id) = get_test_db_connection();
        create_budget_line(
            NewBudgetLine::new(month_id, category_id, "Groceries", dec!(500)).unwrap(),
            &connection,
        )
        .unwrap();
        let actual_id = get_budget_lines_by_month(month_id, &connection).unwrap()[0]
            .actual_id
            .unwrap();

        let result = update_actual_line(actual_id, dec!(-10.50), &connection);

        assert_eq!(result, Err(Error::NegativeActual(dec!(-10.50))));
        assert_eq!(get_actual_line(actual_id, &connection).unwrap().actual, dec!(0));
    }

    #[test]
    fn update_actual_line_with_invalid_id_returns_not_found() {
        let (connection, ..) = get_test_db_connection();

        let result = update_actual_line(999, dec!(1), &connection);

        assert_eq!(result, Err(Error::UpdateMissingActualLine));
    }

    #[test]
    fn lines_by_month_only_include_that_month() {
        let (connection, month_id, category_id) = get_test_db_connection();
        let other_month = create_month(2024, 7, &connection).unwrap();
        create_budget_line(
            NewBudgetLine::new(month_id, category_id, "Groceries", dec!(500)).unwrap(),
            &connection,
        )
        .unwrap();
        create_budget_line(
            NewBudgetLine::new(other_month.id, category_id, "Rent", dec!(1500)).unwrap(),
            &connection,
        )
        .unwrap();

        let lines = get_budget_lines_by_month(month_id, &connection).unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].label, "Groceries");
    }
}
