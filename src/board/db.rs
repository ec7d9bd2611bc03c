//! Reads the board data for a month from the database.

use rusqlite::Connection;

use crate::{
    Error,
    board::{BoardData, BudgetLineWithActual},
    money::read_amount,
    month::{MonthId, get_month},
};

/// Assemble the board data for the month `month_id`.
///
/// Budget lines are ordered by category name and then by label. A budget line
/// without an actual line is reported with an actual amount of zero.
///
/// # Errors
/// Returns [Error::NotFound] if the month does not exist.
pub fn get_board_data(month_id: MonthId, connection: &Connection) -> Result<BoardData, Error> {
    let month = get_month(month_id, connection)?;

    let budget_lines = connection
        .prepare(
            "SELECT
                bl.id,
                bl.month_id,
                bl.category_id,
                c.name,
                c.color,
                bl.label,
                bl.expected,
                COALESCE(al.actual, 0)
            FROM budget_lines bl
            JOIN categories c ON bl.category_id = c.id
            LEFT JOIN actual_lines al ON bl.id = al.budget_line_id
            WHERE bl.month_id = :month_id
            ORDER BY c.name, bl.label, bl.id;",
        )?
        .query_map(&[(":month_id", &month_id)], |row| {
            Ok(BudgetLineWithActual {
                id: row.get(0)?,
                month_id: row.get(1)?,
                category_id: row.get(2)?,
                category_name: row.get(3)?,
                category_color: row.get(4)?,
                label: row.get(5)?,
                expected_amount: read_amount(row, 6)?,
                actual_amount: read_amount(row, 7)?,
            })
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()
        .map_err(|error| {
            Error::from(error)
                .context(format!("fetch budget lines with actuals for month {month_id}"))
        })?;

    tracing::debug!(
        "Loaded board data for month {month_id} with {} budget lines",
        budget_lines.len()
    );

    Ok(BoardData {
        month_id,
        year: month.year,
        month_name: month.name().to_owned(),
        is_finalized: month.finalized,
        budget_lines,
    })
}
