//! Closing a month: the eligibility check and the finalize transaction.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    month::{MonthId, db::map_row, next_calendar_month},
};

/// Whether a month may be finalized, and why not if it may not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeEligibility {
    pub eligible: bool,
    /// Empty when the month is eligible.
    pub reason: String,
}

impl FinalizeEligibility {
    /// The month can be finalized.
    pub fn eligible() -> Self {
        Self {
            eligible: true,
            reason: String::new(),
        }
    }

    /// The month cannot be finalized because `zero_actual_count` budget lines
    /// have no spending recorded.
    pub fn zero_actuals(zero_actual_count: i64) -> Self {
        Self {
            eligible: false,
            reason: format!("{zero_actual_count} budget lines still have zero actuals."),
        }
    }
}

/// Check whether the month `month_id` can be finalized.
///
/// A month is eligible when none of its budget lines has an actual line with
/// an amount of zero. Budget lines without any actual line are not counted.
/// A month without budget lines is eligible. Nothing is written.
pub fn can_finalize_month(
    month_id: MonthId,
    connection: &Connection,
) -> Result<FinalizeEligibility, Error> {
    let zero_actual_count: i64 = connection
        .query_row(
            "SELECT COUNT(bl.id)
             FROM budget_lines bl
             INNER JOIN actual_lines al ON bl.id = al.budget_line_id
             WHERE bl.month_id = ?1 AND CAST(al.actual AS REAL) = 0;",
            [month_id],
            |row| row.get(0),
        )
        .map_err(|error| {
            Error::from(error).context(format!("check finalization status for month {month_id}"))
        })?;

    if zero_actual_count > 0 {
        Ok(FinalizeEligibility::zero_actuals(zero_actual_count))
    } else {
        Ok(FinalizeEligibility::eligible())
    }
}

/// Finalize the month `month_id` and create the month after it.
///
/// In a single transaction this:
/// 1. stores `snapshot_json` verbatim as the month's annual snapshot,
/// 2. marks the month as finalized,
/// 3. creates the next calendar month,
/// 4. copies every budget line of the month into the new month, each with an
///    actual amount of zero.
///
/// Returns the ID of the new month. Eligibility is not checked here, see
/// [can_finalize_month].
///
/// # Errors
/// Any failure rolls back every step. For example, a `month_id` that does not
/// refer to a month, or a successor month that already exists, leaves the
/// database unchanged.
pub fn finalize_month(
    month_id: MonthId,
    snapshot_json: &str,
    connection: &Connection,
) -> Result<MonthId, Error> {
    let tx = connection.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO annual_snaps (month_id, snap_json, created_at) VALUES (?1, ?2, ?3);",
        (month_id, snapshot_json, OffsetDateTime::now_utc()),
    )
    .map_err(|error| {
        let error = match Error::from(error) {
            Error::InvalidForeignKey => Error::NotFound,
            error => error,
        };
        error.context(format!("create annual snapshot for month {month_id}"))
    })?;

    tx.execute("UPDATE months SET finalized = 1 WHERE id = ?1;", [month_id])
        .map_err(|error| {
            Error::from(error).context(format!("mark month {month_id} as finalized"))
        })?;

    let current_month = tx
        .query_row(
            "SELECT id, year, month, finalized FROM months WHERE id = ?1;",
            [month_id],
            map_row,
        )
        .map_err(|error| {
            Error::from(error).context(format!("get current month details for month {month_id}"))
        })?;

    let (next_year, next_month) = next_calendar_month(current_month.year, current_month.month);

    tx.execute(
        "INSERT INTO months (year, month, finalized) VALUES (?1, ?2, 0);",
        (next_year, next_month),
    )
    .map_err(|error| {
        Error::from(error).context(format!(
            "create next month record for {next_year}-{next_month:02}"
        ))
    })?;
    let new_month_id = tx.last_insert_rowid();

    let cloned_line_count = clone_budget_lines(month_id, new_month_id, &tx)?;

    tx.commit().map_err(|error| {
        Error::from(error).context(format!(
            "commit finalizing month {month_id} and creating month {new_month_id}"
        ))
    })?;

    tracing::info!(
        "Finalized month {month_id} ({}-{:02}), created month {new_month_id} ({next_year}-{next_month:02}) with {cloned_line_count} budget lines",
        current_month.year,
        current_month.month
    );

    Ok(new_month_id)
}

/// Copy the budget lines of `from_month_id` into `to_month_id`, giving each
/// copy a zeroed actual line. Returns the number of lines copied.
fn clone_budget_lines(
    from_month_id: MonthId,
    to_month_id: MonthId,
    connection: &Connection,
) -> Result<usize, Error> {
    let templates = connection
        .prepare(
            "SELECT category_id, label, expected FROM budget_lines
             WHERE month_id = ?1
             ORDER BY id;",
        )?
        .query_map([from_month_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, rusqlite::types::Value>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()
        .map_err(|error| {
            Error::from(error).context(format!("fetch budget lines for month {from_month_id}"))
        })?;

    let mut insert_line = connection.prepare(
        "INSERT INTO budget_lines (month_id, category_id, label, expected) VALUES (?1, ?2, ?3, ?4);",
    )?;
    let mut insert_actual =
        connection.prepare("INSERT INTO actual_lines (budget_line_id, actual) VALUES (?1, '0');")?;

    for (category_id, label, expected) in &templates {
        let budget_line_id = insert_line
            .insert((to_month_id, category_id, label, expected))
            .map_err(|error| {
                Error::from(error).context(format!(
                    "clone budget line \"{label}\" for new month {to_month_id}"
                ))
            })?;

        insert_actual.execute([budget_line_id]).map_err(|error| {
            Error::from(error).context(format!(
                "create actual line for cloned budget line {budget_line_id} (\"{label}\")"
            ))
        })?;
    }

    Ok(templates.len())
}
