//! The close-month workflow: check, snapshot, finalize.

use crate::{Error, month::MonthId, stores::BudgetStore};

/// Close the month `month_id` and roll its budget into the next month.
///
/// The board of the month is serialized to JSON and archived as the month's
/// snapshot. Returns the ID of the new month.
///
/// The board read, the eligibility check and the finalize each take the
/// store separately. A write to the month that lands between them is not
/// reflected in the snapshot, so callers should not edit a month while it
/// is being closed.
///
/// # Errors
/// Returns [Error::MonthNotReady] if the month is already finalized or still
/// has budget lines with zero actuals. Nothing is written in that case.
pub fn close_month(month_id: MonthId, store: &impl BudgetStore) -> Result<MonthId, Error> {
    let board = store.get_board_data(month_id)?;

    if board.is_finalized {
        return Err(Error::MonthNotReady(format!(
            "{} {} is already finalized.",
            board.month_name, board.year
        )));
    }

    let eligibility = store.can_finalize_month(month_id)?;
    if !eligibility.eligible {
        tracing::debug!("Month {month_id} cannot be closed: {}", eligibility.reason);
        return Err(Error::MonthNotReady(eligibility.reason));
    }

    let snapshot_json = serde_json::to_string(&board)
        .map_err(|error| Error::from(error).context(format!("serialize board of month {month_id}")))?;

    store.finalize_month(month_id, &snapshot_json)
}
