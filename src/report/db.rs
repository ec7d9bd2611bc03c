//! Read-only database access to annual snapshots.

use rusqlite::Connection;

use crate::{
    Error,
    month::month_name,
    report::{AnnualSnapId, AnnualSnapMeta},
};

/// List the snapshots of the months in `year`, ordered by month.
pub fn get_annual_snapshots_metadata_by_year(
    year: i32,
    connection: &Connection,
) -> Result<Vec<AnnualSnapMeta>, Error> {
    connection
        .prepare(
            "SELECT s.id, s.month_id, m.year, m.month, s.created_at
             FROM annual_snaps s
             JOIN months m ON s.month_id = m.id
             WHERE m.year = :year
             ORDER BY m.month ASC, s.id ASC;",
        )?
        .query_map(&[(":year", &year)], |row| {
            let month: u8 = row.get(3)?;

            Ok(AnnualSnapMeta {
                id: row.get(0)?,
                month_id: row.get(1)?,
                year: row.get(2)?,
                month_name: month_name(month).to_owned(),
                created_at: row.get(4)?,
            })
        })?
        .map(|maybe_meta| maybe_meta.map_err(|error| error.into()))
        .collect()
}

/// Get the JSON of a snapshot exactly as it was stored.
///
/// # Errors
/// Returns [Error::NotFound] if there is no snapshot with the ID.
pub fn get_annual_snapshot_json_by_id(
    snapshot_id: AnnualSnapId,
    connection: &Connection,
) -> Result<String, Error> {
    connection
        .query_row(
            "SELECT snap_json FROM annual_snaps WHERE id = ?1;",
            [snapshot_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Initialize the annual snapshot table.
pub fn create_annual_snap_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS annual_snaps (
            id INTEGER PRIMARY KEY,
            month_id INTEGER NOT NULL,
            snap_json TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(month_id) REFERENCES months(id)
        );",
    )?;

    Ok(())
}
