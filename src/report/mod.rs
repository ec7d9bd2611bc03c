//! Annual reports built from the snapshots of finalized months, and the full backup export.

mod db;
mod domain;
mod endpoints;
mod export;

pub use db::{
    create_annual_snap_table, get_annual_snapshot_json_by_id,
    get_annual_snapshots_metadata_by_year,
};
pub use domain::{AnnualSnap, AnnualSnapId, AnnualSnapMeta};
pub use endpoints::{export_json_endpoint, get_annual_report_endpoint, get_snapshot_endpoint};
pub use export::export_budget;
