//! Annual snapshot domain types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{database_id::DatabaseId, month::MonthId};

/// Database identifier for an annual snapshot.
pub type AnnualSnapId = DatabaseId;

/// The archived state of a finalized month.
///
/// Snapshots are written once, when their month is finalized, and never
/// changed afterwards. The JSON is stored exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualSnap {
    pub id: AnnualSnapId,
    pub month_id: MonthId,
    pub snap_json: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Describes an annual snapshot without its JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualSnapMeta {
    pub id: AnnualSnapId,
    pub month_id: MonthId,
    pub year: i32,
    pub month_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
