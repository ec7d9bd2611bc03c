//! Full JSON backup of the budget.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    budget_line::MonthBudgetLine,
    category::Category,
    month::Month,
    report::AnnualSnapMeta,
    stores::BudgetStore,
};

/// Everything in the store, for downloading as a backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetExport {
    #[serde(with = "time::serde::rfc3339")]
    pub exported_at: OffsetDateTime,
    pub categories: Vec<Category>,
    pub months: Vec<MonthExport>,
}

/// A month with its budget lines and snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthExport {
    #[serde(flatten)]
    pub month: Month,
    pub budget_lines: Vec<MonthBudgetLine>,
    pub snapshots: Vec<AnnualSnapMeta>,
}

/// Collect every category, month, budget line and snapshot in `store`.
pub fn export_budget(store: &impl BudgetStore) -> Result<BudgetExport, Error> {
    let categories = store.get_all_categories()?;
    let months = store.get_all_months()?;

    let years: BTreeSet<i32> = months.iter().map(|month| month.year).collect();
    let mut snapshots = Vec::new();
    for year in years {
        snapshots.extend(store.get_annual_snapshots_metadata_by_year(year)?);
    }

    let months = months
        .into_iter()
        .map(|month| {
            let budget_lines = store.get_budget_lines_by_month(month.id)?;
            let month_snapshots = snapshots
                .iter()
                .filter(|snapshot| snapshot.month_id == month.id)
                .cloned()
                .collect();

            Ok(MonthExport {
                month,
                budget_lines,
                snapshots: month_snapshots,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    tracing::info!(
        "Exported {} categories and {} months",
        categories.len(),
        months.len()
    );

    Ok(BudgetExport {
        exported_at: OffsetDateTime::now_utc(),
        categories,
        months,
    })
}
