//! Read-model types for a month's board and dashboard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{budget_line::BudgetLineId, category::CategoryId, month::MonthId};

/// The state of one month: its budget lines joined with their actual amounts
/// and category details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardData {
    pub month_id: MonthId,
    pub year: i32,
    pub month_name: String,
    pub is_finalized: bool,
    pub budget_lines: Vec<BudgetLineWithActual>,
}

/// A budget line with its category details and actual amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLineWithActual {
    pub id: BudgetLineId,
    pub month_id: MonthId,
    pub category_id: CategoryId,
    pub category_name: String,
    pub category_color: String,
    pub label: String,
    pub expected_amount: Decimal,
    pub actual_amount: Decimal,
}

/// Totals for a month, broken down by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub month_id: MonthId,
    pub year: i32,
    /// The name of the month, e.g. "January".
    pub month: String,
    pub total_expected: Decimal,
    pub total_actual: Decimal,
    /// `total_expected - total_actual`, negative when overspent.
    pub total_difference: Decimal,
    pub category_summaries: Vec<CategorySummary>,
}

/// The totals and budget lines of one category in a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_id: CategoryId,
    pub category_name: String,
    pub category_color: String,
    pub total_expected: Decimal,
    pub total_actual: Decimal,
    pub difference: Decimal,
    pub budget_lines: Vec<BudgetLineDetail>,
}

/// One budget line as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLineDetail {
    pub budget_line_id: BudgetLineId,
    pub label: String,
    pub expected_amount: Decimal,
    pub actual_amount: Decimal,
    pub difference: Decimal,
}
