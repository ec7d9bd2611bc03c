//! Contains the trait and implementations for objects that store the budget.

mod memory;

pub mod sqlite;

pub use memory::InMemoryBudgetStore;
pub use sqlite::SQLiteBudgetStore;

use rust_decimal::Decimal;

use crate::{
    Error,
    board::BoardData,
    budget_line::{
        ActualLine, ActualLineId, BudgetLine, BudgetLineEdit, BudgetLineId, MonthBudgetLine,
        NewBudgetLine,
    },
    category::{Category, CategoryId, NewCategory},
    month::{FinalizeEligibility, Month, MonthId},
    report::{AnnualSnapId, AnnualSnapMeta},
};

/// Creates, retrieves and changes categories, months, budget lines and
/// annual snapshots.
///
/// Operations that write more than one record are atomic: on error the store
/// is left as it was before the call.
pub trait BudgetStore {
    /// Get all categories ordered by name.
    fn get_all_categories(&self) -> Result<Vec<Category>, Error>;

    /// Get a category by its ID.
    fn get_category(&self, category_id: CategoryId) -> Result<Category, Error>;

    /// Add a new category to the store.
    fn create_category(&self, category: NewCategory) -> Result<Category, Error>;

    /// Replace the name and color of an existing category.
    fn update_category(&self, category: &Category) -> Result<(), Error>;

    /// Remove a category that no budget line refers to.
    fn delete_category(&self, category_id: CategoryId) -> Result<(), Error>;

    /// Get a month by its ID.
    fn get_month(&self, month_id: MonthId) -> Result<Month, Error>;

    /// Get the latest month that has not been finalized.
    fn get_current_month(&self) -> Result<Month, Error>;

    /// Get all months in calendar order.
    fn get_all_months(&self) -> Result<Vec<Month>, Error>;

    /// Add an open month to the store.
    fn create_month(&self, year: i32, month: u8) -> Result<Month, Error>;

    /// Add a budget line with an actual line of zero. Returns the budget line's ID.
    fn create_budget_line(&self, line: NewBudgetLine) -> Result<BudgetLineId, Error>;

    /// Get a budget line by its ID.
    fn get_budget_line(&self, budget_line_id: BudgetLineId) -> Result<BudgetLine, Error>;

    /// Get the budget lines of a month with their actual lines, in creation order.
    fn get_budget_lines_by_month(&self, month_id: MonthId) -> Result<Vec<MonthBudgetLine>, Error>;

    /// Change the label and expected amount of a budget line.
    fn update_budget_line(
        &self,
        budget_line_id: BudgetLineId,
        edit: &BudgetLineEdit,
    ) -> Result<(), Error>;

    /// Remove a budget line and its actual line.
    fn delete_budget_line(&self, budget_line_id: BudgetLineId) -> Result<(), Error>;

    /// Get an actual line by its ID.
    fn get_actual_line(&self, actual_line_id: ActualLineId) -> Result<ActualLine, Error>;

    /// Record the amount spent for an actual line.
    fn update_actual_line(
        &self,
        actual_line_id: ActualLineId,
        actual: Decimal,
    ) -> Result<ActualLine, Error>;

    /// Get the budget lines of a month joined with their categories and actual amounts.
    fn get_board_data(&self, month_id: MonthId) -> Result<BoardData, Error>;

    /// Check whether a month may be finalized.
    fn can_finalize_month(&self, month_id: MonthId) -> Result<FinalizeEligibility, Error>;

    /// Archive `snapshot_json`, close the month and create its successor with
    /// copies of its budget lines. Returns the ID of the new month.
    fn finalize_month(&self, month_id: MonthId, snapshot_json: &str) -> Result<MonthId, Error>;

    /// List the snapshots of the months in `year`, ordered by month.
    fn get_annual_snapshots_metadata_by_year(
        &self,
        year: i32,
    ) -> Result<Vec<AnnualSnapMeta>, Error>;

    /// Get the JSON of a snapshot exactly as it was stored.
    fn get_annual_snapshot_json_by_id(&self, snapshot_id: AnnualSnapId) -> Result<String, Error>;
}
