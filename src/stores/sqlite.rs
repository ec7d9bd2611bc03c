//! Implements a SQLite backed budget store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    Error,
    board::{BoardData, get_board_data},
    budget_line::{
        self, ActualLine, ActualLineId, BudgetLine, BudgetLineEdit, BudgetLineId,
        MonthBudgetLine, NewBudgetLine,
    },
    category::{self, Category, CategoryId, NewCategory},
    month::{self, FinalizeEligibility, Month, MonthId},
    report::{self, AnnualSnapId, AnnualSnapMeta},
    stores::BudgetStore,
};

/// Stores the budget in a SQLite database.
///
/// The connection is shared, so clones of the store see the same data.
#[derive(Debug, Clone)]
pub struct SQLiteBudgetStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteBudgetStore {
    /// Create a new budget store with a SQLite database.
    ///
    /// The database should already have been set up with
    /// [initialize](crate::initialize_db).
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl BudgetStore for SQLiteBudgetStore {
    fn get_all_categories(&self) -> Result<Vec<Category>, Error> {
        category::get_all_categories(&*self.connection()?)
    }

    fn get_category(&self, category_id: CategoryId) -> Result<Category, Error> {
        category::get_category(category_id, &*self.connection()?)
    }

    fn create_category(&self, category: NewCategory) -> Result<Category, Error> {
        category::create_category(category, &*self.connection()?)
    }

    fn update_category(&self, category: &Category) -> Result<(), Error> {
        category::update_category(category, &*self.connection()?)
    }

    fn delete_category(&self, category_id: CategoryId) -> Result<(), Error> {
        category::delete_category(category_id, &*self.connection()?)
    }

    fn get_month(&self, month_id: MonthId) -> Result<Month, Error> {
        month::get_month(month_id, &*self.connection()?)
    }

    fn get_current_month(&self) -> Result<Month, Error> {
        month::get_current_month(&*self.connection()?)
    }

    fn get_all_months(&self) -> Result<Vec<Month>, Error> {
        month::get_all_months(&*self.connection()?)
    }

    fn create_month(&self, year: i32, month: u8) -> Result<Month, Error> {
        month::create_month(year, month, &*self.connection()?)
    }

    fn create_budget_line(&self, line: NewBudgetLine) -> Result<BudgetLineId, Error> {
        budget_line::create_budget_line(line, &*self.connection()?)
    }

    fn get_budget_line(&self, budget_line_id: BudgetLineId) -> Result<BudgetLine, Error> {
        budget_line::get_budget_line(budget_line_id, &*self.connection()?)
    }

    fn get_budget_lines_by_month(&self, month_id: MonthId) -> Result<Vec<MonthBudgetLine>, Error> {
        budget_line::get_budget_lines_by_month(month_id, &*self.connection()?)
    }

    fn update_budget_line(
        &self,
        budget_line_id: BudgetLineId,
        edit: &BudgetLineEdit,
    ) -> Result<(), Error> {
        budget_line::update_budget_line(budget_line_id, edit, &*self.connection()?)
    }

    fn delete_budget_line(&self, budget_line_id: BudgetLineId) -> Result<(), Error> {
        budget_line::delete_budget_line(budget_line_id, &*self.connection()?)
    }

    fn get_actual_line(&self, actual_line_id: ActualLineId) -> Result<ActualLine, Error> {
        budget_line::get_actual_line(actual_line_id, &*self.connection()?)
    }

    fn update_actual_line(
        &self,
        actual_line_id: ActualLineId,
        actual: Decimal,
    ) -> Result<ActualLine, Error> {
        budget_line::update_actual_line(actual_line_id, actual, &*self.connection()?)
    }

    fn get_board_data(&self, month_id: MonthId) -> Result<BoardData, Error> {
        get_board_data(month_id, &*self.connection()?)
    }

    fn can_finalize_month(&self, month_id: MonthId) -> Result<FinalizeEligibility, Error> {
        month::can_finalize_month(month_id, &*self.connection()?)
    }

    fn finalize_month(&self, month_id: MonthId, snapshot_json: &str) -> Result<MonthId, Error> {
        month::finalize_month(month_id, snapshot_json, &*self.connection()?)
    }

    fn get_annual_snapshots_metadata_by_year(
        &self,
        year: i32,
    ) -> Result<Vec<AnnualSnapMeta>, Error> {
        report::get_annual_snapshots_metadata_by_year(year, &*self.connection()?)
    }

    fn get_annual_snapshot_json_by_id(&self, snapshot_id: AnnualSnapId) -> Result<String, Error> {
        report::get_annual_snapshot_json_by_id(snapshot_id, &*self.connection()?)
    }
}
