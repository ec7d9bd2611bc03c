//! Budget lines (planned spending) and actual lines (recorded spending).

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_budget_line, create_budget_line_tables, delete_budget_line, get_actual_line,
    get_budget_line, get_budget_lines_by_month, update_actual_line, update_budget_line,
};
pub use endpoints::{
    create_budget_line_endpoint, delete_budget_line_endpoint, get_budget_lines_endpoint,
    update_actual_line_endpoint, update_budget_line_endpoint,
};
pub use domain::{
    ActualLine, ActualLineId, BudgetLine, BudgetLineEdit, BudgetLineId, MonthBudgetLine,
    NewBudgetLine, validate_actual,
};
