//! The read-model of a month: board data and the dashboard totals built from it.

mod aggregation;
mod db;
mod domain;
mod endpoints;

pub use aggregation::get_dashboard;
pub use db::get_board_data;
pub use endpoints::{get_board_endpoint, get_dashboard_endpoint};
pub use domain::{
    BoardData, BudgetLineDetail, BudgetLineWithActual, CategorySummary, DashboardPayload,
};
