//! Budget months and their lifecycle: an open month is finalized into a
//! snapshot and rolled forward into the next month.

mod close;
mod db;
mod domain;
mod endpoints;
mod finalize;

pub use close::close_month;
pub use db::{
    create_month, create_month_table, get_all_months, get_current_month, get_month,
    seed_initial_month,
};
pub use domain::{Month, MonthId, month_name, next_calendar_month};
pub use endpoints::{
    can_finalize_month_endpoint, finalize_month_endpoint, get_current_month_endpoint,
};
pub use finalize::{FinalizeEligibility, can_finalize_month, finalize_month};
