//! Core month domain types.

use serde::{Deserialize, Serialize};

use crate::database_id::DatabaseId;

/// Database identifier for a month.
pub type MonthId = DatabaseId;

/// The name used for month numbers outside 1 to 12.
pub const UNKNOWN_MONTH_NAME: &str = "Unknown";

/// One calendar month of budgeting.
///
/// A month starts open and becomes finalized when it is closed. Finalized
/// months are never reopened; the next month is created as their successor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    pub id: MonthId,
    pub year: i32,
    /// The month of the year, 1 for January through 12 for December.
    pub month: u8,
    pub finalized: bool,
}

impl Month {
    /// The English name of the month, e.g. "January".
    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }
}

/// Get the English name for a month number, 1 being January.
///
/// Numbers outside 1 to 12 map to [UNKNOWN_MONTH_NAME] instead of failing,
/// since month numbers only ever come from the store.
pub fn month_name(month: u8) -> &'static str {
    match time::Month::try_from(month) {
        Ok(time::Month::January) => "January",
        Ok(time::Month::February) => "February",
        Ok(time::Month::March) => "March",
        Ok(time::Month::April) => "April",
        Ok(time::Month::May) => "May",
        Ok(time::Month::June) => "June",
        Ok(time::Month::July) => "July",
        Ok(time::Month::August) => "August",
        Ok(time::Month::September) => "September",
        Ok(time::Month::October) => "October",
        Ok(time::Month::November) => "November",
        Ok(time::Month::December) => "December",
        Err(_) => UNKNOWN_MONTH_NAME,
    }
}

/// Get the year and month that follow `year` and `month`, wrapping December
/// into January of the next year.
pub fn next_calendar_month(year: i32, month: u8) -> (i32, u8) {
    if month >= 12 { (year + 1, 1) } else { (year, month + 1) }
}
