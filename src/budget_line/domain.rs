//! Core budget line domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error, category::CategoryId, database_id::DatabaseId, money::round_currency, month::MonthId,
};

/// Database identifier for a budget line.
pub type BudgetLineId = DatabaseId;

/// Database identifier for an actual line.
pub type ActualLineId = DatabaseId;

/// A planned spending item for one category in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub id: BudgetLineId,
    pub month_id: MonthId,
    pub category_id: CategoryId,
    pub label: String,
    /// How much is planned to be spent.
    pub expected: Decimal,
}

/// A budget line together with its actual line, as listed for a month.
///
/// The actual fields are `None` only if the actual line is missing, which
/// does not happen for lines created through [create_budget_line](crate::budget_line::create_budget_line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBudgetLine {
    pub id: BudgetLineId,
    pub month_id: MonthId,
    pub category_id: CategoryId,
    pub label: String,
    pub expected: Decimal,
    pub actual_id: Option<ActualLineId>,
    pub actual: Option<Decimal>,
}

/// The amount actually spent against a budget line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualLine {
    pub id: ActualLineId,
    pub budget_line_id: BudgetLineId,
    /// Non-negative and rounded to two decimal places.
    pub actual: Decimal,
}

/// A validated budget line that has not been added to the store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBudgetLine {
    /// The month the line is planned for.
    pub month_id: MonthId,
    /// The category the spending belongs to.
    pub category_id: CategoryId,
    /// Trimmed and non-empty.
    pub label: String,
    /// Non-negative and rounded to two decimal places.
    pub expected: Decimal,
}

impl NewBudgetLine {
    /// Validate a new budget line.
    ///
    /// The label is trimmed and `expected` is rounded to two decimal places.
    ///
    /// # Errors
    /// Returns [Error::EmptyBudgetLineLabel] for an empty label and
    /// [Error::NegativeExpected] for a negative expected amount.
    pub fn new(
        month_id: MonthId,
        category_id: CategoryId,
        label: &str,
        expected: Decimal,
    ) -> Result<Self, Error> {
        let BudgetLineEdit { label, expected } = BudgetLineEdit::new(label, expected)?;

        Ok(Self {
            month_id,
            category_id,
            label,
            expected,
        })
    }
}

/// The fields of a budget line that can be changed after creation.
///
/// The month and category of a line are fixed once it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetLineEdit {
    pub label: String,
    pub expected: Decimal,
}

impl BudgetLineEdit {
    /// Validate an edit to a budget line.
    ///
    /// # Errors
    /// Returns [Error::EmptyBudgetLineLabel] for an empty label and
    /// [Error::NegativeExpected] for a negative expected amount.
    pub fn new(label: &str, expected: Decimal) -> Result<Self, Error> {
        let label = label.trim();

        if label.is_empty() {
            return Err(Error::EmptyBudgetLineLabel);
        }

        if expected < Decimal::ZERO {
            return Err(Error::NegativeExpected(expected));
        }

        Ok(Self {
            label: label.to_owned(),
            expected: round_currency(expected),
        })
    }
}

/// Check that `actual` is non-negative and round it to two decimal places.
///
/// # Errors
/// Returns [Error::NegativeActual] if `actual` is below zero.
pub fn validate_actual(actual: Decimal) -> Result<Decimal, Error> {
    if actual < Decimal::ZERO {
        return Err(Error::NegativeActual(actual));
    }

    Ok(round_currency(actual))
}
