//! Aggregates board data into per-category and grand totals for the dashboard.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    Error,
    board::{BoardData, BudgetLineDetail, CategorySummary, DashboardPayload},
    category::{Category, CategoryId},
    month::MonthId,
    stores::BudgetStore,
};

/// Build the dashboard for the month `month_id` from the store.
///
/// # Errors
/// Returns [Error::NotFound] if the month does not exist.
pub fn get_dashboard(
    month_id: MonthId,
    store: &impl BudgetStore,
) -> Result<DashboardPayload, Error> {
    let board = store.get_board_data(month_id)?;
    let categories = store.get_all_categories()?;

    Ok(build_dashboard(&board, &categories))
}

/// Merge the board of a month with the full category roster.
///
/// Every category gets a summary, even those without budget lines this month.
/// A budget line whose category is missing from `categories` still gets a
/// summary, built from the category name and color carried by the line.
///
/// Summaries are ordered by category name then ID. Budget lines keep the
/// order of the board.
pub fn build_dashboard(board: &BoardData, categories: &[Category]) -> DashboardPayload {
    let mut summaries: HashMap<CategoryId, CategorySummary> = categories
        .iter()
        .map(|category| {
            (
                category.id,
                empty_summary(
                    category.id,
                    category.name.as_ref(),
                    category.color.as_ref(),
                ),
            )
        })
        .collect();

    let mut total_expected = Decimal::ZERO;
    let mut total_actual = Decimal::ZERO;

    for line in &board.budget_lines {
        total_expected += line.expected_amount;
        total_actual += line.actual_amount;

        let summary = summaries.entry(line.category_id).or_insert_with(|| {
            tracing::warn!(
                "Budget line {} refers to category {} which is not in the category list",
                line.id,
                line.category_id
            );
            empty_summary(line.category_id, &line.category_name, &line.category_color)
        });

        summary.total_expected += line.expected_amount;
        summary.total_actual += line.actual_amount;
        summary.budget_lines.push(BudgetLineDetail {
            budget_line_id: line.id,
            label: line.label.clone(),
            expected_amount: line.expected_amount,
            actual_amount: line.actual_amount,
            difference: line.expected_amount - line.actual_amount,
        });
    }

    let mut category_summaries: Vec<CategorySummary> = summaries
        .into_values()
        .map(|mut summary| {
            summary.difference = summary.total_expected - summary.total_actual;
            summary
        })
        .collect();
    category_summaries.sort_by(|a, b| {
        a.category_name
            .cmp(&b.category_name)
            .then(a.category_id.cmp(&b.category_id))
    });

    DashboardPayload {
        month_id: board.month_id,
        year: board.year,
        month: board.month_name.clone(),
        total_expected,
        total_actual,
        total_difference: total_expected - total_actual,
        category_summaries,
    }
}

fn empty_summary(category_id: CategoryId, name: &str, color: &str) -> CategorySummary {
    CategorySummary {
        category_id,
        category_name: name.to_owned(),
        category_color: color.to_owned(),
        total_expected: Decimal::ZERO,
        total_actual: Decimal::ZERO,
        difference: Decimal::ZERO,
        budget_lines: Vec::new(),
    }
}
