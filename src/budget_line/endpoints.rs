//! Budget line and actual line endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    budget_line::{ActualLine, ActualLineId, BudgetLineEdit, BudgetLineId, MonthBudgetLine, NewBudgetLine},
    category::CategoryId,
    month::MonthId,
    stores::BudgetStore,
};

/// Selects the month whose budget lines are listed.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month_id: MonthId,
}

/// The request body for creating a budget line.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBudgetLineForm {
    pub month_id: MonthId,
    pub category_id: CategoryId,
    pub label: String,
    pub expected: Decimal,
}

/// The request body for editing a budget line.
#[derive(Debug, Serialize, Deserialize)]
pub struct EditBudgetLineForm {
    pub label: String,
    pub expected: Decimal,
}

/// The request body for recording spending.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActualForm {
    pub actual: Decimal,
}

/// The ID of a newly created record.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: BudgetLineId,
}

/// List the budget lines of a month with their actual lines.
pub async fn get_budget_lines_endpoint<S: BudgetStore>(
    Query(query): Query<MonthQuery>,
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<MonthBudgetLine>>, Error> {
    state.store.get_budget_lines_by_month(query.month_id).map(Json)
}

/// Create a budget line and its zeroed actual line.
pub async fn create_budget_line_endpoint<S: BudgetStore>(
    State(state): State<AppState<S>>,
    Json(form): Json<CreateBudgetLineForm>,
) -> Result<(StatusCode, Json<CreatedId>), Error> {
    let line = NewBudgetLine::new(form.month_id, form.category_id, &form.label, form.expected)?;
    let id = state.store.create_budget_line(line)?;

    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

/// Change the label and expected amount of a budget line.
pub async fn update_budget_line_endpoint<S: BudgetStore>(
    Path(budget_line_id): Path<BudgetLineId>,
    State(state): State<AppState<S>>,
    Json(form): Json<EditBudgetLineForm>,
) -> Result<StatusCode, Error> {
    let edit = BudgetLineEdit::new(&form.label, form.expected)?;
    state.store.update_budget_line(budget_line_id, &edit)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a budget line along with its actual line.
pub async fn delete_budget_line_endpoint<S: BudgetStore>(
    Path(budget_line_id): Path<BudgetLineId>,
    State(state): State<AppState<S>>,
) -> Result<StatusCode, Error> {
    state.store.delete_budget_line(budget_line_id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Record the amount spent for a budget line.
pub async fn update_actual_line_endpoint<S: BudgetStore>(
    Path(actual_line_id): Path<ActualLineId>,
    State(state): State<AppState<S>>,
    Json(form): Json<ActualForm>,
) -> Result<Json<ActualLine>, Error> {
    state
        .store
        .update_actual_line(actual_line_id, form.actual)
        .map(Json)
}
