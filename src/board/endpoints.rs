//! Board and dashboard endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    board::{BoardData, DashboardPayload, get_dashboard},
    month::MonthId,
    stores::BudgetStore,
};

/// Selects the month shown on the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub month_id: MonthId,
}

/// Get the budget lines of a month joined with categories and actuals.
pub async fn get_board_endpoint<S: BudgetStore>(
    Path(month_id): Path<MonthId>,
    State(state): State<AppState<S>>,
) -> Result<Json<BoardData>, Error> {
    state.store.get_board_data(month_id).map(Json)
}

/// Get the totals of a month broken down by category.
pub async fn get_dashboard_endpoint<S: BudgetStore>(
    Query(query): Query<DashboardQuery>,
    State(state): State<AppState<S>>,
) -> Result<Json<DashboardPayload>, Error> {
    get_dashboard(query.month_id, &state.store).map(Json)
}
