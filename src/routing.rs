//! Application router configuration.

use axum::{
    Json, Router,
    extract::{MatchedPath, Request},
    middleware,
    routing::{get, put},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    board::{get_board_endpoint, get_dashboard_endpoint},
    budget_line::{
        create_budget_line_endpoint, delete_budget_line_endpoint, get_budget_lines_endpoint,
        update_actual_line_endpoint, update_budget_line_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    logging::logging_middleware,
    month::{can_finalize_month_endpoint, finalize_month_endpoint, get_current_month_endpoint},
    report::{export_json_endpoint, get_annual_report_endpoint, get_snapshot_endpoint},
    stores::BudgetStore,
};

/// Return a router with all the app's routes.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: BudgetStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint::<S>))
        .route(endpoints::BOARD, get(get_board_endpoint::<S>))
        .route(endpoints::CURRENT_MONTH, get(get_current_month_endpoint::<S>))
        .route(
            endpoints::CAN_FINALIZE_MONTH,
            get(can_finalize_month_endpoint::<S>),
        )
        .route(endpoints::FINALIZE_MONTH, put(finalize_month_endpoint::<S>))
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint::<S>).post(create_category_endpoint::<S>),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint::<S>).delete(delete_category_endpoint::<S>),
        )
        .route(
            endpoints::BUDGET_LINES,
            get(get_budget_lines_endpoint::<S>).post(create_budget_line_endpoint::<S>),
        )
        .route(
            endpoints::BUDGET_LINE,
            put(update_budget_line_endpoint::<S>).delete(delete_budget_line_endpoint::<S>),
        )
        .route(endpoints::ACTUAL_LINE, put(update_actual_line_endpoint::<S>))
        .route(endpoints::ANNUAL_REPORT, get(get_annual_report_endpoint::<S>))
        .route(endpoints::SNAPSHOT, get(get_snapshot_endpoint::<S>))
        .route(endpoints::EXPORT_JSON, get(export_json_endpoint::<S>))
        .with_state(state)
}

/// Add request tracing and request/response logging to `router`.
pub fn add_logging_layers(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are turned into responses.
        .on_failure(());

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(tracing_layer)
}

/// Report that the server is running.
async fn get_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
