//! Month endpoints: the current month and closing a month.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    month::{FinalizeEligibility, Month, MonthId, close_month},
    stores::BudgetStore,
};

/// The response to a successful finalization.
#[derive(Debug, Serialize, Deserialize)]
pub struct FinalizeResponse {
    pub message: String,
    pub new_month_id: MonthId,
}

/// Get the latest month that is still open.
pub async fn get_current_month_endpoint<S: BudgetStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Month>, Error> {
    state.store.get_current_month().map(Json)
}

/// Report whether the month can be finalized, and why not.
pub async fn can_finalize_month_endpoint<S: BudgetStore>(
    Path(month_id): Path<MonthId>,
    State(state): State<AppState<S>>,
) -> Result<Json<FinalizeEligibility>, Error> {
    state.store.can_finalize_month(month_id).map(Json)
}

/// Close the month and start the next one.
///
/// Responds with 400 and the reason if the month is not ready to be closed.
pub async fn finalize_month_endpoint<S: BudgetStore>(
    Path(month_id): Path<MonthId>,
    State(state): State<AppState<S>>,
) -> Result<Json<FinalizeResponse>, Error> {
    let new_month_id = close_month(month_id, &state.store)?;

    Ok(Json(FinalizeResponse {
        message: "Month finalized successfully".to_owned(),
        new_month_id,
    }))
}

#[cfg(test)]
mod month_endpoint_tests {
    use axum_test::TestServer;
    use rust_decimal_macros::dec;
    use serde_json::Value;

    use crate::{
        AppState, build_router,
        budget_line::NewBudgetLine,
        category::NewCategory,
        endpoints::{self, format_endpoint},
        month::{FinalizeEligibility, Month},
        stores::{BudgetStore, InMemoryBudgetStore},
    };

    use super::FinalizeResponse;

    /// A store with one month holding one budget line whose actual is zero.
    fn get_test_server() -> (TestServer, InMemoryBudgetStore, Month, i64) {
        let store = InMemoryBudgetStore::new();
        let month = store.create_month(2023, 12).unwrap();
        let food = store
            .create_category(NewCategory::new("Food", "green").unwrap())
            .unwrap();
        store
            .create_budget_line(NewBudgetLine::new(month.id, food.id, "Groceries", dec!(500)).unwrap())
            .unwrap();
        let actual_id = store.get_budget_lines_by_month(month.id).unwrap()[0]
            .actual_id
            .unwrap();
        let app = build_router(AppState::new(store.clone()));

        (
            TestServer::try_new(app).expect("Could not create test server."),
            store,
            month,
            actual_id,
        )
    }

    #[tokio::test]
    async fn current_month_is_open_month() {
        let (server, _, month, _) = get_test_server();

        let current: Month = server.get(endpoints::CURRENT_MONTH).await.json();

        assert_eq!(current, month);
    }

    #[tokio::test]
    async fn current_month_without_months_is_not_found() {
        let app = build_router(AppState::new(InMemoryBudgetStore::new()));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        server
            .get(endpoints::CURRENT_MONTH)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn can_finalize_reports_zero_actuals() {
        let (server, _, month, _) = get_test_server();

        let eligibility: FinalizeEligibility = server
            .get(&format_endpoint(endpoints::CAN_FINALIZE_MONTH, month.id))
            .await
            .json();

        assert!(!eligibility.eligible);
        assert_eq!(eligibility.reason, "1 budget lines still have zero actuals.");
    }

    #[tokio::test]
    async fn finalize_ineligible_month_is_bad_request() {
        let (server, store, month, _) = get_test_server();

        let response = server
            .put(&format_endpoint(endpoints::FINALIZE_MONTH, month.id))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "1 budget lines still have zero actuals.");
        assert!(!store.get_month(month.id).unwrap().finalized);
    }

    #[tokio::test]
    async fn finalize_rolls_month_forward() {
        let (server, store, month, actual_id) = get_test_server();
        store.update_actual_line(actual_id, dec!(480.50)).unwrap();

        let response: FinalizeResponse = server
            .put(&format_endpoint(endpoints::FINALIZE_MONTH, month.id))
            .await
            .json();

        let new_month = store.get_month(response.new_month_id).unwrap();
        assert_eq!((new_month.year, new_month.month), (2024, 1));
        let current: Month = server.get(endpoints::CURRENT_MONTH).await.json();
        assert_eq!(current, new_month);
    }

    #[tokio::test]
    async fn finalize_missing_month_is_not_found() {
        let (server, _, _, _) = get_test_server();

        server
            .put(&format_endpoint(endpoints::FINALIZE_MONTH, 404))
            .await
            .assert_status_not_found();
    }
}
