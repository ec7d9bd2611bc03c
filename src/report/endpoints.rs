//! Annual report and export endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    report::{AnnualSnapId, AnnualSnapMeta, export_budget},
    stores::BudgetStore,
};

/// The earliest year that annual reports cover.
pub const FIRST_REPORT_YEAR: i32 = 2000;

/// How many years past the current year may be requested.
const FUTURE_REPORT_YEARS: i32 = 5;

/// Selects the year of an annual report.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

/// List the snapshots of the finalized months in a year.
pub async fn get_annual_report_endpoint<S: BudgetStore>(
    Query(query): Query<YearQuery>,
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<AnnualSnapMeta>>, Error> {
    let last_year = OffsetDateTime::now_utc().year() + FUTURE_REPORT_YEARS;
    if !(FIRST_REPORT_YEAR..=last_year).contains(&query.year) {
        return Err(Error::InvalidYear(query.year));
    }

    state
        .store
        .get_annual_snapshots_metadata_by_year(query.year)
        .map(Json)
}

/// Get the JSON of a snapshot exactly as it was archived.
pub async fn get_snapshot_endpoint<S: BudgetStore>(
    Path(snapshot_id): Path<AnnualSnapId>,
    State(state): State<AppState<S>>,
) -> Result<Response, Error> {
    let json = state.store.get_annual_snapshot_json_by_id(snapshot_id)?;

    Ok(([(CONTENT_TYPE, "application/json")], json).into_response())
}

/// Download the whole budget as a JSON file.
pub async fn export_json_endpoint<S: BudgetStore>(
    State(state): State<AppState<S>>,
) -> Result<Response, Error> {
    let export = export_budget(&state.store)?;

    Ok((
        [(
            CONTENT_DISPOSITION,
            "attachment; filename=\"budget_export.json\"",
        )],
        Json(export),
    )
        .into_response())
}

#[cfg(test)]
mod report_endpoint_tests {
    use axum_test::TestServer;
    use rust_decimal_macros::dec;

    use crate::{
        AppState, build_router,
        budget_line::NewBudgetLine,
        category::NewCategory,
        endpoints::{self, format_endpoint},
        report::{AnnualSnapMeta, export::BudgetExport},
        stores::{BudgetStore, InMemoryBudgetStore},
    };

    fn get_test_server() -> (TestServer, InMemoryBudgetStore) {
        let store = InMemoryBudgetStore::new();
        let app = build_router(AppState::new(store.clone()));

        (
            TestServer::try_new(app).expect("Could not create test server."),
            store,
        )
    }

    #[tokio::test]
    async fn annual_report_lists_snapshots() {
        let (server, store) = get_test_server();
        let month = store.create_month(2024, 2).unwrap();
        store.finalize_month(month.id, "{}").unwrap();

        let snapshots: Vec<AnnualSnapMeta> = server
            .get(endpoints::ANNUAL_REPORT)
            .add_query_param("year", 2024)
            .await
            .json();

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].month_id, month.id);
        assert_eq!(snapshots[0].month_name, "February");
    }

    #[tokio::test]
    async fn annual_report_rejects_year_out_of_range() {
        let (server, _) = get_test_server();

        for year in [1999, 9999] {
            server
                .get(endpoints::ANNUAL_REPORT)
                .add_query_param("year", year)
                .await
                .assert_status_bad_request();
        }
    }

    #[tokio::test]
    async fn snapshot_is_served_verbatim() {
        let (server, store) = get_test_server();
        let month = store.create_month(2024, 2).unwrap();
        let json = "{\"total_expected\": \"2150.00\"}";
        store.finalize_month(month.id, json).unwrap();
        let snapshot_id = store.get_annual_snapshots_metadata_by_year(2024).unwrap()[0].id;

        let response = server
            .get(&format_endpoint(endpoints::SNAPSHOT, snapshot_id))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "application/json");
        assert_eq!(response.text(), json);
    }

    #[tokio::test]
    async fn missing_snapshot_is_not_found() {
        let (server, _) = get_test_server();

        server
            .get(&format_endpoint(endpoints::SNAPSHOT, 1))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn export_contains_budget() {
        let (server, store) = get_test_server();
        let food = store
            .create_category(NewCategory::new("Food", "green").unwrap())
            .unwrap();
        let month = store.create_month(2024, 2).unwrap();
        store
            .create_budget_line(NewBudgetLine::new(month.id, food.id, "Groceries", dec!(500)).unwrap())
            .unwrap();

        let response = server.get(endpoints::EXPORT_JSON).await;

        response.assert_status_ok();
        let export: BudgetExport = response.json();
        assert_eq!(export.categories, vec![food]);
        assert_eq!(export.months.len(), 1);
        assert_eq!(export.months[0].budget_lines[0].label, "Groceries");
    }
}
