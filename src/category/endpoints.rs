//! Category endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState, Error,
    category::{Category, CategoryColor, CategoryFormData, CategoryId, CategoryName, NewCategory},
    stores::BudgetStore,
};

/// List all categories ordered by name.
pub async fn get_categories_endpoint<S: BudgetStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Category>>, Error> {
    state.store.get_all_categories().map(Json)
}

/// Create a category from the name and color in the request body.
pub async fn create_category_endpoint<S: BudgetStore>(
    State(state): State<AppState<S>>,
    Json(form): Json<CategoryFormData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let category = NewCategory::new(&form.name, &form.color)?;
    let category = state.store.create_category(category)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace the name and color of a category.
pub async fn update_category_endpoint<S: BudgetStore>(
    Path(category_id): Path<CategoryId>,
    State(state): State<AppState<S>>,
    Json(form): Json<CategoryFormData>,
) -> Result<Json<Category>, Error> {
    let category = Category {
        id: category_id,
        name: CategoryName::new(&form.name)?,
        color: CategoryColor::new(&form.color)?,
    };

    state.store.update_category(&category).inspect_err(|error| {
        tracing::debug!("Could not update category {category_id}: {error}");
    })?;

    Ok(Json(category))
}

/// Delete a category that no budget line uses.
pub async fn delete_category_endpoint<S: BudgetStore>(
    Path(category_id): Path<CategoryId>,
    State(state): State<AppState<S>>,
) -> Result<StatusCode, Error> {
    state.store.delete_category(category_id)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod category_endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    use crate::{
        AppState, build_router,
        budget_line::NewBudgetLine,
        category::{Category, NewCategory},
        endpoints::{self, format_endpoint},
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
    async fn create_category_returns_created() {
        let (server, store) = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "name": " Food ", "color": "green" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let category: Category = response.json();
        assert_eq!(category.name.as_ref(), "Food");
        assert_eq!(store.get_all_categories().unwrap(), vec![category]);
    }

    #[tokio::test]
    async fn create_category_with_empty_name_is_bad_request() {
        let (server, store) = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "name": "", "color": "green" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "category name cannot be empty");
        assert!(store.get_all_categories().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_category_is_bad_request() {
        let (server, store) = get_test_server();
        store
            .create_category(NewCategory::new("Food", "green").unwrap())
            .unwrap();

        server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "name": "Food", "color": "red" }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn list_categories_is_sorted() {
        let (server, store) = get_test_server();
        for name in ["Travel", "Food"] {
            store
                .create_category(NewCategory::new(name, "blue").unwrap())
                .unwrap();
        }

        let categories: Vec<Category> = server.get(endpoints::CATEGORIES).await.json();

        let names: Vec<&str> = categories.iter().map(|c| c.name.as_ref()).collect();
        assert_eq!(names, vec!["Food", "Travel"]);
    }

    #[tokio::test]
    async fn update_category_succeeds() {
        let (server, store) = get_test_server();
        let category = store
            .create_category(NewCategory::new("Food", "green").unwrap())
            .unwrap();

        server
            .put(&format_endpoint(endpoints::CATEGORY, category.id))
            .json(&json!({ "name": "Groceries", "color": "teal" }))
            .await
            .assert_status_ok();

        let updated = store.get_category(category.id).unwrap();
        assert_eq!(updated.name.as_ref(), "Groceries");
        assert_eq!(updated.color.as_ref(), "teal");
    }

    #[tokio::test]
    async fn update_missing_category_is_not_found() {
        let (server, _) = get_test_server();

        server
            .put(&format_endpoint(endpoints::CATEGORY, 404))
            .json(&json!({ "name": "Groceries", "color": "teal" }))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_category_in_use_is_bad_request() {
        let (server, store) = get_test_server();
        let category = store
            .create_category(NewCategory::new("Food", "green").unwrap())
            .unwrap();
        let month = store.create_month(2024, 1).unwrap();
        store
            .create_budget_line(NewBudgetLine::new(month.id, category.id, "Groceries", dec!(1)).unwrap())
            .unwrap();

        server
            .delete(&format_endpoint(endpoints::CATEGORY, category.id))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn delete_category_succeeds() {
        let (server, store) = get_test_server();
        let category = store
            .create_category(NewCategory::new("Food", "green").unwrap())
            .unwrap();

        server
            .delete(&format_endpoint(endpoints::CATEGORY, category.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        assert!(store.get_all_categories().unwrap().is_empty());
    }
}
