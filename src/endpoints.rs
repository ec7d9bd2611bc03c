//! The JSON API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/v1/categories/{category_id}', use [format_endpoint].

/// Reports whether the server is up.
pub const HEALTH: &str = "/api/v1/health";
/// The totals of a month broken down by category. Takes the `month_id` query parameter.
pub const DASHBOARD: &str = "/api/v1/dashboard";
/// The budget lines of a month joined with categories and actuals.
pub const BOARD: &str = "/api/v1/board/{month_id}";
/// The latest open month.
pub const CURRENT_MONTH: &str = "/api/v1/months/current";
/// Whether a month may be finalized.
pub const CAN_FINALIZE_MONTH: &str = "/api/v1/months/{month_id}/can-finalize";
/// Close a month and roll it forward.
pub const FINALIZE_MONTH: &str = "/api/v1/months/{month_id}/finalize";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/v1/categories";
/// The route to update and delete a category.
pub const CATEGORY: &str = "/api/v1/categories/{category_id}";
/// The route to list and create budget lines. Listing takes the `month_id` query parameter.
pub const BUDGET_LINES: &str = "/api/v1/budget-lines";
/// The route to update and delete a budget line.
pub const BUDGET_LINE: &str = "/api/v1/budget-lines/{budget_line_id}";
/// The route to record the actual amount of a budget line.
pub const ACTUAL_LINE: &str = "/api/v1/actual-lines/{actual_line_id}";
/// The snapshots of a year. Takes the `year` query parameter.
pub const ANNUAL_REPORT: &str = "/api/v1/reports/annual";
/// The raw JSON of one snapshot.
pub const SNAPSHOT: &str = "/api/v1/reports/snapshots/{snapshot_id}";
/// Download everything as JSON.
pub const EXPORT_JSON: &str = "/api/v1/export/json";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, for
/// example '{category_id}' in '/api/v1/categories/{category_id}'. Only the first
/// parameter is replaced. If there is no parameter, `endpoint_path` is
/// returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };
    let end = endpoint_path[start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| start + offset + 1);

    format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end..])
}

#[cfg(test)]
mod endpoints_tests {
    use crate::endpoints;

    use super::format_endpoint;

    #[test]
    fn replaces_parameter() {
        assert_eq!(
            format_endpoint(endpoints::CATEGORY, 7),
            "/api/v1/categories/7"
        );
        assert_eq!(
            format_endpoint(endpoints::FINALIZE_MONTH, 12),
            "/api/v1/months/12/finalize"
        );
    }

    #[test]
    fn path_without_parameter_is_unchanged() {
        assert_eq!(
            format_endpoint(endpoints::CATEGORIES, 1),
            endpoints::CATEGORIES
        );
    }
}
