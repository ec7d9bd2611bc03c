//! Defines the app level error type and its conversion to JSON responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used to create a category color.
    #[error("category color cannot be empty")]
    EmptyCategoryColor,

    /// An empty string was used as the label of a budget line.
    #[error("budget line label cannot be empty")]
    EmptyBudgetLineLabel,

    /// A negative amount was given for the actual spending of a budget line.
    #[error("actual amount must be non-negative, got {0}")]
    NegativeActual(Decimal),

    /// A negative amount was given for the expected spending of a budget line.
    #[error("expected amount must be non-negative, got {0}")]
    NegativeExpected(Decimal),

    /// The category name is already used by another category.
    #[error("a category with this name already exists")]
    DuplicateCategoryName,

    /// A record for the calendar month already exists.
    ///
    /// This happens when a month is finalized twice, since the second
    /// finalization tries to create the same successor month again.
    #[error("a month with this year and month already exists")]
    DuplicateMonth,

    /// A query was given an ID that does not refer to an existing month or
    /// category.
    #[error("the month or category ID does not refer to a valid record")]
    InvalidForeignKey,

    /// Tried to delete a category that budget lines still refer to.
    #[error("the category is still used by {0} budget lines")]
    CategoryInUse(i64),

    /// The month cannot be closed yet. Contains the reason for the rejection.
    #[error("{0}")]
    MonthNotReady(String),

    /// A year outside the range covered by annual reports was requested.
    #[error("the year {0} is out of range")]
    InvalidYear(i32),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a budget line that does not exist
    #[error("tried to update a budget line that is not in the database")]
    UpdateMissingBudgetLine,

    /// Tried to delete a budget line that does not exist
    #[error("tried to delete a budget line that is not in the database")]
    DeleteMissingBudgetLine,

    /// Tried to update an actual line that does not exist
    #[error("tried to update an actual line that is not in the database")]
    UpdateMissingActualLine,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Another error annotated with the operation that caused it.
    #[error("{operation}: {source}")]
    Context {
        /// What was being done when the error happened, e.g. "finalize month 3".
        operation: String,
        /// The underlying error.
        source: Box<Error>,
    },
}

/// The broad class an [Error] belongs to.
///
/// Callers decide how to report an error from its kind alone, e.g. an HTTP
/// handler maps each kind to one status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was malformed or out of range. Nothing was written.
    Validation,
    /// A referenced ID does not exist.
    NotFound,
    /// The underlying store failed. Any enclosing transaction was rolled back.
    Store,
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyCategoryName
            | Error::EmptyCategoryColor
            | Error::EmptyBudgetLineLabel
            | Error::NegativeActual(_)
            | Error::NegativeExpected(_)
            | Error::DuplicateCategoryName
            | Error::InvalidForeignKey
            | Error::CategoryInUse(_)
            | Error::MonthNotReady(_)
            | Error::InvalidYear(_) => ErrorKind::Validation,
            Error::NotFound
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingBudgetLine
            | Error::DeleteMissingBudgetLine
            | Error::UpdateMissingActualLine => ErrorKind::NotFound,
            Error::DuplicateMonth
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::JSONSerializationError(_) => ErrorKind::Store,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// Wrap the error with a description of the operation that failed.
    pub fn context(self, operation: impl Into<String>) -> Self {
        Error::Context {
            operation: operation.into(),
            source: Box::new(self),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 787 => {
                Error::InvalidForeignKey
            }
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("categories.name") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("months.year") =>
            {
                Error::DuplicateMonth
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match self.kind() {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, self.to_string()),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            // Store errors are not intended to be shown to the client.
            ErrorKind::Store => {
                tracing::error!("An unexpected error occurred: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an internal error occurred, check the server logs for details".to_owned(),
                )
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use rust_decimal_macros::dec;

    use super::{Error, ErrorKind};

    #[test]
    fn context_keeps_kind_of_source() {
        let error = Error::NotFound.context("get current month details for month 42");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(
            error.to_string(),
            "get current month details for month 42: the requested resource could not be found"
        );
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let error = Error::from(rusqlite::Error::QueryReturnedNoRows);

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = Error::NegativeActual(dec!(-10.50)).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_records_are_not_found() {
        let response = Error::DeleteMissingBudgetLine.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_errors_are_internal_errors() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
