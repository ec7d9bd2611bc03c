//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many characters are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Some(body_text) = read_body(body).await else {
        return (StatusCode::BAD_REQUEST, "could not read request body").into_response();
    };
    log_body(
        &format!("Received request: {} {}", parts.method, parts.uri),
        &body_text,
    );

    let response = next.run(Request::from_parts(parts, body_text.into())).await;

    let (parts, body) = response.into_parts();
    let Some(body_text) = read_body(body).await else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    log_body(&format!("Sending response: {}", parts.status), &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn read_body(body: Body) -> Option<String> {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).to_string()),
        Err(error) => {
            tracing::error!("could not read body for logging: {error}");
            None
        }
    }
}

fn log_body(summary: &str, body: &str) {
    match truncate(body, LOG_BODY_LENGTH_LIMIT) {
        Some(prefix) => {
            tracing::info!("{summary}\nbody: {prefix}...");
            tracing::debug!("Full body: {body:?}");
        }
        None => tracing::info!("{summary}\nbody: {body:?}"),
    }
}

/// The first `limit` characters of `text`, or `None` if it is not longer than that.
fn truncate(text: &str, limit: usize) -> Option<&str> {
    text.char_indices()
        .nth(limit)
        .map(|(byte_index, _)| &text[..byte_index])
}
