//! Gandalf Budget tracks a household's monthly budget.
//!
//! Spending is planned per category as budget lines, and the amount actually
//! spent is recorded against each line. When every line of a month has its
//! spending recorded, the month is finalized: its board is archived as a
//! snapshot and its budget lines are rolled forward into the next month.
//!
//! This library provides the store, the month lifecycle and a JSON API over both.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod board;
mod budget_line;
mod category;
mod database_id;
mod db;
mod endpoints;
mod error;
mod logging;
mod money;
mod month;
mod report;
mod routing;
pub mod stores;

pub use app_state::{AppState, SQLAppState, create_app_state};
pub use budget_line::NewBudgetLine;
pub use category::NewCategory;
pub use database_id::DatabaseId;
pub use db::initialize as initialize_db;
pub use error::{Error, ErrorKind};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::{close_month, seed_initial_month};
pub use routing::{add_logging_layers, build_router};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`. If a signal handler cannot be
/// installed, the error is logged and only the other signal is waited for.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}
