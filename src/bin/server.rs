use std::{
    error::Error,
    fs::OpenOptions,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use gandalf_budget::{add_logging_layers, build_router, create_app_state, graceful_shutdown};

/// The JSON API server for gandalf_budget.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// File path to write debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(&args.log_path)?;

    let conn = Connection::open(&args.db_path)?;
    let state = create_app_state(conn, OffsetDateTime::now_utc().date())?;

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_logging_layers(build_router(state));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

/// Log to stdout at the level given by `RUST_LOG` (`info` by default), and
/// everything from `debug` up to `log_path`.
fn setup_logging(log_path: &Path) -> Result<(), Box<dyn Error>> {
    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .try_init()?;

    Ok(())
}
