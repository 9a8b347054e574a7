mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod repo;
mod schema;

use axum::{serve::Serve, Router};
use tokio::net::TcpListener;
use tracing::info;

pub use api::build_app;
use config::Config;
use database::{create_db_pool, DatabaseBookRepo};
use error::StartupError;
use migrations::run_migrations;

/// Migrate the database, then bind the HTTP listener.
///
/// The server is not started if the schema could not be brought up to date.
pub async fn start_server(
    config: &Config,
) -> Result<Serve<TcpListener, Router, Router>, StartupError> {
    let db_url = config.database.connection_string();

    let applied = run_migrations(&db_url).await?;
    info!("Database migration completed, {} migrations applied", applied);

    let pool = create_db_pool(&config.database).await?;
    let repo = DatabaseBookRepo::new(pool, config.database.slow_query_threshold);

    let router = build_app(repo);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.bind_addr,
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| StartupError::Bind {
        addr: config.bind_addr,
        source,
    })?;
    info!("Listening on {}", local_addr);

    Ok(axum::serve(listener, router))
}
