use diesel::Connection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::AsyncPgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::error::DatabaseError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Bring the `books` table up to date. Already applied migrations are skipped,
/// so this is safe to run on every start.
///
/// Returns the number of migrations that were applied.
pub async fn run_migrations(db_url: &str) -> Result<usize, DatabaseError> {
    let db_url = db_url.to_string();

    // The migration harness is synchronous, so keep it off the async workers
    tokio::task::spawn_blocking(move || -> Result<usize, DatabaseError> {
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&db_url)?;
        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(DatabaseError::Migration)?;

        for version in &versions {
            info!("Applied DB migration {}", version);
        }
        Ok(versions.len())
    })
    .await?
}
