use diesel_async::pooled_connection::PoolError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("problem getting a connection from the connection pool: {0}")]
    Pool(#[from] bb8::RunError<PoolError>),
    #[error("problem building the connection pool: {0}")]
    PoolBuild(#[from] PoolError),
    #[error("problem executing a statement against the DB: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("problem connecting to the DB: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("problem running DB migrations: {0}")]
    Migration(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("DB migration task did not complete: {0}")]
    MigrationTask(#[from] tokio::task::JoinError),
    #[error("no book IDs left to assign")]
    IdsExhausted,
}

/// Errors surfaced by a [`BookRepo`](crate::repo::BookRepo).
///
/// Callers must keep "does not exist" apart from "operation failed".
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("no book found with ID: {0}")]
    NotFound(i32),
    #[error("invalid book: {0}")]
    Validation(String),
    #[error(transparent)]
    Persistence(#[from] DatabaseError),
}

impl From<diesel::result::Error> for RepoError {
    fn from(error: diesel::result::Error) -> Self {
        RepoError::Persistence(error.into())
    }
}

impl From<bb8::RunError<PoolError>> for RepoError {
    fn from(error: bb8::RunError<PoolError>) -> Self {
        RepoError::Persistence(error.into())
    }
}

/// Anything that prevents the server from starting. None of these are recoverable.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
