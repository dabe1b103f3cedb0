//! Error types for the log store

use thiserror::Error;
use tracing::debug;

/// Errors that can occur when reading or writing log entries
#[derive(Debug, Error)]
pub enum LogError {
    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for LogError {
    fn from(err: sqlx::Error) -> Self {
        debug!("sqlxError: {:?}", err);

        LogError::UnknownError(err.into())
    }
}
