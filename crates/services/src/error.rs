//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors reported by a `SpeechEngine`. The narrator logs these and carries on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),
    #[error("speech failed: {0}")]
    Failed(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
