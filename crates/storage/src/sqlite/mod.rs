use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{ProgressRepository, Storage, StorageError};

mod mapping;
mod migrate;
mod progress_repo;

/// Default bound on a single storage operation.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
    io_timeout: Duration,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL and the default I/O timeout.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or if
    /// the connection pragmas fail during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        Self::connect_with_timeout(database_url, DEFAULT_IO_TIMEOUT).await
    }

    /// Connect with `io_timeout` bounding each operation, pool acquisition and
    /// `SQLite` lock waits.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or if
    /// the connection pragmas fail during setup.
    pub async fn connect_with_timeout(
        database_url: &str,
        io_timeout: Duration,
    ) -> Result<Self, SqliteInitError> {
        let busy_ms = i32::try_from(io_timeout.as_millis()).unwrap_or(i32::MAX);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(io_timeout)
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query(&format!("PRAGMA busy_timeout = {busy_ms};"))
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool, io_timeout })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }

    /// Run `op`, failing with `StorageError::Timeout` once `io_timeout` elapses.
    ///
    /// Dropping a timed-out operation rolls back any open transaction.
    async fn bounded<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        tokio::time::timeout(self.io_timeout, op)
            .await
            .map_err(|_| StorageError::Timeout(self.io_timeout))?
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str, io_timeout: Duration) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect_with_timeout(database_url, io_timeout).await?;
        repo.migrate().await?;
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Ok(Self { progress })
    }
}
