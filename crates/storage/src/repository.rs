use async_trait::async_trait;
use chrono::{DateTime, Utc};
use literacy_core::model::{LearningProgress, ProgressKey, UserId, WordId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt record {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("storage operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Repository contract for per-word learning progress.
///
/// Records are keyed by `(user, word)`; at most one exists per key and only
/// once an attempt has been recorded.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch one record. Missing and unreadable records both come back as `None`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_progress(
        &self,
        user_id: &UserId,
        word_id: &WordId,
    ) -> Result<Option<LearningProgress>, StorageError>;

    /// All readable records of a learner, in the order they were first recorded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_progress(&self, user_id: &UserId) -> Result<Vec<LearningProgress>, StorageError>;

    /// Apply one attempt as an atomic read-modify-write and return the stored record.
    ///
    /// Creates the record on the first attempt. An unreadable existing record
    /// is replaced as if it were absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update cannot be committed; nothing is
    /// stored in that case.
    async fn record_attempt(
        &self,
        user_id: &UserId,
        word_id: &WordId,
        was_correct: bool,
        at: DateTime<Utc>,
    ) -> Result<LearningProgress, StorageError>;

    /// Remove a record, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete cannot be committed.
    async fn reset_progress(&self, user_id: &UserId, word_id: &WordId)
    -> Result<bool, StorageError>;
}

#[derive(Default)]
struct ProgressTable {
    next_seq: u64,
    rows: HashMap<ProgressKey, (u64, LearningProgress)>,
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// The table lock is held for the whole read-modify-write of an attempt.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<ProgressTable>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<std::sync::MutexGuard<'_, ProgressTable>, StorageError> {
        self.progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(
        &self,
        user_id: &UserId,
        word_id: &WordId,
    ) -> Result<Option<LearningProgress>, StorageError> {
        let key = ProgressKey::new(user_id.clone(), word_id.clone());
        let guard = self.table()?;
        Ok(guard.rows.get(&key).map(|(_, p)| p.clone()))
    }

    async fn list_progress(&self, user_id: &UserId) -> Result<Vec<LearningProgress>, StorageError> {
        let guard = self.table()?;
        let mut rows: Vec<&(u64, LearningProgress)> = guard
            .rows
            .iter()
            .filter(|(key, _)| &key.user_id == user_id)
            .map(|(_, row)| row)
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, p)| p.clone()).collect())
    }

    async fn record_attempt(
        &self,
        user_id: &UserId,
        word_id: &WordId,
        was_correct: bool,
        at: DateTime<Utc>,
    ) -> Result<LearningProgress, StorageError> {
        let key = ProgressKey::new(user_id.clone(), word_id.clone());
        let mut guard = self.table()?;
        let table = &mut *guard;

        if let Some((_, progress)) = table.rows.get_mut(&key) {
            progress.record_attempt(was_correct, at);
            return Ok(progress.clone());
        }

        let progress =
            LearningProgress::first_attempt(user_id.clone(), word_id.clone(), was_correct, at);
        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.insert(key, (seq, progress.clone()));
        Ok(progress)
    }

    async fn reset_progress(
        &self,
        user_id: &UserId,
        word_id: &WordId,
    ) -> Result<bool, StorageError> {
        let key = ProgressKey::new(user_id.clone(), word_id.clone());
        let mut guard = self.table()?;
        Ok(guard.rows.remove(&key).is_some())
    }
}

/// Progress storage behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryRepository::new()),
        }
    }
}
