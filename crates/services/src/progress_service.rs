use std::sync::Arc;

use literacy_core::{
    WordCatalog,
    model::{LearningProgress, UserId, Word, WordId},
    stats::{self, ProgressSummary},
    time::Clock,
};
use storage::repository::ProgressRepository;

use crate::error::ProgressServiceError;

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Single entry point screens use for words, progress and statistics.
///
/// Build one per process and share it behind an `Arc`. The service keeps no
/// state of its own beyond the clock that timestamps attempts.
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<WordCatalog>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<WordCatalog>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            progress,
        }
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &WordCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn word(&self, id: &WordId) -> Option<&Word> {
        self.catalog.get(id)
    }

    /// All progress records of a learner.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn progress(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<LearningProgress>, ProgressServiceError> {
        Ok(self.progress.list_progress(user_id).await?)
    }

    /// Progress of a learner on one word, `None` if never practised.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn progress_for_word(
        &self,
        user_id: &UserId,
        word_id: &WordId,
    ) -> Result<Option<LearningProgress>, ProgressServiceError> {
        Ok(self.progress.get_progress(user_id, word_id).await?)
    }

    /// Record one practice attempt, timestamped with the service clock.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the attempt could not be
    /// committed. The attempt is neither dropped silently nor retried.
    pub async fn record_attempt(
        &self,
        user_id: &UserId,
        word_id: &WordId,
        was_correct: bool,
    ) -> Result<LearningProgress, ProgressServiceError> {
        if !self.catalog.contains(word_id) {
            tracing::debug!(user = %user_id, word = %word_id, "attempt on word outside catalog");
        }
        let at = self.clock.now();
        match self
            .progress
            .record_attempt(user_id, word_id, was_correct, at)
            .await
        {
            Ok(progress) => Ok(progress),
            Err(err) => {
                tracing::warn!(user = %user_id, word = %word_id, error = %err, "attempt not recorded");
                Err(err.into())
            }
        }
    }

    /// Forget a learner's progress on one word. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the delete fails.
    pub async fn reset_word(
        &self,
        user_id: &UserId,
        word_id: &WordId,
    ) -> Result<bool, ProgressServiceError> {
        let removed = self.progress.reset_progress(user_id, word_id).await?;
        if removed {
            tracing::info!(user = %user_id, word = %word_id, "progress reset");
        }
        Ok(removed)
    }

    /// Progress-screen statistics, recomputed on every call.
    ///
    /// A storage read failure is logged and summarized as "nothing studied yet"
    /// so the screen stays usable.
    pub async fn summary(&self, user_id: &UserId) -> ProgressSummary {
        let progress = match self.progress.list_progress(user_id).await {
            Ok(progress) => progress,
            Err(err) => {
                tracing::warn!(user = %user_id, error = %err, "progress unavailable; showing empty summary");
                Vec::new()
            }
        };
        stats::summarize(&self.catalog, progress)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
