use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::ids::{UserId, WordId};
use crate::model::mastery::{MasteryLevel, MasteryOutOfRange};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a persisted record cannot be rehydrated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("record has no attempts")]
    NoAttempts,

    #[error("correct count ({correct}) exceeds total attempts ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },

    #[error(transparent)]
    Mastery(#[from] MasteryOutOfRange),
}

//
// ─── LEARNING PROGRESS ─────────────────────────────────────────────────────────
//

/// Practice history of one learner on one word.
///
/// Invariants held by every value of this type:
/// - `total_attempts >= 1`
/// - `correct_count <= total_attempts`
/// - `mastery_level <= 100`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearningProgress {
    user_id: UserId,
    word_id: WordId,
    correct_count: u32,
    total_attempts: u32,
    mastery_level: MasteryLevel,
    last_studied: DateTime<Utc>,
}

impl LearningProgress {
    /// Record for the very first attempt on a word.
    #[must_use]
    pub fn first_attempt(
        user_id: UserId,
        word_id: WordId,
        was_correct: bool,
        at: DateTime<Utc>,
    ) -> Self {
        let mut progress = Self {
            user_id,
            word_id,
            correct_count: 0,
            total_attempts: 0,
            mastery_level: MasteryLevel::MIN,
            last_studied: at,
        };
        progress.record_attempt(was_correct, at);
        progress
    }

    /// Rehydrate a record from storage.
    ///
    /// The stored mastery level is kept as-is rather than recomputed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the stored values break a record invariant.
    pub fn from_persisted(
        user_id: UserId,
        word_id: WordId,
        correct_count: u32,
        total_attempts: u32,
        mastery_level: u8,
        last_studied: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        if total_attempts == 0 {
            return Err(ProgressError::NoAttempts);
        }
        if correct_count > total_attempts {
            return Err(ProgressError::CorrectExceedsTotal {
                correct: correct_count,
                total: total_attempts,
            });
        }
        Ok(Self {
            user_id,
            word_id,
            correct_count,
            total_attempts,
            mastery_level: MasteryLevel::new(mastery_level)?,
            last_studied,
        })
    }

    /// Rebuild a record from raw counts, recomputing mastery.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the counts break a record invariant.
    pub fn from_counts(
        user_id: UserId,
        word_id: WordId,
        correct_count: u32,
        total_attempts: u32,
        last_studied: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        let mastery = MasteryLevel::from_counts(correct_count, total_attempts);
        Self::from_persisted(
            user_id,
            word_id,
            correct_count,
            total_attempts,
            mastery.value(),
            last_studied,
        )
    }

    /// Apply one practice attempt in place.
    ///
    /// Counts saturate at `u32::MAX` instead of wrapping.
    pub fn record_attempt(&mut self, was_correct: bool, at: DateTime<Utc>) {
        if self.total_attempts == u32::MAX {
            return;
        }
        self.total_attempts += 1;
        if was_correct {
            self.correct_count += 1;
        }
        self.mastery_level = MasteryLevel::from_counts(self.correct_count, self.total_attempts);
        self.last_studied = at;
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn word_id(&self) -> &WordId {
        &self.word_id
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    #[must_use]
    pub fn mastery_level(&self) -> MasteryLevel {
        self.mastery_level
    }

    #[must_use]
    pub fn last_studied(&self) -> DateTime<Utc> {
        self.last_studied
    }

    /// Fraction of correct attempts in `0.0..=1.0`; `0.0` with no attempts.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        f64::from(self.correct_count) / f64::from(self.total_attempts)
    }
}
