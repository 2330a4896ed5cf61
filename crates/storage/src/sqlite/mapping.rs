use chrono::{DateTime, Utc};
use literacy_core::model::{LearningProgress, UserId, WordId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) const PROGRESS_COLUMNS: &str =
    "user_id, word_id, correct_count, total_attempts, mastery_level, last_studied";

/// Classifies a driver error: value encoding problems vs. everything else.
pub(crate) fn sqlx_err(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::Encode(_) | sqlx::Error::Decode(_) | sqlx::Error::ColumnDecode { .. } => {
            StorageError::Serialization(e.to_string())
        }
        other => StorageError::Connection(other.to_string()),
    }
}

fn corrupt<E: core::fmt::Display>(key: &str, e: E) -> StorageError {
    StorageError::CorruptRecord {
        key: key.to_owned(),
        reason: e.to_string(),
    }
}

pub(crate) fn count_from_i64(key: &str, field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| corrupt(key, format!("invalid {field}: {v}")))
}

/// Reads `correct_count` and `total_attempts` from a row.
pub(crate) fn map_counts(row: &SqliteRow, key: &str) -> Result<(u32, u32), StorageError> {
    let correct = row
        .try_get::<i64, _>("correct_count")
        .map_err(|e| corrupt(key, e))?;
    let total = row
        .try_get::<i64, _>("total_attempts")
        .map_err(|e| corrupt(key, e))?;
    Ok((
        count_from_i64(key, "correct_count", correct)?,
        count_from_i64(key, "total_attempts", total)?,
    ))
}

/// Maps a full progress row. Every failure is a `StorageError::CorruptRecord`.
pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<LearningProgress, StorageError> {
    let raw_user: String = row.try_get("user_id").map_err(|e| corrupt("?", e))?;
    let raw_word: String = row.try_get("word_id").map_err(|e| corrupt("?", e))?;
    let key = format!("{raw_user}/{raw_word}");

    let user_id = UserId::new(&raw_user).map_err(|e| corrupt(&key, e))?;
    let word_id = WordId::new(&raw_word).map_err(|e| corrupt(&key, e))?;
    let (correct, total) = map_counts(row, &key)?;

    let mastery: i64 = row.try_get("mastery_level").map_err(|e| corrupt(&key, e))?;
    let mastery = u8::try_from(mastery)
        .map_err(|_| corrupt(&key, format!("invalid mastery_level: {mastery}")))?;
    let last_studied: DateTime<Utc> = row.try_get("last_studied").map_err(|e| corrupt(&key, e))?;

    LearningProgress::from_persisted(user_id, word_id, correct, total, mastery, last_studied)
        .map_err(|e| corrupt(&key, e))
}

/// Turns a corrupt record into `None`, logging it; other errors pass through.
pub(crate) fn skip_corrupt(
    mapped: Result<LearningProgress, StorageError>,
) -> Result<Option<LearningProgress>, StorageError> {
    match mapped {
        Ok(progress) => Ok(Some(progress)),
        Err(StorageError::CorruptRecord { key, reason }) => {
            tracing::warn!(%key, %reason, "ignoring corrupt progress record");
            Ok(None)
        }
        Err(other) => Err(other),
    }
}
