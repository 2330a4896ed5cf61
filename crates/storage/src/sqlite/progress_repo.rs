use async_trait::async_trait;
use chrono::{DateTime, Utc};
use literacy_core::model::{LearningProgress, ProgressKey, UserId, WordId};

use super::{
    SqliteRepository,
    mapping::{PROGRESS_COLUMNS, map_counts, map_progress_row, skip_corrupt, sqlx_err},
};
use crate::repository::{ProgressRepository, StorageError};

impl SqliteRepository {
    async fn select_progress(
        &self,
        user_id: &UserId,
        word_id: &WordId,
    ) -> Result<Option<LearningProgress>, StorageError> {
        let sql = format!(
            "SELECT {PROGRESS_COLUMNS} FROM learning_progress WHERE user_id = ?1 AND word_id = ?2"
        );
        let row = sqlx::query(&sql)
            .bind(user_id.as_str())
            .bind(word_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        skip_corrupt(map_progress_row(&row))
    }

    async fn select_user_progress(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<LearningProgress>, StorageError> {
        // rowid survives upserts, so this is first-recorded order
        let sql = format!(
            "SELECT {PROGRESS_COLUMNS} FROM learning_progress WHERE user_id = ?1 ORDER BY rowid ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_err)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(progress) = skip_corrupt(map_progress_row(&row))? {
                out.push(progress);
            }
        }
        Ok(out)
    }

    async fn apply_attempt(
        &self,
        user_id: &UserId,
        word_id: &WordId,
        was_correct: bool,
        at: DateTime<Utc>,
    ) -> Result<LearningProgress, StorageError> {
        let key = ProgressKey::new(user_id.clone(), word_id.clone()).to_string();

        let mut tx = self.pool.begin().await.map_err(sqlx_err)?;

        // Writing first takes the database write lock before the counts are
        // read back, so concurrent attempts on the same key serialize here.
        // A record whose attempt counter is full is left untouched.
        let row = sqlx::query(
            r"
            INSERT INTO learning_progress (
                user_id, word_id, correct_count, total_attempts, mastery_level, last_studied
            )
            VALUES (?1, ?2, ?3, 1, 0, ?4)
            ON CONFLICT(user_id, word_id) DO UPDATE SET
                correct_count = correct_count + excluded.correct_count,
                total_attempts = total_attempts + 1,
                last_studied = excluded.last_studied
            WHERE total_attempts < ?5
            RETURNING correct_count, total_attempts
            ",
        )
        .bind(user_id.as_str())
        .bind(word_id.as_str())
        .bind(i64::from(was_correct))
        .bind(at)
        .bind(i64::from(u32::MAX))
        .fetch_optional(&mut *tx)
        .await
        .map_err(sqlx_err)?;

        let rebuilt = match row {
            Some(row) => map_counts(&row, &key).and_then(|(correct, total)| {
                LearningProgress::from_counts(user_id.clone(), word_id.clone(), correct, total, at)
                    .map_err(|e| StorageError::CorruptRecord {
                        key: key.clone(),
                        reason: e.to_string(),
                    })
            }),
            None => {
                let sql = format!(
                    "SELECT {PROGRESS_COLUMNS} FROM learning_progress WHERE user_id = ?1 AND word_id = ?2"
                );
                let current = sqlx::query(&sql)
                    .bind(user_id.as_str())
                    .bind(word_id.as_str())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(sqlx_err)?;
                match map_progress_row(&current) {
                    Ok(unchanged) => {
                        tx.commit().await.map_err(sqlx_err)?;
                        tracing::debug!(%key, "attempt counter full; record unchanged");
                        return Ok(unchanged);
                    }
                    Err(err) => Err(err),
                }
            }
        };
        let progress = match rebuilt {
            Ok(progress) => progress,
            Err(StorageError::CorruptRecord { reason, .. }) => {
                tracing::warn!(%key, %reason, "replacing corrupt progress record");
                LearningProgress::first_attempt(user_id.clone(), word_id.clone(), was_correct, at)
            }
            Err(other) => return Err(other),
        };

        sqlx::query(
            r"
            UPDATE learning_progress SET
                correct_count = ?3,
                total_attempts = ?4,
                mastery_level = ?5,
                last_studied = ?6
            WHERE user_id = ?1 AND word_id = ?2
            ",
        )
        .bind(user_id.as_str())
        .bind(word_id.as_str())
        .bind(i64::from(progress.correct_count()))
        .bind(i64::from(progress.total_attempts()))
        .bind(i64::from(progress.mastery_level().value()))
        .bind(progress.last_studied())
        .execute(&mut *tx)
        .await
        .map_err(sqlx_err)?;

        tx.commit().await.map_err(sqlx_err)?;

        tracing::debug!(
            %key,
            correct = progress.correct_count(),
            total = progress.total_attempts(),
            mastery = progress.mastery_level().value(),
            "recorded attempt"
        );
        Ok(progress)
    }

    async fn delete_progress(
        &self,
        user_id: &UserId,
        word_id: &WordId,
    ) -> Result<bool, StorageError> {
        let res = sqlx::query(
            r"
            DELETE FROM learning_progress
            WHERE user_id = ?1 AND word_id = ?2
            ",
        )
        .bind(user_id.as_str())
        .bind(word_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(sqlx_err)?;

        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(
        &self,
        user_id: &UserId,
        word_id: &WordId,
    ) -> Result<Option<LearningProgress>, StorageError> {
        self.bounded(self.select_progress(user_id, word_id)).await
    }

    async fn list_progress(&self, user_id: &UserId) -> Result<Vec<LearningProgress>, StorageError> {
        self.bounded(self.select_user_progress(user_id)).await
    }

    async fn record_attempt(
        &self,
        user_id: &UserId,
        word_id: &WordId,
        was_correct: bool,
        at: DateTime<Utc>,
    ) -> Result<LearningProgress, StorageError> {
        self.bounded(self.apply_attempt(user_id, word_id, was_correct, at))
            .await
    }

    async fn reset_progress(
        &self,
        user_id: &UserId,
        word_id: &WordId,
    ) -> Result<bool, StorageError> {
        self.bounded(self.delete_progress(user_id, word_id)).await
    }
}
