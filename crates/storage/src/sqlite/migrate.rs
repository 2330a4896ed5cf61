use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Applies the versioned schema.
///
/// Version 1: the `learning_progress` table, one row per (user, word).
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        // cross-field rules (correct <= total, mastery <= 100) are checked on load
        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS learning_progress (
                    user_id TEXT NOT NULL,
                    word_id TEXT NOT NULL,
                    correct_count INTEGER NOT NULL CHECK (correct_count >= 0),
                    total_attempts INTEGER NOT NULL CHECK (total_attempts >= 0),
                    mastery_level INTEGER NOT NULL CHECK (mastery_level >= 0),
                    last_studied TEXT NOT NULL,
                    PRIMARY KEY (user_id, word_id)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
