//! Unknown-tag ledger repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::UnknownRfidEntity;

/// Repository for the deduplicated unknown-tag ledger.
#[derive(Clone)]
pub struct UnknownRfidRepository {
    pool: PgPool,
}

impl UnknownRfidRepository {
    /// Creates a new UnknownRfidRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a sighting of an unknown tag: first sighting inserts a row,
    /// repeats only advance `last_seen`.
    pub async fn record_seen(
        &self,
        rfid_tag: &str,
        at: DateTime<Utc>,
    ) -> Result<UnknownRfidEntity, sqlx::Error> {
        sqlx::query_as::<_, UnknownRfidEntity>(
            r#"
            INSERT INTO unknown_rfids (rfid_tag, created_at, last_seen)
            VALUES ($1, $2, $2)
            ON CONFLICT (rfid_tag) DO UPDATE SET
                last_seen = EXCLUDED.last_seen
            RETURNING id, rfid_tag, created_at, last_seen
            "#,
        )
        .bind(rfid_tag)
        .bind(at)
        .fetch_one(&self.pool)
        .await
    }

    /// Delete ledger entries not seen since the cutoff. Returns the number
    /// of rows removed.
    pub async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM unknown_rfids
            WHERE last_seen < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Recently seen unknown tags, most recent first.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<UnknownRfidEntity>, sqlx::Error> {
        sqlx::query_as::<_, UnknownRfidEntity>(
            r#"
            SELECT id, rfid_tag, created_at, last_seen
            FROM unknown_rfids
            ORDER BY last_seen DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
