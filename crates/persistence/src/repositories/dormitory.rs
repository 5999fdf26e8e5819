//! Dormitory repository for database operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::DormitoryEntity;

/// Repository for dormitory-related database operations.
#[derive(Clone)]
pub struct DormitoryRepository {
    pool: PgPool,
}

impl DormitoryRepository {
    /// Creates a new DormitoryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new dormitory.
    pub async fn create(
        &self,
        name: &str,
        address: Option<&str>,
    ) -> Result<DormitoryEntity, sqlx::Error> {
        sqlx::query_as::<_, DormitoryEntity>(
            r#"
            INSERT INTO dormitories (name, address, is_active, created_at)
            VALUES ($1, $2, true, $3)
            RETURNING id, name, address, is_active, created_at
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Find a dormitory by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DormitoryEntity>, sqlx::Error> {
        sqlx::query_as::<_, DormitoryEntity>(
            r#"
            SELECT id, name, address, is_active, created_at
            FROM dormitories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List all dormitories, newest first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<DormitoryEntity>, sqlx::Error> {
        sqlx::query_as::<_, DormitoryEntity>(
            r#"
            SELECT id, name, address, is_active, created_at
            FROM dormitories
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Update name and/or address. Absent fields are unchanged.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        address: Option<&str>,
    ) -> Result<Option<DormitoryEntity>, sqlx::Error> {
        sqlx::query_as::<_, DormitoryEntity>(
            r#"
            UPDATE dormitories
            SET name = COALESCE($2, name),
                address = COALESCE($3, address)
            WHERE id = $1
            RETURNING id, name, address, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deactivate a dormitory (soft delete). Returns the number of rows
    /// affected (0 if not found or already inactive).
    pub async fn deactivate(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE dormitories
            SET is_active = false
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
