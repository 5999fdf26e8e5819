//! Room repository for database operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RoomEntity;

const ROOM_COLUMNS: &str = "id, number, floor, capacity, is_active, dormitory_id, created_at";

/// Repository for room-related database operations.
#[derive(Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    /// Creates a new RoomRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new room.
    pub async fn create(
        &self,
        number: &str,
        floor: Option<i32>,
        capacity: i32,
        dormitory_id: Uuid,
    ) -> Result<RoomEntity, sqlx::Error> {
        sqlx::query_as::<_, RoomEntity>(&format!(
            r#"
            INSERT INTO rooms (number, floor, capacity, is_active, dormitory_id, created_at)
            VALUES ($1, $2, $3, true, $4, $5)
            RETURNING {ROOM_COLUMNS}
            "#,
        ))
        .bind(number)
        .bind(floor)
        .bind(capacity)
        .bind(dormitory_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Find a room by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RoomEntity>, sqlx::Error> {
        sqlx::query_as::<_, RoomEntity>(&format!(
            r#"
            SELECT {ROOM_COLUMNS}
            FROM rooms
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List rooms in a dormitory, sorted by room number.
    pub async fn list_by_dormitory(
        &self,
        dormitory_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RoomEntity>, sqlx::Error> {
        sqlx::query_as::<_, RoomEntity>(&format!(
            r#"
            SELECT {ROOM_COLUMNS}
            FROM rooms
            WHERE dormitory_id = $1
            ORDER BY number ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(dormitory_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Update room attributes. Absent fields are unchanged.
    pub async fn update(
        &self,
        id: Uuid,
        number: Option<&str>,
        floor: Option<i32>,
        capacity: Option<i32>,
    ) -> Result<Option<RoomEntity>, sqlx::Error> {
        sqlx::query_as::<_, RoomEntity>(&format!(
            r#"
            UPDATE rooms
            SET number = COALESCE($2, number),
                floor = COALESCE($3, floor),
                capacity = COALESCE($4, capacity)
            WHERE id = $1
            RETURNING {ROOM_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(number)
        .bind(floor)
        .bind(capacity)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deactivate a room (soft delete). Returns the number of rows affected.
    pub async fn deactivate(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE rooms
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
