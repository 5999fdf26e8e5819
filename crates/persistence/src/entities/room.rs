//! Room entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the rooms table.
#[derive(Debug, Clone, FromRow)]
pub struct RoomEntity {
    pub id: Uuid,
    pub number: String,
    pub floor: Option<i32>,
    pub capacity: i32,
    pub is_active: bool,
    pub dormitory_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<RoomEntity> for domain::models::Room {
    fn from(entity: RoomEntity) -> Self {
        Self {
            id: entity.id,
            number: entity.number,
            floor: entity.floor,
            capacity: entity.capacity,
            is_active: entity.is_active,
            dormitory_id: entity.dormitory_id,
            created_at: entity.created_at,
        }
    }
}
