//! Dormitory entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the dormitories table.
#[derive(Debug, Clone, FromRow)]
pub struct DormitoryEntity {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DormitoryEntity> for domain::models::Dormitory {
    fn from(entity: DormitoryEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            address: entity.address,
            is_active: entity.is_active,
            created_at: entity.created_at,
        }
    }
}
