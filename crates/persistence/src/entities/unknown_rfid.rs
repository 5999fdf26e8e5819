//! Unknown-tag ledger entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the unknown_rfids table.
#[derive(Debug, Clone, FromRow)]
pub struct UnknownRfidEntity {
    pub id: Uuid,
    pub rfid_tag: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl From<UnknownRfidEntity> for domain::models::UnknownRfid {
    fn from(entity: UnknownRfidEntity) -> Self {
        Self {
            id: entity.id,
            rfid_tag: entity.rfid_tag,
            created_at: entity.created_at,
            last_seen: entity.last_seen,
        }
    }
}
