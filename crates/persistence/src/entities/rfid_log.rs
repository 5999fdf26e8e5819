//! RFID scan ledger entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the rfid_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct RfidLogEntity {
    pub id: Uuid,
    pub student_id: Uuid,
    pub device_id: Uuid,
    pub schedule_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl From<RfidLogEntity> for domain::models::RfidLog {
    fn from(entity: RfidLogEntity) -> Self {
        Self {
            id: entity.id,
            student_id: entity.student_id,
            device_id: entity.device_id,
            schedule_id: entity.schedule_id,
            timestamp: entity.timestamp,
        }
    }
}
