//! Attendance entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::AttendanceStatus;

/// Database row mapping for the attendances table.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceEntity {
    pub id: Uuid,
    pub student_id: Uuid,
    pub schedule_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub recorded_by_id: Uuid,
    pub notes: Option<String>,
}

impl AttendanceEntity {
    /// Parses the stored status column. The column carries a CHECK
    /// constraint, so anything unparseable reads as `Absent`.
    pub fn status(&self) -> AttendanceStatus {
        AttendanceStatus::parse(&self.status).unwrap_or(AttendanceStatus::Absent)
    }
}

impl From<AttendanceEntity> for domain::models::Attendance {
    fn from(entity: AttendanceEntity) -> Self {
        let status = entity.status();
        Self {
            id: entity.id,
            student_id: entity.student_id,
            schedule_id: entity.schedule_id,
            timestamp: entity.timestamp,
            status,
            recorded_by_id: entity.recorded_by_id,
            notes: entity.notes,
        }
    }
}

/// Attendance row joined with student, schedule, and recorder names.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceWithNamesEntity {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub student_id: Uuid,
    pub student_name: String,
    pub schedule_id: Uuid,
    pub schedule_name: String,
    pub recorded_by_id: Uuid,
    pub recorded_by_name: String,
}

impl From<AttendanceWithNamesEntity> for domain::models::AttendanceRecord {
    fn from(entity: AttendanceWithNamesEntity) -> Self {
        let status = AttendanceStatus::parse(&entity.status).unwrap_or(AttendanceStatus::Absent);
        Self {
            id: entity.id,
            timestamp: entity.timestamp,
            status,
            notes: entity.notes,
            student_id: entity.student_id,
            student_name: entity.student_name,
            schedule_id: entity.schedule_id,
            schedule_name: entity.schedule_name,
            recorded_by_id: entity.recorded_by_id,
            recorded_by_name: entity.recorded_by_name,
        }
    }
}
