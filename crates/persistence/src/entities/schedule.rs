//! Attendance schedule entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the attendance_schedules table.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub dormitory_id: Uuid,
    pub created_by_id: Uuid,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_time: String,
    pub end_time: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_attendance_taken: Option<DateTime<Utc>>,
}

impl From<ScheduleEntity> for domain::models::AttendanceSchedule {
    fn from(entity: ScheduleEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            dormitory_id: entity.dormitory_id,
            created_by_id: entity.created_by_id,
            monday: entity.monday,
            tuesday: entity.tuesday,
            wednesday: entity.wednesday,
            thursday: entity.thursday,
            friday: entity.friday,
            saturday: entity.saturday,
            sunday: entity.sunday,
            start_time: entity.start_time,
            end_time: entity.end_time,
            start_date: entity.start_date,
            end_date: entity.end_date,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            last_attendance_taken: entity.last_attendance_taken,
        }
    }
}
