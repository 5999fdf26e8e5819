//! Attendance schedule domain model.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A recurring attendance time window scoped to one dormitory.
///
/// Times are wall-clock `HH:MM` strings with minute resolution, evaluated in
/// UTC. The window never spans midnight (`end_time >= start_time`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSchedule {
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

impl AttendanceSchedule {
    /// Whether the given weekday's flag is enabled.
    pub fn day_enabled(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// Request payload for schedule creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_schedule_create"))]
pub struct CreateScheduleRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    pub dormitory_id: Uuid,

    #[serde(default)]
    pub monday: bool,
    #[serde(default)]
    pub tuesday: bool,
    #[serde(default)]
    pub wednesday: bool,
    #[serde(default)]
    pub thursday: bool,
    #[serde(default)]
    pub friday: bool,
    #[serde(default)]
    pub saturday: bool,
    #[serde(default)]
    pub sunday: bool,

    #[validate(custom(function = "shared::validation::validate_wall_time"))]
    pub start_time: String,

    #[validate(custom(function = "shared::validation::validate_wall_time"))]
    pub end_time: String,

    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

fn validate_schedule_create(req: &CreateScheduleRequest) -> Result<(), ValidationError> {
    shared::validation::validate_time_window(&req.start_time, &req.end_time)?;
    shared::validation::validate_date_range(req.start_date, req.end_date)?;
    Ok(())
}

/// Partial update payload for a schedule. Fields left out are unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateScheduleRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    pub monday: Option<bool>,
    pub tuesday: Option<bool>,
    pub wednesday: Option<bool>,
    pub thursday: Option<bool>,
    pub friday: Option<bool>,
    pub saturday: Option<bool>,
    pub sunday: Option<bool>,

    #[validate(custom(function = "shared::validation::validate_wall_time"))]
    pub start_time: Option<String>,

    #[validate(custom(function = "shared::validation::validate_wall_time"))]
    pub end_time: Option<String>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

/// Request payload replacing a schedule's device assignment wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignDevicesRequest {
    pub device_ids: Vec<Uuid>,
}
