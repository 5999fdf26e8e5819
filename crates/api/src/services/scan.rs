//! The RFID scan-ingestion pipeline.
//!
//! One call carries a raw tag read from an authenticated IO device through
//! tag resolution, eligibility checks, schedule-window resolution, device
//! authorization, and finally the transactional toggle write. Checks run in
//! a fixed order so a given failure always maps to the same error.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;

use crate::middleware::metrics::{record_scan_accepted, record_scan_rejected, record_unknown_tag};
use domain::models::{AttendanceSchedule, ScanResponse, User};
use domain::services::attendance_state;
use domain::services::schedule_window;
use persistence::repositories::{
    AttendanceRepository, ScheduleRepository, StudentRepository, UnknownRfidRepository,
};

#[derive(Debug, Error)]
pub enum ScanError {
    /// No student carries this tag. The sighting has already been persisted
    /// to the unknown-tag ledger by the time this is returned.
    #[error("no student matches the scanned tag")]
    UnknownTag,

    #[error("student is not active")]
    StudentInactive,

    #[error("student is not assigned to a dormitory")]
    StudentUnassigned,

    #[error("no attendance schedule is currently open")]
    NoActiveSchedule,

    #[error("device is not authorized for this schedule")]
    DeviceNotAuthorized,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ScanError {
    /// The stable error code, used for the rejection metric label.
    pub fn code(&self) -> &'static str {
        match self {
            ScanError::UnknownTag => "unknown_tag",
            ScanError::StudentInactive => "student_inactive",
            ScanError::StudentUnassigned => "student_unassigned",
            ScanError::NoActiveSchedule => "no_active_schedule",
            ScanError::DeviceNotAuthorized => "device_not_authorized",
            ScanError::Database(_) => "internal_error",
        }
    }
}

/// Orchestrates the scan pipeline over the repositories.
#[derive(Clone)]
pub struct ScanService {
    students: StudentRepository,
    schedules: ScheduleRepository,
    attendances: AttendanceRepository,
    unknown_rfids: UnknownRfidRepository,
    unknown_tag_retention_days: u32,
}

impl ScanService {
    pub fn new(pool: PgPool, unknown_tag_retention_days: u32) -> Self {
        Self {
            students: StudentRepository::new(pool.clone()),
            schedules: ScheduleRepository::new(pool.clone()),
            attendances: AttendanceRepository::new(pool.clone()),
            unknown_rfids: UnknownRfidRepository::new(pool),
            unknown_tag_retention_days,
        }
    }

    /// Ingests one raw tag read from `device` at instant `at`.
    ///
    /// Check order is fixed: unknown tag, student inactive, student
    /// unassigned, no open schedule, device not authorized. Only then is the
    /// toggle written.
    pub async fn ingest(
        &self,
        device: &User,
        raw_tag: &str,
        at: DateTime<Utc>,
    ) -> Result<ScanResponse, ScanError> {
        let outcome = self.run_pipeline(device, raw_tag, at).await;

        match &outcome {
            Ok(response) => record_scan_accepted(&response.direction),
            Err(err) => record_scan_rejected(err.code()),
        }
        outcome
    }

    async fn run_pipeline(
        &self,
        device: &User,
        raw_tag: &str,
        at: DateTime<Utc>,
    ) -> Result<ScanResponse, ScanError> {
        let student = match self.students.find_by_rfid_tag(raw_tag).await? {
            Some(entity) => domain::models::Student::from(entity),
            None => {
                self.note_unknown_tag(raw_tag, at).await?;
                return Err(ScanError::UnknownTag);
            }
        };

        if !student.is_active {
            return Err(ScanError::StudentInactive);
        }
        let dormitory_id = student.dormitory_id.ok_or(ScanError::StudentUnassigned)?;

        let schedules: Vec<AttendanceSchedule> = self
            .schedules
            .list_active_for_dormitory(dormitory_id)
            .await?
            .into_iter()
            .map(AttendanceSchedule::from)
            .collect();
        let schedule =
            schedule_window::resolve_open(schedules, at).ok_or(ScanError::NoActiveSchedule)?;

        if !self
            .schedules
            .is_device_assigned(schedule.id, device.id)
            .await?
        {
            return Err(ScanError::DeviceNotAuthorized);
        }

        let (attendance, _log) = self
            .attendances
            .record_scan(student.id, schedule.id, device.id, at)
            .await?;

        // Dashboard bookkeeping only; a failure here must not undo the scan.
        if let Err(e) = self
            .schedules
            .touch_last_attendance_taken(schedule.id, at)
            .await
        {
            tracing::warn!(
                schedule_id = %schedule.id,
                error = %e,
                "failed to advance last_attendance_taken"
            );
        }

        let status = attendance.status();
        let direction = attendance_state::direction_of(status);
        let student_name = match &student.surname {
            Some(surname) => format!("{} {}", student.name, surname),
            None => student.name.clone(),
        };

        tracing::info!(
            student_id = %student.id,
            schedule_id = %schedule.id,
            device_id = %device.id,
            direction = %direction,
            "scan recorded"
        );

        Ok(ScanResponse {
            status: status.as_str().to_string(),
            message: match direction {
                attendance_state::ScanDirection::CheckIn => {
                    format!("{} checked in", student_name)
                }
                attendance_state::ScanDirection::CheckOut => {
                    format!("{} checked out", student_name)
                }
            },
            student_name,
            schedule_name: schedule.name,
            timestamp: attendance.timestamp,
            direction: direction.as_str().to_string(),
        })
    }

    /// Records the unknown-tag sighting and runs the retention sweep. Both
    /// happen before the rejection is returned, so the ledger row survives
    /// the failed scan.
    async fn note_unknown_tag(&self, raw_tag: &str, at: DateTime<Utc>) -> Result<(), sqlx::Error> {
        self.unknown_rfids.record_seen(raw_tag, at).await?;
        record_unknown_tag();
        tracing::warn!(rfid_tag = %raw_tag, "unknown tag scanned");

        let cutoff = at - Duration::days(i64::from(self.unknown_tag_retention_days));
        match self.unknown_rfids.purge_older_than(cutoff).await {
            Ok(removed) if removed > 0 => {
                tracing::debug!(removed, "unknown-tag retention sweep");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "unknown-tag retention sweep failed");
            }
        }
        Ok(())
    }
}
