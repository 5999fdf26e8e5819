//! Attendance routes: the scan-ingestion endpoint, manual entry and
//! correction, and keyset-paginated listings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::scan::{ScanError, ScanService};
use domain::models::{
    Attendance, AttendanceRecord, AttendanceSchedule, AttendanceStatus, CreateAttendanceRequest,
    ScanRequest, ScanResponse, UpdateAttendanceRequest,
};
use domain::services::schedule_window;
use domain::services::tenancy::{authorize, Action};
use domain::models::RfidLog;
use persistence::repositories::{
    AttendanceFilter, AttendanceRepository, RfidLogRepository, ScheduleRepository,
    StudentRepository,
};
use shared::pagination::{decode_cursor, encode_cursor};

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::UnknownTag => ApiError::UnknownTag,
            ScanError::StudentInactive => ApiError::StudentInactive,
            ScanError::StudentUnassigned => ApiError::StudentUnassigned,
            ScanError::NoActiveSchedule => ApiError::NoActiveSchedule,
            ScanError::DeviceNotAuthorized => ApiError::DeviceNotAuthorized,
            ScanError::Database(e) => ApiError::from(e),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub schedule_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub status: Option<AttendanceStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// One page of attendance records plus the cursor for the next page.
#[derive(Debug, Serialize)]
pub struct AttendancePage {
    pub items: Vec<AttendanceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Ingest one RFID scan from an authenticated IO device.
///
/// POST /api/v1/attendance/rfid-scan
pub async fn rfid_scan(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    authorize(&current.principal(), Action::IngestScan, None)?;
    request.validate()?;

    let service = ScanService::new(
        state.pool.clone(),
        state.config.attendance.unknown_tag_retention_days,
    );
    let response = service
        .ingest(&current.user, &request.rfid_tag, Utc::now())
        .await?;
    Ok(Json(response))
}

/// Manually record attendance for a student (staff entry).
///
/// POST /api/v1/attendance
///
/// Staff writes are held to the same open-window invariant as scans: the
/// schedule must be presently open, or the request is rejected.
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateAttendanceRequest>,
) -> Result<(StatusCode, Json<Attendance>), ApiError> {
    request.validate()?;

    let schedule = ScheduleRepository::new(state.pool.clone())
        .find_by_id(request.schedule_id)
        .await?
        .map(AttendanceSchedule::from)
        .ok_or_else(|| ApiError::NotFound("Schedule not found".into()))?;
    authorize(
        &current.principal(),
        Action::StaffWrite,
        Some(schedule.dormitory_id),
    )?;
    if !schedule_window::is_open(&schedule, Utc::now()) {
        return Err(ApiError::Validation(
            "Schedule is not open at the current time".into(),
        ));
    }

    let student = StudentRepository::new(state.pool.clone())
        .find_by_id(request.student_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
    if student.dormitory_id != Some(schedule.dormitory_id) {
        return Err(ApiError::Validation(
            "Student does not belong to the schedule's dormitory".into(),
        ));
    }

    let entity = AttendanceRepository::new(state.pool.clone())
        .create(
            request.student_id,
            request.schedule_id,
            request.status.as_str(),
            current.user.id,
            request.notes.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Attendance::from(entity))))
}

/// List attendance records of the caller's dormitory, newest first, with
/// keyset pagination.
///
/// GET /api/v1/attendance
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AttendancePage>, ApiError> {
    let dormitory_id = current
        .user
        .dormitory_id
        .ok_or_else(|| ApiError::Forbidden("No dormitory assigned to this account".into()))?;
    authorize(&current.principal(), Action::Read, Some(dormitory_id))?;

    let cursor = match &query.cursor {
        Some(raw) => Some(
            decode_cursor(raw).map_err(|_| ApiError::Validation("Malformed cursor".into()))?,
        ),
        None => None,
    };
    let limit = query
        .limit
        .unwrap_or(state.config.attendance.default_page_size)
        .clamp(1, state.config.attendance.max_page_size);

    let filter = AttendanceFilter {
        dormitory_id,
        schedule_id: query.schedule_id,
        student_id: query.student_id,
        status: query.status.map(|s| s.as_str().to_string()),
        from: query.from,
        to: query.to,
        cursor,
        limit,
    };

    let entities = AttendanceRepository::new(state.pool.clone())
        .list(&filter)
        .await?;
    let next_cursor = if entities.len() as i64 == limit {
        entities
            .last()
            .map(|e| encode_cursor(e.timestamp, e.id))
    } else {
        None
    };
    let items = entities.into_iter().map(AttendanceRecord::from).collect();

    Ok(Json(AttendancePage { items, next_cursor }))
}

/// List attendance records of one student.
///
/// GET /api/v1/attendance/student/:id
pub async fn list_for_student(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(student_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AttendancePage>, ApiError> {
    let student = StudentRepository::new(state.pool.clone())
        .find_by_id(student_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
    let dormitory_id = student
        .dormitory_id
        .ok_or_else(|| ApiError::NotFound("Student has no dormitory".into()))?;
    authorize(&current.principal(), Action::Read, Some(dormitory_id))?;

    let cursor = match &query.cursor {
        Some(raw) => Some(
            decode_cursor(raw).map_err(|_| ApiError::Validation("Malformed cursor".into()))?,
        ),
        None => None,
    };
    let limit = query
        .limit
        .unwrap_or(state.config.attendance.default_page_size)
        .clamp(1, state.config.attendance.max_page_size);

    let filter = AttendanceFilter {
        dormitory_id,
        schedule_id: query.schedule_id,
        student_id: Some(student_id),
        status: query.status.map(|s| s.as_str().to_string()),
        from: query.from,
        to: query.to,
        cursor,
        limit,
    };

    let entities = AttendanceRepository::new(state.pool.clone())
        .list(&filter)
        .await?;
    let next_cursor = if entities.len() as i64 == limit {
        entities
            .last()
            .map(|e| encode_cursor(e.timestamp, e.id))
    } else {
        None
    };
    let items = entities.into_iter().map(AttendanceRecord::from).collect();

    Ok(Json(AttendancePage { items, next_cursor }))
}

#[derive(Debug, Deserialize)]
pub struct RfidLogQuery {
    pub student_id: Option<Uuid>,
    pub schedule_id: Option<Uuid>,
    #[serde(default = "default_log_limit")]
    pub limit: i64,
}

fn default_log_limit() -> i64 {
    100
}

/// Read the raw scan ledger for one student or one schedule, newest first.
/// Exactly one of the two filters must be given; the ledger is too large
/// to read unfiltered.
///
/// GET /api/v1/attendance/rfid-logs
pub async fn rfid_logs(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<RfidLogQuery>,
) -> Result<Json<Vec<RfidLog>>, ApiError> {
    let limit = query.limit.clamp(1, 500);
    let repo = RfidLogRepository::new(state.pool.clone());

    let entities = match (query.student_id, query.schedule_id) {
        (Some(student_id), None) => {
            let student = StudentRepository::new(state.pool.clone())
                .find_by_id(student_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
            authorize(&current.principal(), Action::Read, student.dormitory_id)?;
            repo.list_for_student(student_id, limit).await?
        }
        (None, Some(schedule_id)) => {
            let schedule = ScheduleRepository::new(state.pool.clone())
                .find_by_id(schedule_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Schedule not found".into()))?;
            authorize(
                &current.principal(),
                Action::Read,
                Some(schedule.dormitory_id),
            )?;
            repo.list_for_schedule(schedule_id, limit).await?
        }
        _ => {
            return Err(ApiError::Validation(
                "Exactly one of student_id or schedule_id is required".into(),
            ));
        }
    };

    Ok(Json(entities.into_iter().map(RfidLog::from).collect()))
}

/// Correct an existing attendance record (status and/or notes).
///
/// PUT /api/v1/attendance/:id
///
/// Corrections carry the same open-window gate as manual entry.
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAttendanceRequest>,
) -> Result<Json<Attendance>, ApiError> {
    request.validate()?;

    let repo = AttendanceRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attendance record not found".into()))?;

    let schedule = ScheduleRepository::new(state.pool.clone())
        .find_by_id(existing.schedule_id)
        .await?
        .map(AttendanceSchedule::from)
        .ok_or_else(|| ApiError::NotFound("Schedule not found".into()))?;
    authorize(
        &current.principal(),
        Action::StaffWrite,
        Some(schedule.dormitory_id),
    )?;
    if !schedule_window::is_open(&schedule, Utc::now()) {
        return Err(ApiError::Validation(
            "Schedule is not open at the current time".into(),
        ));
    }

    let entity = repo
        .update(
            id,
            request.status.map(|s| s.as_str()),
            request.notes.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Attendance record not found".into()))?;
    Ok(Json(Attendance::from(entity)))
}
