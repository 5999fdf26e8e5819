//! Attendance schedule routes, including device assignment.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use domain::models::{
    AssignDevicesRequest, AttendanceSchedule, CreateScheduleRequest, UpdateScheduleRequest,
    UserRole,
};
use domain::services::schedule_window;
use domain::services::tenancy::{authorize, Action};
use persistence::repositories::{ScheduleRepository, UserRepository};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Defaults to the caller's own dormitory.
    pub dormitory_id: Option<Uuid>,
    #[serde(default)]
    pub active_only: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Devices currently assigned to a schedule.
#[derive(Debug, Serialize)]
pub struct AssignedDevicesResponse {
    pub schedule_id: Uuid,
    pub device_ids: Vec<Uuid>,
}

/// Create a schedule.
///
/// POST /api/v1/schedules
///
/// Overlapping windows in the same dormitory are allowed but logged: the
/// runtime tie-break keeps them deterministic, yet they are almost always a
/// configuration mistake worth surfacing.
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<AttendanceSchedule>), ApiError> {
    authorize(
        &current.principal(),
        Action::AdminWrite,
        Some(request.dormitory_id),
    )?;
    request.validate()?;

    let repo = ScheduleRepository::new(state.pool.clone());
    let entity = repo.create(&request, current.user.id).await?;
    let schedule = AttendanceSchedule::from(entity);

    let existing = repo
        .list_active_for_dormitory(request.dormitory_id)
        .await?
        .into_iter()
        .map(AttendanceSchedule::from);
    for other in existing {
        if other.id != schedule.id && schedule_window::windows_overlap(&schedule, &other) {
            tracing::warn!(
                schedule_id = %schedule.id,
                overlaps_with = %other.id,
                "schedule window overlaps an existing schedule"
            );
        }
    }

    Ok((StatusCode::CREATED, Json(schedule)))
}

/// List schedules of a dormitory.
///
/// GET /api/v1/schedules
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AttendanceSchedule>>, ApiError> {
    let dormitory_id = query
        .dormitory_id
        .or(current.user.dormitory_id)
        .ok_or_else(|| ApiError::Validation("dormitory_id is required".into()))?;
    authorize(&current.principal(), Action::Read, Some(dormitory_id))?;

    let entities = ScheduleRepository::new(state.pool.clone())
        .list_by_dormitory(
            dormitory_id,
            query.active_only,
            query.limit.clamp(1, 200),
            query.offset.max(0),
        )
        .await?;
    Ok(Json(
        entities.into_iter().map(AttendanceSchedule::from).collect(),
    ))
}

/// Fetch one schedule.
///
/// GET /api/v1/schedules/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<AttendanceSchedule>, ApiError> {
    let schedule = find_schedule(&state, id).await?;
    authorize(
        &current.principal(),
        Action::Read,
        Some(schedule.dormitory_id),
    )?;
    Ok(Json(schedule))
}

/// Update a schedule.
///
/// PUT /api/v1/schedules/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<Json<AttendanceSchedule>, ApiError> {
    let schedule = find_schedule(&state, id).await?;
    authorize(
        &current.principal(),
        Action::AdminWrite,
        Some(schedule.dormitory_id),
    )?;
    request.validate()?;

    // Cross-field window checks against the merged result, since either
    // endpoint may arrive alone.
    let start = request.start_time.as_deref().unwrap_or(&schedule.start_time);
    let end = request.end_time.as_deref().unwrap_or(&schedule.end_time);
    shared::validation::validate_time_window(start, end)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let entity = ScheduleRepository::new(state.pool.clone())
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".into()))?;
    Ok(Json(AttendanceSchedule::from(entity)))
}

/// Deactivate a schedule (soft delete).
///
/// DELETE /api/v1/schedules/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let schedule = find_schedule(&state, id).await?;
    authorize(
        &current.principal(),
        Action::AdminWrite,
        Some(schedule.dormitory_id),
    )?;

    let affected = ScheduleRepository::new(state.pool.clone())
        .deactivate(id)
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Schedule not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the set of devices authorized for a schedule.
///
/// POST /api/v1/schedules/:id/devices
///
/// The assignment is wholesale: the request body is the complete new set.
/// Every id must be an active IO-device account in the schedule's dormitory.
pub async fn assign_devices(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignDevicesRequest>,
) -> Result<Json<AssignedDevicesResponse>, ApiError> {
    let schedule = find_schedule(&state, id).await?;
    authorize(
        &current.principal(),
        Action::AdminWrite,
        Some(schedule.dormitory_id),
    )?;

    let users = UserRepository::new(state.pool.clone());
    for device_id in &request.device_ids {
        let device = users
            .find_by_id(*device_id)
            .await?
            .ok_or_else(|| ApiError::Validation(format!("Unknown device: {}", device_id)))?;
        if device.role() != UserRole::IoDevice || !device.is_active {
            return Err(ApiError::Validation(format!(
                "Not an active IO device: {}",
                device_id
            )));
        }
        if device.dormitory_id != Some(schedule.dormitory_id) {
            return Err(ApiError::Validation(format!(
                "Device belongs to a different dormitory: {}",
                device_id
            )));
        }
    }

    let repo = ScheduleRepository::new(state.pool.clone());
    repo.replace_device_assignments(id, &request.device_ids)
        .await?;
    let device_ids = repo.assigned_device_ids(id).await?;

    tracing::info!(
        schedule_id = %id,
        device_count = device_ids.len(),
        "schedule device assignment replaced"
    );

    Ok(Json(AssignedDevicesResponse {
        schedule_id: id,
        device_ids,
    }))
}

/// List the devices assigned to a schedule.
///
/// GET /api/v1/schedules/:id/devices
pub async fn list_devices(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignedDevicesResponse>, ApiError> {
    let schedule = find_schedule(&state, id).await?;
    authorize(
        &current.principal(),
        Action::Read,
        Some(schedule.dormitory_id),
    )?;

    let device_ids = ScheduleRepository::new(state.pool.clone())
        .assigned_device_ids(id)
        .await?;
    Ok(Json(AssignedDevicesResponse {
        schedule_id: id,
        device_ids,
    }))
}

async fn find_schedule(state: &AppState, id: Uuid) -> Result<AttendanceSchedule, ApiError> {
    let entity = ScheduleRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".into()))?;
    Ok(AttendanceSchedule::from(entity))
}
