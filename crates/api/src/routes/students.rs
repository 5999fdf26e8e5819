//! Student management routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use domain::models::{CreateStudentRequest, Student, UpdateStudentRequest};
use domain::services::tenancy::{authorize, Action};
use persistence::repositories::StudentRepository;

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

/// Enroll a student.
///
/// POST /api/v1/students
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    authorize(
        &current.principal(),
        Action::StaffWrite,
        Some(request.dormitory_id),
    )?;
    request.validate()?;

    let entity = StudentRepository::new(state.pool.clone())
        .create(
            &request.name,
            request.surname.as_deref(),
            &request.rfid_tag,
            request.phone.as_deref(),
            request.emergency_contact.as_deref(),
            request.room_id,
            Some(request.dormitory_id),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Student::from(entity))))
}

/// List students of a dormitory.
///
/// GET /api/v1/students
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let dormitory_id = query
        .dormitory_id
        .or(current.user.dormitory_id)
        .ok_or_else(|| ApiError::Validation("dormitory_id is required".into()))?;
    authorize(&current.principal(), Action::Read, Some(dormitory_id))?;

    let entities = StudentRepository::new(state.pool.clone())
        .list_by_dormitory(
            dormitory_id,
            query.active_only,
            query.limit.clamp(1, 200),
            query.offset.max(0),
        )
        .await?;
    Ok(Json(entities.into_iter().map(Student::from).collect()))
}

/// Fetch one student.
///
/// GET /api/v1/students/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, ApiError> {
    let student = find_student(&state, id).await?;
    authorize(&current.principal(), Action::Read, student.dormitory_id)?;
    Ok(Json(student))
}

/// Update a student record.
///
/// PUT /api/v1/students/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, ApiError> {
    let student = find_student(&state, id).await?;
    authorize(
        &current.principal(),
        Action::StaffWrite,
        student.dormitory_id,
    )?;
    request.validate()?;

    let entity = StudentRepository::new(state.pool.clone())
        .update(
            id,
            request.name.as_deref(),
            request.surname.as_deref(),
            request.rfid_tag.as_deref(),
            request.phone.as_deref(),
            request.emergency_contact.as_deref(),
            request.room_id,
            request.is_active,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
    Ok(Json(Student::from(entity)))
}

/// Deactivate a student (soft delete). History is kept; future scans of the
/// student's tag are rejected.
///
/// DELETE /api/v1/students/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let student = find_student(&state, id).await?;
    authorize(
        &current.principal(),
        Action::StaffWrite,
        student.dormitory_id,
    )?;

    let affected = StudentRepository::new(state.pool.clone())
        .deactivate(id)
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Student not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_student(state: &AppState, id: Uuid) -> Result<Student, ApiError> {
    let entity = StudentRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
    Ok(Student::from(entity))
}
