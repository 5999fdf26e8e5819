//! Room management routes.

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
use domain::models::{CreateRoomRequest, Room, UpdateRoomRequest};
use domain::services::tenancy::{authorize, Action};
use persistence::repositories::RoomRepository;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Defaults to the caller's own dormitory.
    pub dormitory_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Create a room.
///
/// POST /api/v1/rooms
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    authorize(
        &current.principal(),
        Action::StaffWrite,
        Some(request.dormitory_id),
    )?;
    request.validate()?;

    let entity = RoomRepository::new(state.pool.clone())
        .create(
            &request.number,
            request.floor,
            request.capacity,
            request.dormitory_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Room::from(entity))))
}

/// List rooms of a dormitory.
///
/// GET /api/v1/rooms
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let dormitory_id = query
        .dormitory_id
        .or(current.user.dormitory_id)
        .ok_or_else(|| ApiError::Validation("dormitory_id is required".into()))?;
    authorize(&current.principal(), Action::Read, Some(dormitory_id))?;

    let entities = RoomRepository::new(state.pool.clone())
        .list_by_dormitory(dormitory_id, query.limit.clamp(1, 200), query.offset.max(0))
        .await?;
    Ok(Json(entities.into_iter().map(Room::from).collect()))
}

/// Fetch one room.
///
/// GET /api/v1/rooms/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Room>, ApiError> {
    let room = find_room(&state, id).await?;
    authorize(&current.principal(), Action::Read, Some(room.dormitory_id))?;
    Ok(Json(room))
}

/// Update a room.
///
/// PUT /api/v1/rooms/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoomRequest>,
) -> Result<Json<Room>, ApiError> {
    let room = find_room(&state, id).await?;
    authorize(
        &current.principal(),
        Action::StaffWrite,
        Some(room.dormitory_id),
    )?;
    request.validate()?;

    let repo = RoomRepository::new(state.pool.clone());
    if let Some(false) = request.is_active {
        repo.deactivate(id).await?;
    }
    let entity = repo
        .update(id, request.number.as_deref(), request.floor, request.capacity)
        .await?
        .ok_or_else(|| ApiError::NotFound("Room not found".into()))?;
    Ok(Json(Room::from(entity)))
}

/// Deactivate a room (soft delete).
///
/// DELETE /api/v1/rooms/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let room = find_room(&state, id).await?;
    authorize(
        &current.principal(),
        Action::StaffWrite,
        Some(room.dormitory_id),
    )?;

    let affected = RoomRepository::new(state.pool.clone()).deactivate(id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Room not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_room(state: &AppState, id: Uuid) -> Result<Room, ApiError> {
    let entity = RoomRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Room not found".into()))?;
    Ok(Room::from(entity))
}
