//! Dormitory management routes.

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
use domain::models::{CreateDormitoryRequest, Dormitory, UpdateDormitoryRequest};
use domain::services::tenancy::{authorize, Action};
use persistence::repositories::{DormitoryRepository, UserRepository};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Create a dormitory.
///
/// POST /api/v1/dormitories
///
/// The bootstrap operation: an admin without a dormitory creates one and is
/// attached to it in the same call.
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateDormitoryRequest>,
) -> Result<(StatusCode, Json<Dormitory>), ApiError> {
    authorize(&current.principal(), Action::CreateDormitory, None)?;
    request.validate()?;

    let repo = DormitoryRepository::new(state.pool.clone());
    let entity = repo
        .create(&request.name, request.address.as_deref())
        .await?;
    let dormitory = Dormitory::from(entity);

    UserRepository::new(state.pool.clone())
        .assign_dormitory(current.user.id, dormitory.id)
        .await?;

    tracing::info!(
        dormitory_id = %dormitory.id,
        admin_id = %current.user.id,
        "dormitory created"
    );

    Ok((StatusCode::CREATED, Json(dormitory)))
}

/// List dormitories.
///
/// GET /api/v1/dormitories
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Dormitory>>, ApiError> {
    authorize(&current.principal(), Action::Read, None)?;

    let entities = DormitoryRepository::new(state.pool.clone())
        .list(query.limit.clamp(1, 200), query.offset.max(0))
        .await?;
    Ok(Json(entities.into_iter().map(Dormitory::from).collect()))
}

/// Fetch one dormitory.
///
/// GET /api/v1/dormitories/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Dormitory>, ApiError> {
    authorize(&current.principal(), Action::Read, Some(id))?;

    let entity = DormitoryRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dormitory not found".into()))?;
    Ok(Json(Dormitory::from(entity)))
}

/// Update a dormitory.
///
/// PUT /api/v1/dormitories/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDormitoryRequest>,
) -> Result<Json<Dormitory>, ApiError> {
    authorize(&current.principal(), Action::AdminWrite, Some(id))?;
    request.validate()?;

    let repo = DormitoryRepository::new(state.pool.clone());
    if let Some(false) = request.is_active {
        repo.deactivate(id).await?;
    }
    let entity = repo
        .update(id, request.name.as_deref(), request.address.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Dormitory not found".into()))?;
    Ok(Json(Dormitory::from(entity)))
}

/// Deactivate a dormitory (soft delete).
///
/// DELETE /api/v1/dormitories/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    authorize(&current.principal(), Action::AdminWrite, Some(id))?;

    let affected = DormitoryRepository::new(state.pool.clone())
        .deactivate(id)
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Dormitory not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
