//! Account management routes (staff, supervisors, IO devices).

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
use crate::services::auth::AuthService;
use domain::models::{CreateUserRequest, UpdateRoleRequest, User, UserRole};
use domain::services::tenancy::{authorize, Action};
use persistence::repositories::UserRepository;

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

/// Create a staff, supervisor, or IO-device account in the caller's
/// dormitory. Additional admins are not created this way; admins arrive
/// through registration.
///
/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let dormitory_id = current
        .user
        .dormitory_id
        .ok_or_else(|| ApiError::Forbidden("No dormitory assigned to this account".into()))?;
    authorize(&current.principal(), Action::AdminWrite, Some(dormitory_id))?;
    request.validate()?;

    if request.role == UserRole::Admin {
        return Err(ApiError::Validation(
            "Admin accounts are created through registration".into(),
        ));
    }

    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let user = service
        .create_account(
            &request.name,
            &request.email,
            &request.password,
            request.role,
            request.phone.as_deref(),
            dormitory_id,
        )
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "account created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// List accounts in the caller's dormitory.
///
/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let dormitory_id = current
        .user
        .dormitory_id
        .ok_or_else(|| ApiError::Forbidden("No dormitory assigned to this account".into()))?;
    authorize(&current.principal(), Action::Read, Some(dormitory_id))?;

    let entities = UserRepository::new(state.pool.clone())
        .list_by_dormitory(dormitory_id, query.limit.clamp(1, 200), query.offset.max(0))
        .await?;
    Ok(Json(entities.into_iter().map(User::from).collect()))
}

/// Fetch one account.
///
/// GET /api/v1/users/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = find_user(&state, id).await?;
    authorize(&current.principal(), Action::Read, user.dormitory_id)?;
    Ok(Json(user))
}

/// Change an account's role.
///
/// PUT /api/v1/users/:id/role
pub async fn update_role(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<User>, ApiError> {
    let user = find_user(&state, id).await?;
    authorize(&current.principal(), Action::AdminWrite, user.dormitory_id)?;

    if user.id == current.user.id {
        return Err(ApiError::Validation("Cannot change your own role".into()));
    }

    let entity = UserRepository::new(state.pool.clone())
        .update_role(id, request.role.as_str())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(User::from(entity)))
}

/// Deactivate an account (soft delete).
///
/// DELETE /api/v1/users/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user = find_user(&state, id).await?;
    authorize(&current.principal(), Action::AdminWrite, user.dormitory_id)?;

    if user.id == current.user.id {
        return Err(ApiError::Validation("Cannot deactivate yourself".into()));
    }

    let affected = UserRepository::new(state.pool.clone()).deactivate(id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("User not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_user(state: &AppState, id: Uuid) -> Result<User, ApiError> {
    let entity = UserRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(User::from(entity))
}
