//! Authentication routes: registration, login, token refresh, and the
//! current-account endpoint.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use domain::models::{LoginRequest, RefreshRequest, RegisterRequest, TokenResponse, User};

/// Response for register and login: the account plus its token pair.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokenResponse,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => {
                ApiError::Conflict("Email already registered".into())
            }
            AuthError::InvalidCredentials => {
                ApiError::Unauthenticated("Invalid email or password".into())
            }
            AuthError::Inactive => ApiError::Forbidden("Account is not active".into()),
            AuthError::InvalidToken => {
                ApiError::Unauthenticated("Invalid or expired token".into())
            }
            AuthError::Password(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::Database(e) => ApiError::from(e),
        }
    }
}

/// Register a bootstrap admin account.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let (user, tokens) = service
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, tokens })))
}

/// Log in with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let (user, tokens) = service.login(&request.email, &request.password).await?;

    Ok(Json(AuthResponse { user, tokens }))
}

/// Exchange a refresh token for a fresh token pair.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let tokens = service.refresh(&request.refresh_token).await?;

    Ok(Json(tokens))
}

/// The authenticated account behind the presented token.
///
/// GET /api/v1/auth/me
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.user)
}
