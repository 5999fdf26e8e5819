//! JWT authentication middleware.
//!
//! Validates the Bearer token, loads the account from the database, and
//! stores it in request extensions. Authorization (role and tenancy rules)
//! happens later, in the handlers, through the tenancy guard.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use domain::services::tenancy::Principal;
use persistence::repositories::UserRepository;

/// The authenticated account, loaded fresh from the database on every
/// request so deactivation and role changes take effect immediately.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: domain::models::User,
    /// JWT ID (jti) of the presented access token.
    pub jti: String,
}

impl CurrentUser {
    /// The principal view consumed by the tenancy guard.
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user.id,
            role: self.user.role,
            dormitory_id: self.user.dormitory_id,
            is_active: self.user.is_active,
        }
    }
}

/// Middleware that requires JWT authentication.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return ApiError::Unauthenticated("Missing or invalid Authorization header".into())
                .into_response();
        }
    };

    let claims = match state.jwt.validate_access_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            return ApiError::Unauthenticated("Invalid or expired token".into()).into_response();
        }
    };

    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            return ApiError::Unauthenticated("Invalid token subject".into()).into_response();
        }
    };

    let user = match UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await
    {
        Ok(Some(entity)) => domain::models::User::from(entity),
        Ok(None) => {
            return ApiError::Unauthenticated("Account no longer exists".into()).into_response();
        }
        Err(e) => {
            return ApiError::from(e).into_response();
        }
    };

    if !user.is_active {
        return ApiError::Forbidden("Account is not active".into()).into_response();
    }

    req.extensions_mut().insert(CurrentUser {
        user,
        jti: claims.jti,
    });
    next.run(req).await
}
