//! Authentication service: registration, login, and token refresh.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use domain::models::{TokenResponse, User, UserRole};
use persistence::repositories::UserRepository;
use shared::jwt::JwtKeys;
use shared::password::{hash_password, verify_password, PasswordError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already registered")]
    EmailAlreadyExists,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account is not active")]
    Inactive,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Orchestrates account credentials and token issuance.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtKeys>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtKeys>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Registers a bootstrap admin account. The account starts without a
    /// dormitory; the tenancy guard confines it to dormitory creation until
    /// one is attached.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, TokenResponse), AuthError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let hashed = hash_password(password)?;
        let entity = self
            .users
            .create(name, email, &hashed, UserRole::Admin.as_str(), None, None)
            .await?;

        let user = User::from(entity);
        let tokens = self.issue_tokens(user.id)?;
        Ok((user, tokens))
    }

    /// Creates a staff, supervisor, or IO-device account in a dormitory.
    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
        phone: Option<&str>,
        dormitory_id: Uuid,
    ) -> Result<User, AuthError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let hashed = hash_password(password)?;
        let entity = self
            .users
            .create(
                name,
                email,
                &hashed,
                role.as_str(),
                phone,
                Some(dormitory_id),
            )
            .await?;
        Ok(User::from(entity))
    }

    /// Verifies credentials and issues a token pair.
    ///
    /// A wrong email and a wrong password are indistinguishable in the
    /// returned error.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, TokenResponse), AuthError> {
        let entity = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &entity.hashed_password)? {
            return Err(AuthError::InvalidCredentials);
        }
        if !entity.is_active {
            return Err(AuthError::Inactive);
        }

        self.users.update_last_login(entity.id).await?;

        let user = User::from(entity);
        let tokens = self.issue_tokens(user.id)?;
        Ok((user, tokens))
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let entity = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if !entity.is_active {
            return Err(AuthError::Inactive);
        }

        self.issue_tokens(user_id)
    }

    fn issue_tokens(&self, user_id: Uuid) -> Result<TokenResponse, AuthError> {
        let (access_token, _) = self
            .jwt
            .generate_access_token(user_id)
            .map_err(|_| AuthError::InvalidToken)?;
        let (refresh_token, _) = self
            .jwt
            .generate_refresh_token(user_id)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
        })
    }
}
