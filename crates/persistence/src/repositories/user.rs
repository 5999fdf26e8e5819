//! User repository for database operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;

const USER_COLUMNS: &str = "id, name, email, hashed_password, role, phone, \
     is_active, dormitory_id, last_login, created_at";

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. The email column carries a unique index, so a
    /// duplicate registration surfaces as a database error (23505).
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
        role: &str,
        phone: Option<&str>,
        dormitory_id: Option<Uuid>,
    ) -> Result<UserEntity, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (name, email, hashed_password, role, phone, is_active, dormitory_id, created_at)
            VALUES ($1, $2, $3, $4, $5, true, $6, $7)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .bind(role)
        .bind(phone)
        .bind(dormitory_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Find a user by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a user by email (the login lookup).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// List users in a dormitory, newest first.
    pub async fn list_by_dormitory(
        &self,
        dormitory_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE dormitory_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(dormitory_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Change a user's role. Returns the updated row, or `None` if the user
    /// does not exist.
    pub async fn update_role(
        &self,
        id: Uuid,
        role: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET role = $2
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
    }

    /// Attach a user to a dormitory (admin bootstrap after dormitory
    /// creation, or staff onboarding).
    pub async fn assign_dormitory(
        &self,
        id: Uuid,
        dormitory_id: Uuid,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET dormitory_id = $2
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(dormitory_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Record a successful login.
    pub async fn update_last_login(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_login = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Deactivate a user (soft delete). Returns the number of rows affected.
    pub async fn deactivate(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_active = false
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
