//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::UserRole;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub role: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub dormitory_id: Option<Uuid>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserEntity {
    /// Parses the stored role column. The column carries a CHECK constraint,
    /// so anything unparseable is treated as the least-privileged role.
    pub fn role(&self) -> UserRole {
        UserRole::parse(&self.role).unwrap_or(UserRole::Staff)
    }
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        let role = entity.role();
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            role,
            phone: entity.phone,
            is_active: entity.is_active,
            dormitory_id: entity.dormitory_id,
            last_login: entity.last_login,
            created_at: entity.created_at,
        }
    }
}
