//! Dormitory domain model. The dormitory is the tenancy root: rooms,
//! students, staff, and schedules all hang off one dormitory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A dormitory. Never hard-deleted, only deactivated, so that historical
/// attendance stays attributable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dormitory {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for dormitory creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDormitoryRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
}

/// Partial update payload for a dormitory.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDormitoryRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,

    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok = CreateDormitoryRequest {
            name: "North Hall".to_string(),
            address: Some("1 Campus Way".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateDormitoryRequest {
            name: "N".to_string(),
            address: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_update_request_all_optional() {
        let empty: UpdateDormitoryRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.name.is_none());
        assert!(empty.address.is_none());
        assert!(empty.is_active.is_none());
        assert!(empty.validate().is_ok());
    }
}
