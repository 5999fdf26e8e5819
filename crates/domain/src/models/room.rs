//! Room domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A room within a dormitory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub number: String,
    pub floor: Option<i32>,
    pub capacity: i32,
    pub is_active: bool,
    pub dormitory_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request payload for room creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 20, message = "Room number must be 1-20 characters"))]
    pub number: String,

    pub floor: Option<i32>,

    #[validate(range(min = 1, max = 100, message = "Capacity must be between 1 and 100"))]
    pub capacity: i32,

    pub dormitory_id: Uuid,
}

/// Partial update payload for a room.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 20, message = "Room number must be 1-20 characters"))]
    pub number: Option<String>,

    pub floor: Option<i32>,

    #[validate(range(min = 1, max = 100, message = "Capacity must be between 1 and 100"))]
    pub capacity: Option<i32>,

    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_room_validation() {
        let ok = CreateRoomRequest {
            number: "214B".to_string(),
            floor: Some(2),
            capacity: 4,
            dormitory_id: Uuid::new_v4(),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateRoomRequest {
            number: "".to_string(),
            floor: None,
            capacity: 0,
            dormitory_id: Uuid::new_v4(),
        };
        assert!(bad.validate().is_err());
    }
}
