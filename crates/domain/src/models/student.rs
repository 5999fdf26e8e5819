//! Student domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A resident student, identified primarily by a unique RFID tag.
///
/// `dormitory_id` is nullable: a student can outlive a dormitory assignment
/// (transfer, departure) while keeping their history, and scans from such a
/// student are rejected rather than guessed at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub surname: Option<String>,
    pub rfid_tag: String,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub room_id: Option<Uuid>,
    pub dormitory_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for enrolling a student.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 100, message = "Surname must be at most 100 characters"))]
    pub surname: Option<String>,

    #[validate(custom(function = "shared::validation::validate_rfid_tag"))]
    pub rfid_tag: String,

    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub room_id: Option<Uuid>,
    pub dormitory_id: Uuid,
}

/// Partial update payload for a student record.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Surname must be at most 100 characters"))]
    pub surname: Option<String>,

    #[validate(custom(function = "shared::validation::validate_rfid_tag"))]
    pub rfid_tag: Option<String>,

    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub room_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateStudentRequest {
        CreateStudentRequest {
            name: "Jana".to_string(),
            surname: Some("Nováková".to_string()),
            rfid_tag: "04:A2:1B:9F".to_string(),
            phone: None,
            emergency_contact: None,
            room_id: None,
            dormitory_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_create_student_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_student_rejects_bad_tag() {
        let mut req = valid_request();
        req.rfid_tag = "tag with spaces".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_student_tag_validated_when_present() {
        let req: UpdateStudentRequest =
            serde_json::from_str(r#"{"rfid_tag": "bad tag"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateStudentRequest = serde_json::from_str(r#"{"name": "Eva"}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
