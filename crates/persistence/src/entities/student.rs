//! Student entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the students table.
#[derive(Debug, Clone, FromRow)]
pub struct StudentEntity {
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

impl From<StudentEntity> for domain::models::Student {
    fn from(entity: StudentEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            surname: entity.surname,
            rfid_tag: entity.rfid_tag,
            phone: entity.phone,
            emergency_contact: entity.emergency_contact,
            room_id: entity.room_id,
            dormitory_id: entity.dormitory_id,
            is_active: entity.is_active,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_entity_to_domain() {
        let entity = StudentEntity {
            id: Uuid::new_v4(),
            name: "Jana".to_string(),
            surname: Some("Nováková".to_string()),
            rfid_tag: "04:A3:22:F1".to_string(),
            phone: None,
            emergency_contact: Some("+421900111222".to_string()),
            room_id: Some(Uuid::new_v4()),
            dormitory_id: Some(Uuid::new_v4()),
            is_active: true,
            created_at: Utc::now(),
        };
        let student: domain::models::Student = entity.clone().into();

        assert_eq!(student.id, entity.id);
        assert_eq!(student.rfid_tag, entity.rfid_tag);
        assert_eq!(student.dormitory_id, entity.dormitory_id);
    }
}
