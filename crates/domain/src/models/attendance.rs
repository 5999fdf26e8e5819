//! Attendance domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Recorded attendance status. The scan pipeline only ever writes
/// `Present`/`Absent`; `Late` is set by manual staff correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    /// Canonical string form, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }

    /// Parses the canonical string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "late" => Some(AttendanceStatus::Late),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attendance record: the interpreted business event of a scan or a
/// manual staff entry. Immutable except for status/notes correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    pub id: Uuid,
    pub student_id: Uuid,
    pub schedule_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub recorded_by_id: Uuid,
    pub notes: Option<String>,
}

/// Request payload for manual staff attendance entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAttendanceRequest {
    pub student_id: Uuid,
    pub schedule_id: Uuid,
    pub status: AttendanceStatus,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Staff correction of an existing record (status and/or notes).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAttendanceRequest {
    pub status: Option<AttendanceStatus>,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Attendance record joined with display names for listings.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub student_id: Uuid,
    pub student_name: String,
    pub schedule_id: Uuid,
    pub schedule_name: String,
    pub recorded_by_id: Uuid,
    pub recorded_by_name: String,
}

/// Request payload for the device scan-ingestion operation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScanRequest {
    #[validate(custom(function = "shared::validation::validate_rfid_tag"))]
    pub rfid_tag: String,
}

/// Success payload of the scan-ingestion operation.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResponse {
    pub status: String,
    pub message: String,
    pub student_name: String,
    pub schedule_name: String,
    pub timestamp: DateTime<Utc>,
    pub direction: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::Late,
        ] {
            assert_eq!(AttendanceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AttendanceStatus::parse("checked-in"), None);
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"present\""
        );
        let status: AttendanceStatus = serde_json::from_str("\"late\"").unwrap();
        assert_eq!(status, AttendanceStatus::Late);
    }

    #[test]
    fn test_scan_request_validation() {
        let ok: ScanRequest = serde_json::from_str(r#"{"rfid_tag": "04:A2:1B:9F"}"#).unwrap();
        assert!(ok.validate().is_ok());

        let bad: ScanRequest = serde_json::from_str(r#"{"rfid_tag": ""}"#).unwrap();
        assert!(bad.validate().is_err());
    }
}
