//! Attendance check-in/check-out state machine.
//!
//! A two-state toggle per (student, schedule) pair: the first-ever scan is a
//! check-in (PRESENT); a scan following a PRESENT record is a check-out
//! (ABSENT); a scan following anything else starts a new check-in cycle.
//! LATE is only ever written by manual staff correction and behaves like
//! ABSENT here.

use serde::Serialize;

use crate::models::AttendanceStatus;

/// Direction of a scan, derived from the status it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanDirection {
    CheckIn,
    CheckOut,
}

impl ScanDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanDirection::CheckIn => "check_in",
            ScanDirection::CheckOut => "check_out",
        }
    }
}

impl std::fmt::Display for ScanDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes the status of the next scan from the most recent prior record
/// for the same (student, schedule) pair.
pub fn next_status(last: Option<AttendanceStatus>) -> AttendanceStatus {
    match last {
        Some(AttendanceStatus::Present) => AttendanceStatus::Absent,
        _ => AttendanceStatus::Present,
    }
}

/// Maps a newly produced status to its scan direction.
pub fn direction_of(status: AttendanceStatus) -> ScanDirection {
    match status {
        AttendanceStatus::Present => ScanDirection::CheckIn,
        _ => ScanDirection::CheckOut,
    }
}
