//! RFID scan ledger models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ground-truth scan ledger entry: one per raw scan accepted past
/// authorization checks. Write-once, append-only; the interpreted business
/// event lives in [`super::Attendance`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfidLog {
    pub id: Uuid,
    pub student_id: Uuid,
    pub device_id: Uuid,
    pub schedule_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Deduplicated record of a tag value with no matching student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnknownRfid {
    pub id: Uuid,
    pub rfid_tag: String,
    /// First time this tag was seen.
    pub created_at: DateTime<Utc>,
    /// Advanced on every repeat read; drives the retention sweep.
    pub last_seen: DateTime<Utc>,
}
