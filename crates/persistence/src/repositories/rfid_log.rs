//! RFID scan ledger repository.
//!
//! The ledger is append-only; inserts happen inside the scan transaction
//! in [`super::attendance::AttendanceRepository::record_scan`]. This
//! repository only reads.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RfidLogEntity;

/// Repository for scan-ledger reads.
#[derive(Clone)]
pub struct RfidLogRepository {
    pool: PgPool,
}

impl RfidLogRepository {
    /// Creates a new RfidLogRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recent ledger entries for a student, newest first.
    pub async fn list_for_student(
        &self,
        student_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RfidLogEntity>, sqlx::Error> {
        sqlx::query_as::<_, RfidLogEntity>(
            r#"
            SELECT id, student_id, device_id, schedule_id, timestamp
            FROM rfid_logs
            WHERE student_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(student_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Recent ledger entries for a schedule, newest first.
    pub async fn list_for_schedule(
        &self,
        schedule_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RfidLogEntity>, sqlx::Error> {
        sqlx::query_as::<_, RfidLogEntity>(
            r#"
            SELECT id, student_id, device_id, schedule_id, timestamp
            FROM rfid_logs
            WHERE schedule_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(schedule_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
