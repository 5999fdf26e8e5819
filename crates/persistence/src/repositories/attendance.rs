//! Attendance repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AttendanceEntity, AttendanceWithNamesEntity, RfidLogEntity};
use domain::services::attendance_state;

const ATTENDANCE_COLUMNS: &str =
    "id, student_id, schedule_id, timestamp, status, recorded_by_id, notes";

const ATTENDANCE_WITH_NAMES: &str = r#"
    SELECT a.id, a.timestamp, a.status, a.notes,
           a.student_id, TRIM(s.name || ' ' || COALESCE(s.surname, '')) AS student_name,
           a.schedule_id, sch.name AS schedule_name,
           a.recorded_by_id, u.name AS recorded_by_name
    FROM attendances a
    JOIN students s ON s.id = a.student_id
    JOIN attendance_schedules sch ON sch.id = a.schedule_id
    JOIN users u ON u.id = a.recorded_by_id
"#;

/// Filters for attendance listings. All rows are scoped to one dormitory
/// through the schedule join; the rest is optional narrowing.
#[derive(Debug, Clone)]
pub struct AttendanceFilter {
    pub dormitory_id: Uuid,
    pub schedule_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub status: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Keyset cursor: rows strictly older than (timestamp, id).
    pub cursor: Option<(DateTime<Utc>, Uuid)>,
    pub limit: i64,
}

/// Repository for attendance-record database operations, including the
/// transactional scan write path.
#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    /// Creates a new AttendanceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records one authorized scan: reads the latest status for the
    /// (student, schedule) pair, toggles it, and writes the attendance row
    /// and the scan-ledger row in one transaction.
    ///
    /// A transaction-scoped advisory lock on the pair serializes concurrent
    /// scans of the same card, so two near-simultaneous reads cannot both
    /// observe the same prior status and write the same toggle.
    pub async fn record_scan(
        &self,
        student_id: Uuid,
        schedule_id: Uuid,
        device_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(AttendanceEntity, RfidLogEntity), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            SELECT pg_advisory_xact_lock(hashtextextended($1 || ':' || $2, 0))
            "#,
        )
        .bind(student_id.to_string())
        .bind(schedule_id.to_string())
        .execute(&mut *tx)
        .await?;

        let last: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT status
            FROM attendances
            WHERE student_id = $1 AND schedule_id = $2
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(student_id)
        .bind(schedule_id)
        .fetch_optional(&mut *tx)
        .await?;

        let last_status = last
            .as_ref()
            .and_then(|(s,)| domain::models::AttendanceStatus::parse(s));
        let next = attendance_state::next_status(last_status);

        let attendance = sqlx::query_as::<_, AttendanceEntity>(&format!(
            r#"
            INSERT INTO attendances (student_id, schedule_id, timestamp, status, recorded_by_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ATTENDANCE_COLUMNS}
            "#,
        ))
        .bind(student_id)
        .bind(schedule_id)
        .bind(at)
        .bind(next.as_str())
        .bind(device_id)
        .fetch_one(&mut *tx)
        .await?;

        let log = sqlx::query_as::<_, RfidLogEntity>(
            r#"
            INSERT INTO rfid_logs (student_id, device_id, schedule_id, timestamp)
            VALUES ($1, $2, $3, $4)
            RETURNING id, student_id, device_id, schedule_id, timestamp
            "#,
        )
        .bind(student_id)
        .bind(device_id)
        .bind(schedule_id)
        .bind(at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((attendance, log))
    }

    /// Insert a manual staff attendance entry.
    pub async fn create(
        &self,
        student_id: Uuid,
        schedule_id: Uuid,
        status: &str,
        recorded_by_id: Uuid,
        notes: Option<&str>,
    ) -> Result<AttendanceEntity, sqlx::Error> {
        sqlx::query_as::<_, AttendanceEntity>(&format!(
            r#"
            INSERT INTO attendances (student_id, schedule_id, timestamp, status, recorded_by_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ATTENDANCE_COLUMNS}
            "#,
        ))
        .bind(student_id)
        .bind(schedule_id)
        .bind(Utc::now())
        .bind(status)
        .bind(recorded_by_id)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
    }

    /// Find an attendance record by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AttendanceEntity>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceEntity>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendances
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Correct status and/or notes of an existing record.
    pub async fn update(
        &self,
        id: Uuid,
        status: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Option<AttendanceEntity>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceEntity>(&format!(
            r#"
            UPDATE attendances
            SET status = COALESCE($2, status),
                notes = COALESCE($3, notes)
            WHERE id = $1
            RETURNING {ATTENDANCE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(status)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
    }

    /// The most recent status for a (student, schedule) pair, if any.
    pub async fn latest_status(
        &self,
        student_id: Uuid,
        schedule_id: Uuid,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT status
            FROM attendances
            WHERE student_id = $1 AND schedule_id = $2
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(student_id)
        .bind(schedule_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(s,)| s))
    }

    /// Keyset-paginated listing joined with display names, newest first.
    pub async fn list(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceWithNamesEntity>, sqlx::Error> {
        let (cursor_ts, cursor_id) = match filter.cursor {
            Some((ts, id)) => (Some(ts), Some(id)),
            None => (None, None),
        };

        sqlx::query_as::<_, AttendanceWithNamesEntity>(&format!(
            r#"
            {ATTENDANCE_WITH_NAMES}
            WHERE sch.dormitory_id = $1
              AND ($2::uuid IS NULL OR a.schedule_id = $2)
              AND ($3::uuid IS NULL OR a.student_id = $3)
              AND ($4::text IS NULL OR a.status = $4)
              AND ($5::timestamptz IS NULL OR a.timestamp >= $5)
              AND ($6::timestamptz IS NULL OR a.timestamp < $6)
              AND ($7::timestamptz IS NULL OR (a.timestamp, a.id) < ($7, $8))
            ORDER BY a.timestamp DESC, a.id DESC
            LIMIT $9
            "#,
        ))
        .bind(filter.dormitory_id)
        .bind(filter.schedule_id)
        .bind(filter.student_id)
        .bind(&filter.status)
        .bind(filter.from)
        .bind(filter.to)
        .bind(cursor_ts)
        .bind(cursor_id)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
    }
}
