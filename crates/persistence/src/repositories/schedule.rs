//! Attendance schedule repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ScheduleEntity;
use domain::models::{CreateScheduleRequest, UpdateScheduleRequest};

const SCHEDULE_COLUMNS: &str = "id, name, description, dormitory_id, created_by_id, \
     monday, tuesday, wednesday, thursday, friday, saturday, sunday, \
     start_time, end_time, start_date, end_date, \
     is_active, created_at, updated_at, last_attendance_taken";

/// Repository for attendance-schedule database operations, including the
/// schedule-device assignment table.
#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    /// Creates a new ScheduleRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new schedule.
    pub async fn create(
        &self,
        req: &CreateScheduleRequest,
        created_by_id: Uuid,
    ) -> Result<ScheduleEntity, sqlx::Error> {
        sqlx::query_as::<_, ScheduleEntity>(&format!(
            r#"
            INSERT INTO attendance_schedules
                (name, description, dormitory_id, created_by_id,
                 monday, tuesday, wednesday, thursday, friday, saturday, sunday,
                 start_time, end_time, start_date, end_date, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, true, $16)
            RETURNING {SCHEDULE_COLUMNS}
            "#,
        ))
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.dormitory_id)
        .bind(created_by_id)
        .bind(req.monday)
        .bind(req.tuesday)
        .bind(req.wednesday)
        .bind(req.thursday)
        .bind(req.friday)
        .bind(req.saturday)
        .bind(req.sunday)
        .bind(&req.start_time)
        .bind(&req.end_time)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Find a schedule by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ScheduleEntity>, sqlx::Error> {
        sqlx::query_as::<_, ScheduleEntity>(&format!(
            r#"
            SELECT {SCHEDULE_COLUMNS}
            FROM attendance_schedules
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List schedules in a dormitory, newest first.
    pub async fn list_by_dormitory(
        &self,
        dormitory_id: Uuid,
        active_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ScheduleEntity>, sqlx::Error> {
        sqlx::query_as::<_, ScheduleEntity>(&format!(
            r#"
            SELECT {SCHEDULE_COLUMNS}
            FROM attendance_schedules
            WHERE dormitory_id = $1 AND (NOT $2 OR is_active = true)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        ))
        .bind(dormitory_id)
        .bind(active_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// All active schedules of a dormitory. The caller evaluates which of
    /// them are open at a given instant; the window logic stays out of SQL
    /// so it is testable without a database.
    pub async fn list_active_for_dormitory(
        &self,
        dormitory_id: Uuid,
    ) -> Result<Vec<ScheduleEntity>, sqlx::Error> {
        sqlx::query_as::<_, ScheduleEntity>(&format!(
            r#"
            SELECT {SCHEDULE_COLUMNS}
            FROM attendance_schedules
            WHERE dormitory_id = $1 AND is_active = true
            "#,
        ))
        .bind(dormitory_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Partial update. Absent fields are unchanged; `end_date` cannot be
    /// cleared through this path.
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateScheduleRequest,
    ) -> Result<Option<ScheduleEntity>, sqlx::Error> {
        sqlx::query_as::<_, ScheduleEntity>(&format!(
            r#"
            UPDATE attendance_schedules
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                monday = COALESCE($4, monday),
                tuesday = COALESCE($5, tuesday),
                wednesday = COALESCE($6, wednesday),
                thursday = COALESCE($7, thursday),
                friday = COALESCE($8, friday),
                saturday = COALESCE($9, saturday),
                sunday = COALESCE($10, sunday),
                start_time = COALESCE($11, start_time),
                end_time = COALESCE($12, end_time),
                start_date = COALESCE($13, start_date),
                end_date = COALESCE($14, end_date),
                is_active = COALESCE($15, is_active),
                updated_at = $16
            WHERE id = $1
            RETURNING {SCHEDULE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.monday)
        .bind(req.tuesday)
        .bind(req.wednesday)
        .bind(req.thursday)
        .bind(req.friday)
        .bind(req.saturday)
        .bind(req.sunday)
        .bind(&req.start_time)
        .bind(&req.end_time)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    /// Deactivate a schedule (soft delete). Returns the number of rows
    /// affected.
    pub async fn deactivate(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE attendance_schedules
            SET is_active = false, updated_at = $2
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Advance the schedule's last-attendance marker. Best-effort bookkeeping
    /// for the operator dashboard; the caller ignores failures.
    pub async fn touch_last_attendance_taken(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE attendance_schedules
            SET last_attendance_taken = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Replace a schedule's device assignment wholesale (delete then insert,
    /// in one transaction).
    pub async fn replace_device_assignments(
        &self,
        schedule_id: Uuid,
        device_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM attendance_schedule_devices
            WHERE schedule_id = $1
            "#,
        )
        .bind(schedule_id)
        .execute(&mut *tx)
        .await?;

        if !device_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO attendance_schedule_devices (schedule_id, device_id)
                SELECT $1, device_id FROM UNNEST($2::uuid[]) AS t(device_id)
                "#,
            )
            .bind(schedule_id)
            .bind(device_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }

    /// The device ids currently assigned to a schedule.
    pub async fn assigned_device_ids(&self, schedule_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT device_id
            FROM attendance_schedule_devices
            WHERE schedule_id = $1
            ORDER BY device_id
            "#,
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Whether a device is assigned to the schedule — the scan-pipeline
    /// authorization check.
    pub async fn is_device_assigned(
        &self,
        schedule_id: Uuid,
        device_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM attendance_schedule_devices
                WHERE schedule_id = $1 AND device_id = $2
            )
            "#,
        )
        .bind(schedule_id)
        .bind(device_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }
}
