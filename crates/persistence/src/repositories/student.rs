//! Student repository for database operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::StudentEntity;

const STUDENT_COLUMNS: &str = "id, name, surname, rfid_tag, phone, emergency_contact, \
     room_id, dormitory_id, is_active, created_at";

/// Repository for student-related database operations.
#[derive(Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    /// Creates a new StudentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new student. The rfid_tag column carries a unique index, so
    /// a duplicate tag surfaces as a database error (23505).
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        surname: Option<&str>,
        rfid_tag: &str,
        phone: Option<&str>,
        emergency_contact: Option<&str>,
        room_id: Option<Uuid>,
        dormitory_id: Option<Uuid>,
    ) -> Result<StudentEntity, sqlx::Error> {
        sqlx::query_as::<_, StudentEntity>(&format!(
            r#"
            INSERT INTO students (name, surname, rfid_tag, phone, emergency_contact,
                                  room_id, dormitory_id, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, true, $8)
            RETURNING {STUDENT_COLUMNS}
            "#,
        ))
        .bind(name)
        .bind(surname)
        .bind(rfid_tag)
        .bind(phone)
        .bind(emergency_contact)
        .bind(room_id)
        .bind(dormitory_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Find a student by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StudentEntity>, sqlx::Error> {
        sqlx::query_as::<_, StudentEntity>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a student by RFID tag — the scan-pipeline entry lookup. The
    /// match is exact and case-sensitive; active and inactive students both
    /// resolve here, the pipeline decides what to do with inactive ones.
    pub async fn find_by_rfid_tag(
        &self,
        rfid_tag: &str,
    ) -> Result<Option<StudentEntity>, sqlx::Error> {
        sqlx::query_as::<_, StudentEntity>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE rfid_tag = $1
            "#,
        ))
        .bind(rfid_tag)
        .fetch_optional(&self.pool)
        .await
    }

    /// List students in a dormitory, sorted by surname then name.
    pub async fn list_by_dormitory(
        &self,
        dormitory_id: Uuid,
        active_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StudentEntity>, sqlx::Error> {
        sqlx::query_as::<_, StudentEntity>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE dormitory_id = $1 AND (NOT $2 OR is_active = true)
            ORDER BY surname ASC, name ASC, id ASC
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

    /// Update student attributes. Absent fields are unchanged.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        surname: Option<&str>,
        rfid_tag: Option<&str>,
        phone: Option<&str>,
        emergency_contact: Option<&str>,
        room_id: Option<Uuid>,
        is_active: Option<bool>,
    ) -> Result<Option<StudentEntity>, sqlx::Error> {
        sqlx::query_as::<_, StudentEntity>(&format!(
            r#"
            UPDATE students
            SET name = COALESCE($2, name),
                surname = COALESCE($3, surname),
                rfid_tag = COALESCE($4, rfid_tag),
                phone = COALESCE($5, phone),
                emergency_contact = COALESCE($6, emergency_contact),
                room_id = COALESCE($7, room_id),
                is_active = COALESCE($8, is_active)
            WHERE id = $1
            RETURNING {STUDENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(name)
        .bind(surname)
        .bind(rfid_tag)
        .bind(phone)
        .bind(emergency_contact)
        .bind(room_id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deactivate a student (soft delete). Returns the number of rows
    /// affected.
    pub async fn deactivate(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET is_active = false
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
