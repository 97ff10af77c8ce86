//! Repository for `classes` and its wizard-owned sub-resources.
//!
//! A commit writes the class row and replaces every sub-resource inside one
//! transaction. Sub-resources use delete-then-insert so no column from an
//! earlier version of the class survives an edit.

use sqlx::{PgPool, Postgres, Transaction};
use tutorly_core::class_mapping::{CommitPlan, LessonRecord, StoredClass};
use tutorly_core::error::CoreError;
use tutorly_core::types::DbId;

use crate::models::class::{
    ClassLocationRow, ClassRow, ClassScheduleRow, ClassSyllabusRow, ClassTimeSlotRow,
};

/// Column list for `classes` queries.
const COLUMNS: &str = "id, title, description, subject, thumbnail_url, delivery_mode, \
     class_format, class_size, duration_type, status, price, currency, max_students, \
     auto_renewal, tutor_id, created_at, updated_at";

const SCHEDULE_COLUMNS: &str =
    "id, class_id, start_date, end_date, enrollment_deadline, frequency, total_sessions";

const TIME_SLOT_COLUMNS: &str = "id, class_id, day_of_week, start_time, end_time";

const LOCATION_COLUMNS: &str =
    "id, class_id, street, city, state, zip_code, country, meeting_link";

const SYLLABUS_COLUMNS: &str = "id, class_id, week_number, title, description, \
     learning_objectives, session_date, start_time, end_time, status, notes";

/// Errors from loading or committing a class.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides load and commit operations for classes.
pub struct ClassRepo;

impl ClassRepo {
    /// Find a class row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ClassRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classes WHERE id = $1");
        sqlx::query_as::<_, ClassRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Schedule row of a class, if any.
    pub async fn find_schedule(
        pool: &PgPool,
        class_id: DbId,
    ) -> Result<Option<ClassScheduleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM class_schedules \
             WHERE class_id = $1 ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, ClassScheduleRow>(&query)
            .bind(class_id)
            .fetch_optional(pool)
            .await
    }

    /// All time slots of a class, in insertion order.
    pub async fn list_time_slots(
        pool: &PgPool,
        class_id: DbId,
    ) -> Result<Vec<ClassTimeSlotRow>, sqlx::Error> {
        let query = format!(
            "SELECT {TIME_SLOT_COLUMNS} FROM class_time_slots \
             WHERE class_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ClassTimeSlotRow>(&query)
            .bind(class_id)
            .fetch_all(pool)
            .await
    }

    /// Location row of a class, if any.
    pub async fn find_location(
        pool: &PgPool,
        class_id: DbId,
    ) -> Result<Option<ClassLocationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LOCATION_COLUMNS} FROM class_locations \
             WHERE class_id = $1 ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, ClassLocationRow>(&query)
            .bind(class_id)
            .fetch_optional(pool)
            .await
    }

    /// Curriculum of a class ordered by week number.
    pub async fn list_syllabus(
        pool: &PgPool,
        class_id: DbId,
    ) -> Result<Vec<ClassSyllabusRow>, sqlx::Error> {
        let query = format!(
            "SELECT {SYLLABUS_COLUMNS} FROM class_syllabus \
             WHERE class_id = $1 ORDER BY week_number"
        );
        sqlx::query_as::<_, ClassSyllabusRow>(&query)
            .bind(class_id)
            .fetch_all(pool)
            .await
    }

    /// Count schedule rows of a class (1 after any commit).
    pub async fn count_schedules(pool: &PgPool, class_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM class_schedules WHERE class_id = $1")
                .bind(class_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Load a class and all its sub-resources.
    ///
    /// Returns `None` if the class does not exist. Missing sub-resources are
    /// returned as `None` / empty lists.
    pub async fn load(pool: &PgPool, id: DbId) -> Result<Option<StoredClass>, CommitError> {
        let Some(class) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let schedule = Self::find_schedule(pool, id).await?;
        let time_slots = Self::list_time_slots(pool, id).await?;
        let location = Self::find_location(pool, id).await?;
        let syllabus = Self::list_syllabus(pool, id).await?;

        let lessons = syllabus
            .into_iter()
            .map(ClassSyllabusRow::into_record)
            .collect::<Result<Vec<LessonRecord>, CoreError>>()?;

        Ok(Some(StoredClass {
            id,
            class: class.to_record()?,
            schedule: schedule.map(|s| s.to_record()).transpose()?,
            time_slots: time_slots.into_iter().map(Into::into).collect(),
            location: location.map(Into::into),
            lessons,
        }))
    }

    /// Write a commit plan and return the class ID.
    ///
    /// Inserts a new class (owned by `tutor_id`) when `plan.class_id` is
    /// `None`, otherwise updates that class. Everything runs in a single
    /// transaction; on any error nothing is written.
    pub async fn commit(
        pool: &PgPool,
        tutor_id: DbId,
        plan: &CommitPlan,
    ) -> Result<DbId, CommitError> {
        let mut tx = pool.begin().await?;

        let class_id = match plan.class_id {
            Some(id) => Self::update_class_inner(&mut tx, id, plan).await?.ok_or(
                CoreError::NotFound {
                    entity: "Class",
                    id,
                },
            )?,
            None => Self::insert_class_inner(&mut tx, tutor_id, plan).await?,
        };

        Self::replace_schedule_inner(&mut tx, class_id, plan).await?;
        Self::replace_time_slots_inner(&mut tx, class_id, plan).await?;
        Self::replace_location_inner(&mut tx, class_id, plan).await?;
        Self::replace_syllabus_inner(&mut tx, class_id, plan).await?;

        tx.commit().await?;

        tracing::debug!(
            class_id,
            time_slots = plan.time_slots.len(),
            lessons = plan.lessons.len(),
            "Class committed"
        );
        Ok(class_id)
    }

    async fn insert_class_inner(
        tx: &mut Transaction<'_, Postgres>,
        tutor_id: DbId,
        plan: &CommitPlan,
    ) -> Result<DbId, sqlx::Error> {
        let c = &plan.class;
        let row: (DbId,) = sqlx::query_as(
            "INSERT INTO classes \
                (title, description, subject, thumbnail_url, delivery_mode, class_format, \
                 class_size, duration_type, price, currency, max_students, auto_renewal, tutor_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING id",
        )
        .bind(&c.title)
        .bind(&c.description)
        .bind(&c.subject)
        .bind(&c.thumbnail_url)
        .bind(c.delivery_mode.as_str())
        .bind(c.class_format.as_str())
        .bind(c.class_size.as_str())
        .bind(c.duration_type.as_str())
        .bind(c.price)
        .bind(&c.currency)
        .bind(c.max_students)
        .bind(c.auto_renewal)
        .bind(tutor_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.0)
    }

    async fn update_class_inner(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        plan: &CommitPlan,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let c = &plan.class;
        let row: Option<(DbId,)> = sqlx::query_as(
            "UPDATE classes SET \
                title = $2, description = $3, subject = $4, thumbnail_url = $5, \
                delivery_mode = $6, class_format = $7, class_size = $8, duration_type = $9, \
                price = $10, currency = $11, max_students = $12, auto_renewal = $13 \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(id)
        .bind(&c.title)
        .bind(&c.description)
        .bind(&c.subject)
        .bind(&c.thumbnail_url)
        .bind(c.delivery_mode.as_str())
        .bind(c.class_format.as_str())
        .bind(c.class_size.as_str())
        .bind(c.duration_type.as_str())
        .bind(c.price)
        .bind(&c.currency)
        .bind(c.max_students)
        .bind(c.auto_renewal)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.map(|r| r.0))
    }

    async fn replace_schedule_inner(
        tx: &mut Transaction<'_, Postgres>,
        class_id: DbId,
        plan: &CommitPlan,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM class_schedules WHERE class_id = $1")
            .bind(class_id)
            .execute(&mut **tx)
            .await?;

        let s = &plan.schedule;
        sqlx::query(
            "INSERT INTO class_schedules \
                (class_id, start_date, end_date, enrollment_deadline, frequency, total_sessions) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(class_id)
        .bind(s.start_date)
        .bind(s.end_date)
        .bind(s.enrollment_deadline)
        .bind(s.frequency.map(|f| f.as_str()))
        .bind(s.total_sessions)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn replace_time_slots_inner(
        tx: &mut Transaction<'_, Postgres>,
        class_id: DbId,
        plan: &CommitPlan,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM class_time_slots WHERE class_id = $1")
            .bind(class_id)
            .execute(&mut **tx)
            .await?;

        for slot in &plan.time_slots {
            sqlx::query(
                "INSERT INTO class_time_slots (class_id, day_of_week, start_time, end_time) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(class_id)
            .bind(&slot.day_of_week)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn replace_location_inner(
        tx: &mut Transaction<'_, Postgres>,
        class_id: DbId,
        plan: &CommitPlan,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM class_locations WHERE class_id = $1")
            .bind(class_id)
            .execute(&mut **tx)
            .await?;

        let l = &plan.location;
        sqlx::query(
            "INSERT INTO class_locations \
                (class_id, street, city, state, zip_code, country, meeting_link) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(class_id)
        .bind(&l.street)
        .bind(&l.city)
        .bind(&l.state)
        .bind(&l.zip_code)
        .bind(&l.country)
        .bind(&l.meeting_link)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn replace_syllabus_inner(
        tx: &mut Transaction<'_, Postgres>,
        class_id: DbId,
        plan: &CommitPlan,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM class_syllabus WHERE class_id = $1")
            .bind(class_id)
            .execute(&mut **tx)
            .await?;

        for lesson in &plan.lessons {
            sqlx::query(
                "INSERT INTO class_syllabus \
                    (class_id, week_number, title, description, learning_objectives, \
                     session_date, start_time, end_time, status, notes) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(class_id)
            .bind(lesson.week_number)
            .bind(&lesson.title)
            .bind(&lesson.description)
            .bind(&lesson.learning_objectives)
            .bind(lesson.session_date)
            .bind(lesson.start_time)
            .bind(lesson.end_time)
            .bind(lesson.status.as_str())
            .bind(&lesson.notes)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
