//! Repository for the `class_drafts` table.
//!
//! Status changes are conditional updates (`WHERE status = ...`), so two
//! concurrent requests cannot both move a session out of `in_progress`.
//! A `None` result means the row is missing or not in the expected status.

use sqlx::PgPool;
use tutorly_core::types::DbId;
use tutorly_core::wizard::DraftStatus;

use crate::models::class_draft::ClassDraftSession;

/// Column list for `class_drafts` queries.
const COLUMNS: &str = "id, tutor_id, editing_class_id, current_step, draft, status, \
     committed_class_id, created_at, updated_at";

/// Provides CRUD and status transitions for wizard draft sessions.
pub struct ClassDraftRepo;

impl ClassDraftRepo {
    /// Insert a new draft session.
    pub async fn create(
        pool: &PgPool,
        tutor_id: DbId,
        editing_class_id: Option<DbId>,
        current_step: i32,
        draft: &serde_json::Value,
    ) -> Result<ClassDraftSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO class_drafts (tutor_id, editing_class_id, current_step, draft) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassDraftSession>(&query)
            .bind(tutor_id)
            .bind(editing_class_id)
            .bind(current_step)
            .bind(draft)
            .fetch_one(pool)
            .await
    }

    /// Find a draft session by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ClassDraftSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM class_drafts WHERE id = $1");
        sqlx::query_as::<_, ClassDraftSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Store an edited draft. Only applies to in-progress sessions.
    pub async fn save_draft(
        pool: &PgPool,
        id: DbId,
        current_step: i32,
        draft: &serde_json::Value,
    ) -> Result<Option<ClassDraftSession>, sqlx::Error> {
        let query = format!(
            "UPDATE class_drafts SET current_step = $2, draft = $3 \
             WHERE id = $1 AND status = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassDraftSession>(&query)
            .bind(id)
            .bind(current_step)
            .bind(draft)
            .bind(DraftStatus::InProgress.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move a session from `in_progress` to `submitting`.
    ///
    /// Returns `None` when another submit already holds the session.
    pub async fn begin_submit(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ClassDraftSession>, sqlx::Error> {
        Self::transition(pool, id, DraftStatus::InProgress, DraftStatus::Submitting).await
    }

    /// Return a failed submit to `in_progress`, keeping its draft.
    pub async fn abort_submit(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ClassDraftSession>, sqlx::Error> {
        Self::transition(pool, id, DraftStatus::Submitting, DraftStatus::InProgress).await
    }

    /// Mark a submit as done, record the class and store the reset draft.
    pub async fn finish_submit(
        pool: &PgPool,
        id: DbId,
        class_id: DbId,
        reset_draft: &serde_json::Value,
    ) -> Result<Option<ClassDraftSession>, sqlx::Error> {
        let query = format!(
            "UPDATE class_drafts \
             SET status = $2, committed_class_id = $3, draft = $4, current_step = 1 \
             WHERE id = $1 AND status = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassDraftSession>(&query)
            .bind(id)
            .bind(DraftStatus::Submitted.as_str())
            .bind(class_id)
            .bind(reset_draft)
            .bind(DraftStatus::Submitting.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Reopen a `submitting` session whose class was committed but whose
    /// completion was not recorded. The session then edits that class.
    pub async fn reopen_committed(
        pool: &PgPool,
        id: DbId,
        class_id: DbId,
        draft: &serde_json::Value,
    ) -> Result<Option<ClassDraftSession>, sqlx::Error> {
        let query = format!(
            "UPDATE class_drafts SET status = $2, editing_class_id = $3, draft = $4 \
             WHERE id = $1 AND status = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassDraftSession>(&query)
            .bind(id)
            .bind(DraftStatus::InProgress.as_str())
            .bind(class_id)
            .bind(draft)
            .bind(DraftStatus::Submitting.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Cancel an in-progress session and store the reset draft.
    pub async fn cancel(
        pool: &PgPool,
        id: DbId,
        reset_draft: &serde_json::Value,
    ) -> Result<Option<ClassDraftSession>, sqlx::Error> {
        let query = format!(
            "UPDATE class_drafts SET status = $2, draft = $3, current_step = 1 \
             WHERE id = $1 AND status = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassDraftSession>(&query)
            .bind(id)
            .bind(DraftStatus::Cancelled.as_str())
            .bind(reset_draft)
            .bind(DraftStatus::InProgress.as_str())
            .fetch_optional(pool)
            .await
    }

    /// List a tutor's sessions, most recent first.
    pub async fn list_by_tutor(
        pool: &PgPool,
        tutor_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ClassDraftSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM class_drafts \
             WHERE tutor_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ClassDraftSession>(&query)
            .bind(tutor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a tutor's sessions.
    pub async fn count_by_tutor(pool: &PgPool, tutor_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM class_drafts WHERE tutor_id = $1")
            .bind(tutor_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    async fn transition(
        pool: &PgPool,
        id: DbId,
        from: DraftStatus,
        to: DraftStatus,
    ) -> Result<Option<ClassDraftSession>, sqlx::Error> {
        let query = format!(
            "UPDATE class_drafts SET status = $2 \
             WHERE id = $1 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassDraftSession>(&query)
            .bind(id)
            .bind(to.as_str())
            .bind(from.as_str())
            .fetch_optional(pool)
            .await
    }
}
