//! Handlers for the class-creation wizard.
//!
//! A wizard session is a `class_drafts` row holding the serialized
//! [`ClassDraft`]. Every mutation loads the draft, applies one setter and
//! stores it back. Nothing is written to the class tables until submit.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tutorly_core::class_draft::{
    BasicInfoPatch, ClassDraft, ClassTypePatch, LessonItem, LessonPatch, LocationPatch,
    PricingPatch, SchedulePatch,
};
use tutorly_core::class_mapping::{hydrate, CommitPlan};
use tutorly_core::error::CoreError;
use tutorly_core::schedule::{self, SessionSlot};
use tutorly_core::search::{clamp_limit, clamp_offset};
use tutorly_core::types::{DbId, Timestamp};
use tutorly_core::validation::{self, ValidationReport};
use tutorly_core::wizard::{self, WizardStep};
use tutorly_db::models::class_draft::{encode_draft, ClassDraftSession, CreateClassDraft};
use tutorly_db::repositories::{ClassDraftRepo, ClassRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Pagination parameters for listing sessions.
#[derive(Debug, Deserialize)]
pub struct ListDraftsParams {
    pub tutor_id: DbId,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Body of `POST /class-drafts/{id}/go-to`.
#[derive(Debug, Deserialize)]
pub struct GoToStepRequest {
    pub step: i64,
}

/// Query of `GET /class-drafts/{id}/derived`.
#[derive(Debug, Deserialize)]
pub struct DerivedParams {
    pub index: Option<u32>,
}

/// A wizard session with its decoded draft.
#[derive(Debug, Serialize)]
pub struct DraftSessionView {
    pub id: DbId,
    pub tutor_id: DbId,
    pub status: String,
    pub current_step: u8,
    pub step: WizardStep,
    pub step_label: &'static str,
    pub editing_class_id: Option<DbId>,
    pub committed_class_id: Option<DbId>,
    pub draft: ClassDraft,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DraftSessionView {
    fn from_session(session: ClassDraftSession) -> AppResult<Self> {
        let draft = session.parse_draft()?;
        let step = draft.current_wizard_step();
        Ok(Self {
            id: session.id,
            tutor_id: session.tutor_id,
            status: session.status,
            current_step: draft.current_step(),
            step,
            step_label: step.label(),
            editing_class_id: draft.editing_class_id,
            committed_class_id: session.committed_class_id,
            draft,
            created_at: session.created_at,
            updated_at: session.updated_at,
        })
    }
}

/// Result of the validation endpoint.
#[derive(Debug, Serialize)]
pub struct ValidationView {
    pub valid: bool,
    #[serde(flatten)]
    pub report: ValidationReport,
}

/// Derived, read-only schedule fields.
#[derive(Debug, Serialize)]
pub struct DerivedFieldsView {
    pub day_of_week: Option<&'static str>,
    pub next_session: SessionSlot,
    pub sessions: Vec<SessionSlot>,
}

/// Result of a successful submit.
///
/// `session` is `None` when the class was committed but the session row
/// could not be updated afterwards.
#[derive(Debug, Serialize)]
pub struct SubmitView {
    pub class_id: DbId,
    pub session: Option<DraftSessionView>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a draft session exists, returning the full row.
async fn ensure_draft_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<ClassDraftSession> {
    ClassDraftRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "ClassDraft",
            id,
        })
    })
}

/// Decode the draft of a session that still accepts edits.
async fn load_editable(pool: &sqlx::PgPool, id: DbId) -> AppResult<ClassDraft> {
    let session = ensure_draft_exists(pool, id).await?;
    wizard::ensure_editable(&session.status)?;
    Ok(session.parse_draft()?)
}

/// Store a draft back onto its session.
async fn store_draft(pool: &sqlx::PgPool, id: DbId, draft: &ClassDraft) -> AppResult<DraftSessionView> {
    let encoded = encode_draft(draft)?;
    let updated = ClassDraftRepo::save_draft(pool, id, i32::from(draft.current_step()), &encoded)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Draft changed status while it was being edited".to_string(),
            ))
        })?;
    DraftSessionView::from_session(updated)
}

/// Apply one setter to a stored draft.
async fn mutate_draft<F>(state: &AppState, id: DbId, apply: F) -> AppResult<DraftSessionView>
where
    F: FnOnce(&mut ClassDraft) -> Result<(), CoreError>,
{
    let mut draft = load_editable(&state.pool, id).await?;
    apply(&mut draft)?;
    store_draft(&state.pool, id, &draft).await
}

fn reject_if_invalid(report: ValidationReport) -> AppResult<()> {
    if report.is_valid() {
        Ok(())
    } else {
        Err(AppError::InvalidDraft(report))
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

// ---------------------------------------------------------------------------
// POST /class-drafts
// ---------------------------------------------------------------------------

/// Open a wizard session, empty or hydrated from an existing class.
pub async fn create_draft(
    State(state): State<AppState>,
    Json(body): Json<CreateClassDraft>,
) -> AppResult<impl IntoResponse> {
    let draft = match body.class_id {
        Some(class_id) => {
            let not_found = || {
                AppError::Core(CoreError::NotFound {
                    entity: "Class",
                    id: class_id,
                })
            };
            // Another tutor's class is reported as missing.
            ClassRepo::find_by_id(&state.pool, class_id)
                .await?
                .filter(|class| class.tutor_id == body.tutor_id)
                .ok_or_else(not_found)?;
            let stored = ClassRepo::load(&state.pool, class_id)
                .await?
                .ok_or_else(not_found)?;
            hydrate(stored)
        }
        None => ClassDraft::new(),
    };

    let session = ClassDraftRepo::create(
        &state.pool,
        body.tutor_id,
        draft.editing_class_id,
        i32::from(draft.current_step()),
        &encode_draft(&draft)?,
    )
    .await?;

    tracing::info!(
        draft_id = session.id,
        tutor_id = body.tutor_id,
        editing_class_id = ?draft.editing_class_id,
        "Class draft opened"
    );

    let view = DraftSessionView::from_session(session)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// GET /class-drafts
// ---------------------------------------------------------------------------

/// List a tutor's wizard sessions.
pub async fn list_drafts(
    State(state): State<AppState>,
    Query(params): Query<ListDraftsParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, 25, 100);
    let offset = clamp_offset(params.offset);

    let sessions =
        ClassDraftRepo::list_by_tutor(&state.pool, params.tutor_id, limit, offset).await?;
    let items = sessions
        .into_iter()
        .map(DraftSessionView::from_session)
        .collect::<AppResult<Vec<_>>>()?;

    tracing::debug!(
        count = items.len(),
        tutor_id = params.tutor_id,
        "Listed class drafts"
    );

    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /class-drafts/{id}
// ---------------------------------------------------------------------------

/// Get a single wizard session.
pub async fn get_draft(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = ensure_draft_exists(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: DraftSessionView::from_session(session)?,
    }))
}

// ---------------------------------------------------------------------------
// PATCH /class-drafts/{id}/{group}
// ---------------------------------------------------------------------------

pub async fn update_basic_info(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<BasicInfoPatch>,
) -> AppResult<impl IntoResponse> {
    let view = mutate_draft(&state, id, |draft| {
        draft.set_basic_info(patch);
        Ok(())
    })
    .await?;
    tracing::debug!(draft_id = id, "Basic info updated");
    Ok(Json(DataResponse { data: view }))
}

pub async fn update_class_type(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<ClassTypePatch>,
) -> AppResult<impl IntoResponse> {
    let view = mutate_draft(&state, id, |draft| {
        draft.set_class_type(patch);
        Ok(())
    })
    .await?;
    tracing::debug!(
        draft_id = id,
        delivery_mode = view.draft.delivery_mode().as_str(),
        "Class type updated"
    );
    Ok(Json(DataResponse { data: view }))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<SchedulePatch>,
) -> AppResult<impl IntoResponse> {
    let view = mutate_draft(&state, id, |draft| {
        draft.set_schedule(patch);
        Ok(())
    })
    .await?;
    tracing::debug!(draft_id = id, "Schedule updated");
    Ok(Json(DataResponse { data: view }))
}

pub async fn update_pricing(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<PricingPatch>,
) -> AppResult<impl IntoResponse> {
    let view = mutate_draft(&state, id, |draft| {
        draft.set_pricing(patch);
        Ok(())
    })
    .await?;
    tracing::debug!(draft_id = id, "Pricing updated");
    Ok(Json(DataResponse { data: view }))
}

pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<LocationPatch>,
) -> AppResult<impl IntoResponse> {
    let view = mutate_draft(&state, id, |draft| {
        draft.set_location(patch);
        Ok(())
    })
    .await?;
    tracing::debug!(draft_id = id, "Location updated");
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// Curriculum
// ---------------------------------------------------------------------------

/// PUT /class-drafts/{id}/curriculum
pub async fn replace_curriculum(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(lessons): Json<Vec<LessonItem>>,
) -> AppResult<impl IntoResponse> {
    let count = lessons.len();
    let view = mutate_draft(&state, id, |draft| {
        draft.set_curriculum(lessons);
        Ok(())
    })
    .await?;
    tracing::debug!(draft_id = id, lessons = count, "Curriculum replaced");
    Ok(Json(DataResponse { data: view }))
}

/// POST /class-drafts/{id}/curriculum
pub async fn add_lesson(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(lesson): Json<LessonItem>,
) -> AppResult<impl IntoResponse> {
    let view = mutate_draft(&state, id, |draft| {
        let week = draft.add_lesson(lesson);
        tracing::debug!(draft_id = id, week, "Lesson added");
        Ok(())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// PATCH /class-drafts/{id}/curriculum/{index}
pub async fn update_lesson(
    State(state): State<AppState>,
    Path((id, index)): Path<(DbId, usize)>,
    Json(patch): Json<LessonPatch>,
) -> AppResult<impl IntoResponse> {
    let view = mutate_draft(&state, id, |draft| draft.update_lesson(index, patch)).await?;
    tracing::debug!(draft_id = id, index, "Lesson updated");
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /class-drafts/{id}/curriculum/{index}
pub async fn remove_lesson(
    State(state): State<AppState>,
    Path((id, index)): Path<(DbId, usize)>,
) -> AppResult<impl IntoResponse> {
    let view = mutate_draft(&state, id, |draft| draft.remove_lesson(index).map(|_| ())).await?;
    tracing::debug!(draft_id = id, index, "Lesson removed");
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// POST /class-drafts/{id}/next
///
/// Validates the step being left before advancing.
pub async fn next_step(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut draft = load_editable(&state.pool, id).await?;
    let from = draft.current_step();

    reject_if_invalid(validation::validate_step(&draft, draft.current_wizard_step()))?;
    let to = draft.next_step();

    let view = store_draft(&state.pool, id, &draft).await?;
    tracing::info!(draft_id = id, from_step = from, to_step = to, "Class draft advanced");
    Ok(Json(DataResponse { data: view }))
}

/// POST /class-drafts/{id}/previous
pub async fn previous_step(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut draft = load_editable(&state.pool, id).await?;
    let from = draft.current_step();
    let to = draft.previous_step();

    let view = store_draft(&state.pool, id, &draft).await?;
    tracing::info!(draft_id = id, from_step = from, to_step = to, "Class draft went back");
    Ok(Json(DataResponse { data: view }))
}

/// POST /class-drafts/{id}/go-to
///
/// The target is clamped into range. Moving forward validates every step
/// between the current one and the target.
pub async fn go_to_step(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<GoToStepRequest>,
) -> AppResult<impl IntoResponse> {
    let mut draft = load_editable(&state.pool, id).await?;
    let from = draft.current_step();
    let target = wizard::clamp_step_i64(body.step);

    let steps = wizard::steps_to_validate(from, target);
    reject_if_invalid(validation::validate_steps(&draft, &steps))?;
    let to = draft.go_to_step(target);

    let view = store_draft(&state.pool, id, &draft).await?;
    tracing::info!(draft_id = id, from_step = from, to_step = to, "Class draft jumped");
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// Read-only views
// ---------------------------------------------------------------------------

/// GET /class-drafts/{id}/validation
pub async fn validate_draft(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = ensure_draft_exists(&state.pool, id).await?;
    let mut draft = session.parse_draft()?;
    let report = validation::validate_for_commit(&mut draft);

    Ok(Json(DataResponse {
        data: ValidationView {
            valid: report.is_valid(),
            report,
        },
    }))
}

/// GET /class-drafts/{id}/derived
pub async fn derived_fields(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DerivedParams>,
) -> AppResult<impl IntoResponse> {
    let session = ensure_draft_exists(&state.pool, id).await?;
    let draft = session.parse_draft()?;
    let sched = &draft.schedule;

    Ok(Json(DataResponse {
        data: DerivedFieldsView {
            day_of_week: schedule::schedule_day_of_week(sched),
            next_session: schedule::next_session(sched, params.index.unwrap_or(1), today()),
            sessions: schedule::session_dates(sched),
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /class-drafts/{id}/submit
// ---------------------------------------------------------------------------

/// Lock the session and commit its draft.
///
/// The session moves to `submitting` for the duration of the write, so a
/// second submit or any edit gets 409.
pub async fn submit_draft(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = ensure_draft_exists(&state.pool, id).await?;
    wizard::ensure_editable(&session.status)?;

    let locked = ClassDraftRepo::begin_submit(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Draft is already being submitted".to_string(),
            ))
        })?;

    let view = commit_locked_session(&state.pool, locked).await?;
    Ok(Json(DataResponse { data: view }))
}

/// Validate and commit a session already held in `submitting`.
///
/// Works on the draft returned by the lock, never on an earlier read. On a
/// validation or commit failure the session returns to `in_progress` with
/// its draft intact. On success the stored draft is reset.
pub async fn commit_locked_session(
    pool: &sqlx::PgPool,
    locked: ClassDraftSession,
) -> AppResult<SubmitView> {
    let id = locked.id;

    let mut draft = match locked.parse_draft() {
        Ok(draft) => draft,
        Err(err) => {
            release_submit(pool, id).await;
            return Err(err.into());
        }
    };

    let report = validation::validate_for_commit(&mut draft);
    if !report.is_valid() {
        release_submit(pool, id).await;
        return Err(AppError::InvalidDraft(report));
    }

    let plan = CommitPlan::from_draft(&draft);
    let reset_draft = match encode_draft(&ClassDraft::new()) {
        Ok(encoded) => encoded,
        Err(err) => {
            release_submit(pool, id).await;
            return Err(err.into());
        }
    };

    let class_id = match ClassRepo::commit(pool, locked.tutor_id, &plan).await {
        Ok(class_id) => class_id,
        Err(err) => {
            tracing::error!(draft_id = id, error = %err, "Class commit failed");
            release_submit(pool, id).await;
            return Err(err.into());
        }
    };

    tracing::info!(
        draft_id = id,
        class_id,
        edited = plan.class_id.is_some(),
        lessons = plan.lessons.len(),
        "Class draft submitted"
    );

    let session = match ClassDraftRepo::finish_submit(pool, id, class_id, &reset_draft).await {
        Ok(Some(updated)) => Some(DraftSessionView::from_session(updated)?),
        Ok(None) => {
            tracing::warn!(draft_id = id, class_id, "Draft left submitting during commit");
            None
        }
        Err(err) => {
            tracing::error!(draft_id = id, class_id, error = %err, "Failed to record submit");
            draft.editing_class_id = Some(class_id);
            reopen_committed(pool, id, class_id, &draft).await;
            None
        }
    };

    Ok(SubmitView { class_id, session })
}

/// Return a `submitting` session to `in_progress`, logging any failure.
async fn release_submit(pool: &sqlx::PgPool, id: DbId) {
    match ClassDraftRepo::abort_submit(pool, id).await {
        Ok(Some(_)) => tracing::debug!(draft_id = id, "Draft released after failed submit"),
        Ok(None) => tracing::warn!(draft_id = id, "Draft was not in submitting state"),
        Err(err) => tracing::error!(draft_id = id, error = %err, "Failed to release draft"),
    }
}

/// Reopen a session whose class is committed but whose completion could not
/// be recorded. The draft now edits that class, so a resubmit updates it.
async fn reopen_committed(pool: &sqlx::PgPool, id: DbId, class_id: DbId, draft: &ClassDraft) {
    let encoded = match encode_draft(draft) {
        Ok(encoded) => encoded,
        Err(err) => {
            tracing::error!(draft_id = id, error = %err, "Failed to encode draft");
            release_submit(pool, id).await;
            return;
        }
    };
    if let Err(err) = ClassDraftRepo::reopen_committed(pool, id, class_id, &encoded).await {
        tracing::error!(draft_id = id, class_id, error = %err, "Failed to reopen draft");
    }
}

// ---------------------------------------------------------------------------
// POST /class-drafts/{id}/cancel
// ---------------------------------------------------------------------------

/// Cancel the wizard and reset its draft.
pub async fn cancel_draft(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut draft = load_editable(&state.pool, id).await?;
    draft.reset();

    let updated = ClassDraftRepo::cancel(&state.pool, id, &encode_draft(&draft)?)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Draft changed status while it was being cancelled".to_string(),
            ))
        })?;

    tracing::info!(draft_id = id, "Class draft cancelled");
    Ok(Json(DataResponse {
        data: DraftSessionView::from_session(updated)?,
    }))
}
