//! Read access to committed classes.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use tutorly_core::class_draft::ClassDraft;
use tutorly_core::class_mapping::hydrate;
use tutorly_core::error::CoreError;
use tutorly_core::schedule::{self, SessionSlot};
use tutorly_core::types::DbId;
use tutorly_db::repositories::ClassRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A committed class in draft shape, with its derived session dates.
#[derive(Debug, Serialize)]
pub struct ClassView {
    pub id: DbId,
    pub day_of_week: Option<&'static str>,
    pub sessions: Vec<SessionSlot>,
    pub class: ClassDraft,
}

/// GET /classes/{id}
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let stored = ClassRepo::load(&state.pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Class",
            id,
        })
    })?;
    let class = hydrate(stored);

    Ok(Json(DataResponse {
        data: ClassView {
            id,
            day_of_week: schedule::schedule_day_of_week(&class.schedule),
            sessions: schedule::session_dates(&class.schedule),
            class,
        },
    }))
}
