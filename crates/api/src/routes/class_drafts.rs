//! Route definitions for the class-creation wizard.
//!
//! Mounted at `/class-drafts` by `api_routes()`.
//!
//! ```text
//! POST   /                              create_draft
//! GET    /                              list_drafts (?tutor_id, limit, offset)
//! GET    /{id}                          get_draft
//! PATCH  /{id}/basic-info               update_basic_info
//! PATCH  /{id}/class-type               update_class_type
//! PATCH  /{id}/schedule                 update_schedule
//! PATCH  /{id}/pricing                  update_pricing
//! PATCH  /{id}/location                 update_location
//! PUT    /{id}/curriculum               replace_curriculum
//! POST   /{id}/curriculum               add_lesson
//! PATCH  /{id}/curriculum/{index}       update_lesson
//! DELETE /{id}/curriculum/{index}       remove_lesson
//! POST   /{id}/next                     next_step
//! POST   /{id}/previous                 previous_step
//! POST   /{id}/go-to                    go_to_step
//! GET    /{id}/validation               validate_draft
//! GET    /{id}/derived                  derived_fields (?index)
//! POST   /{id}/submit                   submit_draft
//! POST   /{id}/cancel                   cancel_draft
//! ```

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::class_drafts;
use crate::state::AppState;

/// Class draft routes, mounted at `/class-drafts`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(class_drafts::list_drafts).post(class_drafts::create_draft),
        )
        .route("/{id}", get(class_drafts::get_draft))
        .route("/{id}/basic-info", patch(class_drafts::update_basic_info))
        .route("/{id}/class-type", patch(class_drafts::update_class_type))
        .route("/{id}/schedule", patch(class_drafts::update_schedule))
        .route("/{id}/pricing", patch(class_drafts::update_pricing))
        .route("/{id}/location", patch(class_drafts::update_location))
        .route(
            "/{id}/curriculum",
            put(class_drafts::replace_curriculum).post(class_drafts::add_lesson),
        )
        .route(
            "/{id}/curriculum/{index}",
            patch(class_drafts::update_lesson).delete(class_drafts::remove_lesson),
        )
        .route("/{id}/next", post(class_drafts::next_step))
        .route("/{id}/previous", post(class_drafts::previous_step))
        .route("/{id}/go-to", post(class_drafts::go_to_step))
        .route("/{id}/validation", get(class_drafts::validate_draft))
        .route("/{id}/derived", get(class_drafts::derived_fields))
        .route("/{id}/submit", post(class_drafts::submit_draft))
        .route("/{id}/cancel", post(class_drafts::cancel_draft))
}
