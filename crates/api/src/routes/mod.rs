pub mod class_drafts;
pub mod classes;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /class-drafts                                    list, open wizard session
/// /class-drafts/{id}                               get session
/// /class-drafts/{id}/basic-info                    patch basic info
/// /class-drafts/{id}/class-type                    patch class type
/// /class-drafts/{id}/schedule                      patch schedule
/// /class-drafts/{id}/pricing                       patch pricing
/// /class-drafts/{id}/location                      patch location
/// /class-drafts/{id}/curriculum                    replace (PUT), append (POST)
/// /class-drafts/{id}/curriculum/{index}            update (PATCH), remove (DELETE)
/// /class-drafts/{id}/next                          advance (POST)
/// /class-drafts/{id}/previous                      go back (POST)
/// /class-drafts/{id}/go-to                         jump (POST)
/// /class-drafts/{id}/validation                    full validation report
/// /class-drafts/{id}/derived                       weekday and session dates
/// /class-drafts/{id}/submit                        commit (POST)
/// /class-drafts/{id}/cancel                        cancel (POST)
///
/// /classes/{id}                                    committed class
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/class-drafts", class_drafts::router())
        .nest("/classes", classes::router())
}
