//! HTTP-level integration tests for the class-creation wizard.
//!
//! Drives `/api/v1/class-drafts` through the full router, then checks the
//! committed class through `/api/v1/classes/{id}`.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete, get, patch_json, post, post_json, put_json,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tutorly_api::error::AppError;
use tutorly_api::handlers::class_drafts::commit_locked_session;
use tutorly_db::repositories::ClassDraftRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TUTOR_ID: i64 = 7;

async fn open_draft(pool: &PgPool) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/class-drafts",
        json!({ "tutor_id": TUTOR_ID }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn patch_group(pool: &PgPool, id: i64, group: &str, body: Value) -> Value {
    let response = patch_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/{group}"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "PATCH {group} failed");
    body_json(response).await
}

async fn next(pool: &PgPool, id: i64) -> (StatusCode, Value) {
    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/next"),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

/// Fill every group of a draft with valid online-class data.
async fn fill_valid_online(pool: &PgPool, id: i64) {
    patch_group(
        pool,
        id,
        "basic-info",
        json!({ "title": "  Intro to Algebra  ", "subject": "Math" }),
    )
    .await;
    patch_group(
        pool,
        id,
        "class-type",
        json!({ "meeting_link": "https://meet.example.com/algebra" }),
    )
    .await;
    patch_group(
        pool,
        id,
        "schedule",
        json!({
            "frequency": "weekly",
            "start_date": "2024-06-03",
            "total_sessions": 3,
            "time_slots": [{ "start_time": "16:00:00", "end_time": "17:30:00" }]
        }),
    )
    .await;
    patch_group(pool, id, "pricing", json!({ "price": 25.0, "currency": "usd" })).await;
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/curriculum"),
        json!([
            { "title": "Variables" },
            { "title": "Equations", "session_date": "2024-06-12" }
        ]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

fn field_names(json: &Value) -> Vec<String> {
    json["fields"]
        .as_array()
        .expect("fields should be an array")
        .iter()
        .map(|f| f["field"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Test: a new draft has documented defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_open_draft_has_defaults(pool: PgPool) {
    let id = open_draft(&pool).await;

    let response = get(build_test_app(pool), &format!("/api/v1/class-drafts/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["status"], "in_progress");
    assert_eq!(data["current_step"], 1);
    assert_eq!(data["step"], "basic_info");
    assert_eq!(data["tutor_id"], TUTOR_ID);
    assert!(data["editing_class_id"].is_null());
    assert_eq!(data["draft"]["pricing"]["currency"], "USD");
    assert_eq!(data["draft"]["pricing"]["max_students"], 10);
    assert_eq!(data["draft"]["schedule"]["total_sessions"], 1);
    assert_eq!(data["draft"]["venue"]["delivery_mode"], "online");
    assert_eq!(data["draft"]["curriculum"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_draft_returns_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/class-drafts/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: next validates the step being left
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_next_blocks_on_invalid_step(pool: PgPool) {
    let id = open_draft(&pool).await;

    let (status, json) = next(&pool, id).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(field_names(&json), vec!["basic_info.title"]);

    patch_group(&pool, id, "basic-info", json!({ "title": "Algebra" })).await;
    let (status, json) = next(&pool, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["current_step"], 2);

    // Online is the default mode, so the meeting link is required.
    let (status, json) = next(&pool, id).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(field_names(&json), vec!["class_type.meeting_link"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_previous_never_validates_and_stops_at_first(pool: PgPool) {
    let id = open_draft(&pool).await;

    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/previous"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["current_step"], 1);
}

// ---------------------------------------------------------------------------
// Test: go-to clamps and validates the skipped steps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_go_to_validates_skipped_steps(pool: PgPool) {
    let id = open_draft(&pool).await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/go-to"),
        json!({ "step": 4 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let fields = field_names(&body_json(response).await);
    assert!(fields.contains(&"basic_info.title".to_string()));
    assert!(fields.contains(&"class_type.meeting_link".to_string()));
    assert!(fields.contains(&"schedule.start_date".to_string()));
    assert!(!fields.iter().any(|f| f.starts_with("pricing")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_go_to_clamps_out_of_range_targets(pool: PgPool) {
    let id = open_draft(&pool).await;
    fill_valid_online(&pool, id).await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/go-to"),
        json!({ "step": 99 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_step"], 7);
    assert_eq!(json["data"]["step"], "review");

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/go-to"),
        json!({ "step": -3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["current_step"], 1);
}

// ---------------------------------------------------------------------------
// Test: class type switching and one-on-one seats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_on_one_forces_single_seat(pool: PgPool) {
    let id = open_draft(&pool).await;

    let json = patch_group(&pool, id, "class-type", json!({ "class_size": "one-on-one" })).await;
    assert_eq!(json["data"]["draft"]["pricing"]["max_students"], 1);

    // Raising the seat count is silently corrected back to one.
    let json = patch_group(&pool, id, "pricing", json!({ "max_students": 12 })).await;
    assert_eq!(json["data"]["draft"]["pricing"]["max_students"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_offline_switch_drops_meeting_link(pool: PgPool) {
    let id = open_draft(&pool).await;
    patch_group(
        &pool,
        id,
        "class-type",
        json!({ "meeting_link": "https://meet.example.com/a" }),
    )
    .await;

    let json = patch_group(&pool, id, "class-type", json!({ "delivery_mode": "offline" })).await;
    let venue = &json["data"]["draft"]["venue"];
    assert_eq!(venue["delivery_mode"], "offline");
    assert!(venue.get("meeting_link").is_none());
    assert_eq!(venue["address"]["street"], "");

    // A meeting link sent to an offline draft is ignored.
    let json = patch_group(
        &pool,
        id,
        "location",
        json!({ "street": "1 Main St", "meeting_link": "https://meet.example.com/b" }),
    )
    .await;
    let venue = &json["data"]["draft"]["venue"];
    assert_eq!(venue["address"]["street"], "1 Main St");
    assert!(venue.get("meeting_link").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_null_clears_optional_fields(pool: PgPool) {
    let id = open_draft(&pool).await;
    patch_group(
        &pool,
        id,
        "schedule",
        json!({ "start_date": "2024-06-03", "end_date": "2024-08-26" }),
    )
    .await;
    patch_group(&pool, id, "pricing", json!({ "price": 25.0 })).await;

    // An absent field keeps its value.
    let json = patch_group(&pool, id, "schedule", json!({ "total_sessions": 4 })).await;
    assert_eq!(json["data"]["draft"]["schedule"]["end_date"], "2024-08-26");

    let json = patch_group(&pool, id, "schedule", json!({ "end_date": null })).await;
    let schedule = &json["data"]["draft"]["schedule"];
    assert!(schedule["end_date"].is_null());
    assert_eq!(schedule["start_date"], "2024-06-03");
    assert_eq!(schedule["total_sessions"], 4);

    let json = patch_group(&pool, id, "pricing", json!({ "price": null })).await;
    assert!(json["data"]["draft"]["pricing"]["price"].is_null());
}

// ---------------------------------------------------------------------------
// Test: curriculum editing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_curriculum_add_update_remove(pool: PgPool) {
    let id = open_draft(&pool).await;
    let base = format!("/api/v1/class-drafts/{id}/curriculum");

    for title in ["Week one", "Week two", "Week three"] {
        let response = post_json(build_test_app(pool.clone()), &base, json!({ "title": title })).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = patch_json(
        build_test_app(pool.clone()),
        &format!("{base}/1"),
        json!({ "notes": "bring a calculator" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let lesson = &json["data"]["draft"]["curriculum"][1];
    assert_eq!(lesson["title"], "Week two");
    assert_eq!(lesson["notes"], "bring a calculator");
    assert_eq!(lesson["status"], "scheduled");

    let response = delete(build_test_app(pool.clone()), &format!("{base}/0")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<_> = json["data"]["draft"]["curriculum"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Week two", "Week three"]);

    let response = delete(build_test_app(pool), &format!("{base}/5")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: derived fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_derived_fields_follow_the_schedule(pool: PgPool) {
    let id = open_draft(&pool).await;
    fill_valid_online(&pool, id).await;

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/class-drafts/{id}/derived?index=3"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["day_of_week"], "Monday");
    assert_eq!(data["next_session"]["date"], "2024-06-17");
    assert_eq!(data["next_session"]["start_time"], "16:00:00");

    let dates: Vec<_> = data["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["date"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(dates, vec!["2024-06-03", "2024-06-10", "2024-06-17"]);
}

// ---------------------------------------------------------------------------
// Test: full wizard flow through submit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_flow_commits_class(pool: PgPool) {
    let id = open_draft(&pool).await;
    fill_valid_online(&pool, id).await;

    for expected in 2..=7 {
        let (status, json) = next(&pool, id).await;
        assert_eq!(status, StatusCode::OK, "advance to step {expected}");
        assert_eq!(json["data"]["current_step"], expected);
    }

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/validation"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], true);
    assert_eq!(json["data"]["errors"].as_array().unwrap().len(), 0);

    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/submit"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let class_id = json["data"]["class_id"].as_i64().unwrap();
    let session = &json["data"]["session"];
    assert_eq!(session["status"], "submitted");
    assert_eq!(session["committed_class_id"], class_id);
    assert_eq!(session["current_step"], 1);
    assert_eq!(session["draft"]["basic_info"]["title"], "");

    let response = get(build_test_app(pool.clone()), &format!("/api/v1/classes/{class_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["day_of_week"], "Monday");
    assert_eq!(data["class"]["editing_class_id"], class_id);
    assert_eq!(data["class"]["basic_info"]["title"], "Intro to Algebra");
    assert_eq!(data["class"]["pricing"]["currency"], "USD");
    assert_eq!(
        data["class"]["venue"]["meeting_link"],
        "https://meet.example.com/algebra"
    );

    let lessons = data["class"]["curriculum"].as_array().unwrap();
    assert_eq!(lessons.len(), 2);
    // Derived date for week one, explicit date kept for week two.
    assert_eq!(lessons[0]["session_date"], "2024-06-03");
    assert_eq!(lessons[1]["session_date"], "2024-06-12");

    // A submitted session no longer accepts changes.
    let response = post(
        build_test_app(pool),
        &format!("/api/v1/class-drafts/{id}/submit"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_invalid_offline_draft_returns_422(pool: PgPool) {
    let id = open_draft(&pool).await;
    fill_valid_online(&pool, id).await;
    patch_group(&pool, id, "class-type", json!({ "delivery_mode": "offline" })).await;
    patch_group(&pool, id, "location", json!({ "street": "1 Main St" })).await;

    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/submit"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let fields = field_names(&body_json(response).await);
    assert_eq!(fields, vec!["location.city", "location.country"]);

    // The draft stays editable with its data intact.
    let response = get(build_test_app(pool), &format!("/api/v1/class-drafts/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_progress");
    assert_eq!(json["data"]["draft"]["venue"]["address"]["street"], "1 Main St");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_while_submitting_returns_409(pool: PgPool) {
    let id = open_draft(&pool).await;
    fill_valid_online(&pool, id).await;

    ClassDraftRepo::begin_submit(&pool, id)
        .await
        .unwrap()
        .expect("session should move to submitting");

    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/submit"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    // Edits are refused the same way.
    let response = patch_json(
        build_test_app(pool),
        &format!("/api/v1/class-drafts/{id}/basic-info"),
        json!({ "title": "Changed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_commits_the_draft_held_by_the_lock(pool: PgPool) {
    let id = open_draft(&pool).await;
    fill_valid_online(&pool, id).await;

    // An edit stored just before the lock is taken is part of the commit.
    patch_group(&pool, id, "basic-info", json!({ "title": "Geometry" })).await;
    let locked = ClassDraftRepo::begin_submit(&pool, id)
        .await
        .unwrap()
        .expect("session should move to submitting");

    let view = commit_locked_session(&pool, locked).await.unwrap();
    let session = view.session.expect("session row should be updated");
    assert_eq!(session.status, "submitted");
    assert_eq!(session.committed_class_id, Some(view.class_id));

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/classes/{}", view.class_id),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["class"]["basic_info"]["title"], "Geometry");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_locked_draft_is_released(pool: PgPool) {
    let id = open_draft(&pool).await;
    let locked = ClassDraftRepo::begin_submit(&pool, id).await.unwrap().unwrap();

    let err = commit_locked_session(&pool, locked).await.unwrap_err();
    assert_matches!(err, AppError::InvalidDraft(report) if report.has_field("basic_info.title"));

    // The session accepts edits again.
    patch_group(&pool, id, "basic-info", json!({ "title": "Recovered" })).await;
    let response = get(build_test_app(pool), &format!("/api/v1/class-drafts/{id}")).await;
    assert_eq!(body_json(response).await["data"]["status"], "in_progress");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_oversized_schedule_is_rejected_and_preview_capped(pool: PgPool) {
    let id = open_draft(&pool).await;
    fill_valid_online(&pool, id).await;
    patch_group(&pool, id, "schedule", json!({ "total_sessions": 4294967295u64 })).await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/derived"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["sessions"].as_array().unwrap().len(), 1000);

    let response = post(
        build_test_app(pool),
        &format!("/api/v1/class-drafts/{id}/submit"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        field_names(&body_json(response).await),
        vec!["schedule.total_sessions"]
    );
}

// ---------------------------------------------------------------------------
// Test: editing an existing class
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_flow_updates_existing_class(pool: PgPool) {
    let id = open_draft(&pool).await;
    fill_valid_online(&pool, id).await;
    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/submit"),
    )
    .await;
    let class_id = body_json(response).await["data"]["class_id"].as_i64().unwrap();

    // Open an editing session hydrated from the committed class.
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/class-drafts",
        json!({ "tutor_id": TUTOR_ID, "class_id": class_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let edit_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["editing_class_id"], class_id);
    assert_eq!(json["data"]["draft"]["basic_info"]["title"], "Intro to Algebra");
    assert_eq!(json["data"]["draft"]["curriculum"].as_array().unwrap().len(), 2);

    patch_group(&pool, edit_id, "basic-info", json!({ "title": "Algebra II" })).await;
    patch_group(&pool, edit_id, "schedule", json!({ "frequency": "daily" })).await;
    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{edit_id}/curriculum/0"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{edit_id}/submit"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["class_id"], class_id);

    let response = get(build_test_app(pool), &format!("/api/v1/classes/{class_id}")).await;
    let json = body_json(response).await;
    let class = &json["data"]["class"];
    assert_eq!(class["basic_info"]["title"], "Algebra II");
    assert_eq!(class["schedule"]["frequency"], "daily");
    let lessons = class["curriculum"].as_array().unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0]["title"], "Equations");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_open_draft_for_missing_class_returns_404(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/class-drafts",
        json!({ "tutor_id": TUTOR_ID, "class_id": 424242 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_open_draft_for_other_tutors_class_returns_404(pool: PgPool) {
    let id = open_draft(&pool).await;
    fill_valid_online(&pool, id).await;
    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/submit"),
    )
    .await;
    let class_id = body_json(response).await["data"]["class_id"].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool),
        "/api/v1/class-drafts",
        json!({ "tutor_id": TUTOR_ID + 1, "class_id": class_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: cancel and list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancel_resets_and_locks_draft(pool: PgPool) {
    let id = open_draft(&pool).await;
    patch_group(&pool, id, "basic-info", json!({ "title": "Throwaway" })).await;

    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts/{id}/cancel"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "cancelled");
    assert_eq!(json["data"]["draft"]["basic_info"]["title"], "");

    let response = patch_json(
        build_test_app(pool),
        &format!("/api/v1/class-drafts/{id}/basic-info"),
        json!({ "title": "Again" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_drafts_by_tutor(pool: PgPool) {
    open_draft(&pool).await;
    open_draft(&pool).await;
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/class-drafts",
        json!({ "tutor_id": 99 }),
    )
    .await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/class-drafts?tutor_id={TUTOR_ID}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/class-drafts?tutor_id={TUTOR_ID}&limit=1"),
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}
