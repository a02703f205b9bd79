//! Phase lifecycle, view, notes, and budget API tests.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
}

#[tokio::test]
async fn test_lists_builtin_phases_in_order() {
    let app = TestApp::new();
    let path = format!("/api/projects/{}/phases", app.project_id);
    let response = app.request("GET", &path, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let phases = response.data().as_array().unwrap();
    assert_eq!(phases.len(), 8);
    assert_eq!(phases[0]["phase_name"], "pre_construction");
    assert_eq!(phases[2]["phase_name"], "foundation");
    assert_eq!(phases[7]["phase_name"], "closeout");
}

#[tokio::test]
async fn test_custom_phase_create_and_duplicate() {
    let app = TestApp::new();
    let path = format!("/api/projects/{}/phases", app.project_id);

    let created = app
        .request("POST", &path, Some(json!({ "display_name": "Landscaping" })))
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.data()["phase_name"], "landscaping");
    assert_eq!(created.data()["is_custom"], true);

    let duplicate = app
        .request("POST", &path, Some(json!({ "display_name": "Landscaping" })))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_locked_phase_rejects_mutation() {
    let app = TestApp::new();
    let pour = app.add_requirement("foundation", "Pour Foundation", None).await;

    let locked = app
        .request("POST", &app.phase_path("foundation", "/lock"), None)
        .await;
    assert_eq!(locked.status, StatusCode::OK);
    assert_eq!(locked.data()["is_locked"], true);

    let response = app
        .request(
            "PUT",
            &app.phase_path("foundation", &format!("/requirements/{pour}/completion")),
            Some(json!({ "completed": true })),
        )
        .await;
    assert_eq!(response.status, StatusCode::LOCKED);
    assert_eq!(response.error(), "PHASE_LOCKED");

    let note = app
        .request(
            "POST",
            &app.phase_path("foundation", "/notes"),
            Some(json!({ "content": "Too late" })),
        )
        .await;
    assert_eq!(note.status, StatusCode::LOCKED);

    let unlocked = app
        .request("POST", &app.phase_path("foundation", "/unlock"), None)
        .await;
    assert_eq!(unlocked.data()["is_locked"], false);
}

#[tokio::test]
async fn test_close_then_reopen() {
    let app = TestApp::new();
    let pour = app.add_requirement("foundation", "Pour Foundation", None).await;
    app.request(
        "PUT",
        &app.phase_path("foundation", &format!("/requirements/{pour}/completion")),
        Some(json!({ "completed": true })),
    )
    .await;

    let closed = app
        .request("POST", &app.phase_path("foundation", "/close"), None)
        .await;
    assert_eq!(closed.status, StatusCode::OK);
    assert_eq!(closed.data()["status"], "completed");
    assert_eq!(closed.data()["progress_percent"], 100);
    assert_eq!(closed.data()["is_locked"], true);
    assert!(closed.data()["completed_date"].is_string());

    let reopened = app
        .request("POST", &app.phase_path("foundation", "/reopen"), None)
        .await;
    assert_eq!(reopened.data()["status"], "in_progress");
    assert_eq!(reopened.data()["is_locked"], false);
    assert!(reopened.data()["completed_date"].is_null());
}

#[tokio::test]
async fn test_builtin_phase_cannot_be_deleted() {
    let app = TestApp::new();
    let response = app
        .request("DELETE", &app.phase_path("foundation", ""), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_custom_phase_is_not_found() {
    let app = TestApp::new();
    let response = app
        .request("GET", &app.phase_path("gazebo", "/overview"), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_view_selects_tab() {
    let app = TestApp::new();
    app.request(
        "POST",
        &app.phase_path("foundation", "/notes"),
        Some(json!({ "content": "Inspector on Tuesday", "author": "Site lead" })),
    )
    .await;

    let response = app
        .request("GET", &app.phase_path("foundation", "?tab=notes"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["navigation"]["tab"], "notes");
    assert_eq!(response.data()["content"]["tab"], "notes");
    assert_eq!(
        response.data()["content"]["notes"][0]["content"],
        "Inspector on Tuesday"
    );
    assert_eq!(response.data()["overview"]["note_count"], 1);

    let bad = app
        .request("GET", &app.phase_path("foundation", "?tab=gallery"), None)
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_notes_add_and_delete() {
    let app = TestApp::new();
    let blank = app
        .request(
            "POST",
            &app.phase_path("framing", "/notes"),
            Some(json!({ "content": "" })),
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let added = app
        .request(
            "POST",
            &app.phase_path("framing", "/notes"),
            Some(json!({ "content": "Lumber delivered" })),
        )
        .await;
    let id = added.data()["id"].as_str().unwrap().to_string();

    let deleted = app
        .request("DELETE", &app.phase_path("framing", &format!("/notes/{id}")), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let listed = app
        .request("GET", &app.phase_path("framing", "/notes"), None)
        .await;
    assert!(listed.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_budget_totals() {
    let app = TestApp::new();
    let path = app.phase_path("framing", "/budget");
    app.request(
        "POST",
        &path,
        Some(json!({ "description": "Lumber", "budgeted_cents": 500000, "actual_cents": 420000 })),
    )
    .await;
    let nails = app
        .request(
            "POST",
            &path,
            Some(json!({ "description": "Nails", "budgeted_cents": 20000 })),
        )
        .await;
    let nails_id = nails.data()["id"].as_str().unwrap().to_string();

    let updated = app
        .request(
            "PUT",
            &app.phase_path("framing", &format!("/budget/{nails_id}")),
            Some(json!({ "actual_cents": 25000 })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["actual_cents"], 25000);

    let response = app.request("GET", &path, None).await;
    let summary = &response.data()["summary"];
    assert_eq!(summary["item_count"], 2);
    assert_eq!(summary["total_budgeted_cents"], 520000);
    assert_eq!(summary["total_actual_cents"], 445000);
    assert_eq!(summary["variance_cents"], 75000);

    let negative = app
        .request(
            "POST",
            &path,
            Some(json!({ "description": "Refund", "budgeted_cents": -1 })),
        )
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);
}
