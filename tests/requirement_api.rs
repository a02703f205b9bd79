//! Requirement checklist API tests.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_root_requirement_creates_folder() {
    let app = TestApp::new();
    let pour = app.add_requirement("foundation", "Pour Foundation", None).await;

    let folders = app.folders("foundation").await;
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0]["kind"], "requirement");
    assert_eq!(folders[0]["requirement_id"], pour.as_str());
    assert_eq!(folders[0]["file_name"], "[Folder] Pour Foundation");
    assert_eq!(folders[0]["file_url"], format!("folder://{pour}"));
}

#[tokio::test]
async fn test_sub_requirement_nests_without_folder() {
    let app = TestApp::new();
    let pour = app.add_requirement("foundation", "Pour Foundation", None).await;
    app.add_requirement("foundation", "Inspect rebar", Some(&pour)).await;

    let response = app
        .request("GET", &app.phase_path("foundation", "/requirements"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let roots = response.data()["roots"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["subs"][0]["requirement_text"], "Inspect rebar");
    assert_eq!(response.data()["total"], 2);

    assert_eq!(app.folders("foundation").await.len(), 1);
}

#[tokio::test]
async fn test_nesting_under_sub_is_rejected() {
    let app = TestApp::new();
    let pour = app.add_requirement("foundation", "Pour Foundation", None).await;
    let rebar = app.add_requirement("foundation", "Inspect rebar", Some(&pour)).await;

    let response = app
        .request(
            "POST",
            &app.phase_path("foundation", "/requirements"),
            Some(json!({ "text": "Too deep", "parent_id": rebar })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_blank_text_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            &app.phase_path("foundation", "/requirements"),
            Some(json!({ "text": "" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_completion_updates_progress() {
    let app = TestApp::new();
    let pour = app.add_requirement("foundation", "Pour Foundation", None).await;
    app.add_requirement("foundation", "Cure slab", None).await;

    let response = app
        .request(
            "PUT",
            &app.phase_path("foundation", &format!("/requirements/{pour}/completion")),
            Some(json!({ "completed": true })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "completed");
    assert!(response.data()["completed_date"].is_string());

    let overview = app
        .request("GET", &app.phase_path("foundation", "/overview"), None)
        .await;
    assert_eq!(overview.data()["phase"]["progress_percent"], 50);
    assert_eq!(overview.data()["phase"]["status"], "in_progress");
}

#[tokio::test]
async fn test_delete_root_removes_subs_and_folder() {
    let app = TestApp::new();
    let pour = app.add_requirement("foundation", "Pour Foundation", None).await;
    app.add_requirement("foundation", "Inspect rebar", Some(&pour)).await;

    let response = app
        .request(
            "DELETE",
            &app.phase_path("foundation", &format!("/requirements/{pour}")),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["removed"], 2);

    let tree = app
        .request("GET", &app.phase_path("foundation", "/requirements"), None)
        .await;
    assert_eq!(tree.data()["total"], 0);
    assert!(app.folders("foundation").await.is_empty());
}

#[tokio::test]
async fn test_promoting_sub_creates_folder() {
    let app = TestApp::new();
    let pour = app.add_requirement("foundation", "Pour Foundation", None).await;
    let rebar = app.add_requirement("foundation", "Inspect rebar", Some(&pour)).await;

    let response = app
        .request(
            "PUT",
            &app.phase_path("foundation", &format!("/requirements/{rebar}/move")),
            Some(json!({ "index": 0 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["level_changed"], true);

    let folders = app.folders("foundation").await;
    assert_eq!(folders.len(), 2);
    assert!(folders.iter().any(|f| f["requirement_id"] == rebar.as_str()));
}

#[tokio::test]
async fn test_unknown_requirement_is_not_found() {
    let app = TestApp::new();
    let response = app
        .request(
            "PUT",
            &app.phase_path(
                "foundation",
                "/requirements/00000000-0000-0000-0000-000000000000/completion",
            ),
            Some(json!({ "completed": true })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = TestApp::new();
    let response = app
        .request(
            "DELETE",
            &app.phase_path("foundation", "/requirements/not-a-uuid"),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_custom_phase_rejects_requirement() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            &app.phase_path("no_such_phase", "/requirements"),
            Some(json!({ "text": "Stray" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sibling_orders_stay_distinct_after_delete() {
    let app = TestApp::new();
    let first = app.add_requirement("foundation", "A", None).await;
    app.add_requirement("foundation", "B", None).await;
    app.add_requirement("foundation", "C", None).await;
    app.request(
        "DELETE",
        &app.phase_path("foundation", &format!("/requirements/{first}")),
        None,
    )
    .await;
    app.add_requirement("foundation", "D", None).await;

    let tree = app
        .request("GET", &app.phase_path("foundation", "/requirements"), None)
        .await;
    let orders: Vec<i64> = tree.data()["roots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node["requirement"]["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}
