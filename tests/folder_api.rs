//! Folder and file API tests.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

async fn custom_folder(app: &TestApp, label: &str) -> String {
    let response = app
        .request(
            "POST",
            &app.phase_path("foundation", "/folders"),
            Some(json!({ "label": label })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["kind"], "custom");
    response.data()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_custom_folder_lifecycle() {
    let app = TestApp::new();
    let id = custom_folder(&app, "Permits").await;

    let renamed = app
        .request(
            "PUT",
            &app.phase_path("foundation", &format!("/folders/{id}")),
            Some(json!({ "label": "City Permits" })),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.data()["label"], "City Permits");

    let deleted = app
        .request(
            "DELETE",
            &app.phase_path("foundation", &format!("/folders/{id}")),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(app.folders("foundation").await.is_empty());
}

#[tokio::test]
async fn test_requirement_folder_cannot_be_renamed() {
    let app = TestApp::new();
    app.add_requirement("foundation", "Pour Foundation", None).await;
    let folder_id = app.folders("foundation").await[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .request(
            "PUT",
            &app.phase_path("foundation", &format!("/folders/{folder_id}")),
            Some(json!({ "label": "Renamed" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_folder_order() {
    let app = TestApp::new();
    let permits = custom_folder(&app, "Permits").await;
    let photos = custom_folder(&app, "Photos").await;

    let response = app
        .request(
            "PUT",
            &app.phase_path("foundation", "/folders/order"),
            Some(json!({ "folder_ids": [photos, permits] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let folders = app.folders("foundation").await;
    assert_eq!(folders[0]["label"], "Photos");
    assert_eq!(folders[1]["label"], "Permits");
}

#[tokio::test]
async fn test_sync_is_idempotent() {
    let app = TestApp::new();
    app.add_requirement("foundation", "Pour Foundation", None).await;

    let response = app
        .request("POST", &app.phase_path("foundation", "/folders/sync"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["created"], 0);
    assert_eq!(response.data()["orphans_removed"], 0);
    assert_eq!(app.folders("foundation").await.len(), 1);
}

#[tokio::test]
async fn test_files_filter_by_folder() {
    let app = TestApp::new();
    let permits = custom_folder(&app, "Permits").await;
    let files = app.phase_path("foundation", "/files");

    let filed = app
        .request(
            "POST",
            &files,
            Some(json!({
                "folder_id": permits,
                "file_name": "permit.pdf",
                "file_url": "https://files.example/permit.pdf",
                "size_bytes": 2048
            })),
        )
        .await;
    assert_eq!(filed.status, StatusCode::OK, "{:?}", filed.body);
    app.request(
        "POST",
        &files,
        Some(json!({ "file_name": "site.jpg", "file_url": "https://files.example/site.jpg" })),
    )
    .await;

    let in_folder = app
        .request("GET", &format!("{files}?folder={permits}"), None)
        .await;
    assert_eq!(in_folder.data().as_array().unwrap().len(), 1);

    let unfiled = app.request("GET", &format!("{files}?folder=unfiled"), None).await;
    assert_eq!(unfiled.data()[0]["file_name"], "site.jpg");

    let listing = app
        .request("GET", &app.phase_path("foundation", "/folders"), None)
        .await;
    assert_eq!(listing.data()["folders"][0]["file_count"], 1);
    assert_eq!(listing.data()["unfiled_count"], 1);
    assert_eq!(listing.data()["total_files"], 2);
}

#[tokio::test]
async fn test_deleting_folder_removes_its_files() {
    let app = TestApp::new();
    let permits = custom_folder(&app, "Permits").await;
    let files = app.phase_path("foundation", "/files");
    app.request(
        "POST",
        &files,
        Some(json!({
            "folder_id": permits,
            "file_name": "permit.pdf",
            "file_url": "https://files.example/permit.pdf"
        })),
    )
    .await;

    app.request(
        "DELETE",
        &app.phase_path("foundation", &format!("/folders/{permits}")),
        None,
    )
    .await;

    let remaining = app.request("GET", &files, None).await;
    assert!(remaining.data().as_array().unwrap().is_empty());
}
