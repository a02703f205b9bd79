//! Shared test helpers for API integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use sitehub_api::{AppState, build_app};
use sitehub_core::config::AppConfig;
use sitehub_core::types::ProjectId;
use sitehub_database::Stores;

/// Test application over a fresh in-memory store
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Project every helper addresses
    pub project_id: ProjectId,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of a failure body.
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let state = AppState::new(AppConfig::default(), Stores::memory());
        Self {
            router: build_app(state),
            project_id: ProjectId::new(),
        }
    }

    /// Path of a phase of the test project
    pub fn phase_path(&self, phase: &str, rest: &str) -> String {
        format!("/api/projects/{}/phases/{phase}{rest}", self.project_id)
    }

    /// Send a request with an optional JSON body
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Add a requirement to `phase` and return its ID
    pub async fn add_requirement(&self, phase: &str, text: &str, parent_id: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                &self.phase_path(phase, "/requirements"),
                Some(serde_json::json!({ "text": text, "parent_id": parent_id })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.data()["id"]
            .as_str()
            .expect("requirement id")
            .to_string()
    }

    /// Folders of `phase`
    pub async fn folders(&self, phase: &str) -> Vec<Value> {
        let response = self.request("GET", &self.phase_path(phase, "/folders"), None).await;
        assert_eq!(response.status, StatusCode::OK);
        response.data()["folders"]
            .as_array()
            .cloned()
            .unwrap_or_default()
    }
}
