//! # sitehub-api
//!
//! HTTP API for the SiteHub phase engine built on Axum.
//!
//! Every route lives under `/api/projects/{project_id}/phases`. Responses
//! use the `{ "success": true, "data": ... }` envelope; failures carry an
//! error code and message (see [`error`]).

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
