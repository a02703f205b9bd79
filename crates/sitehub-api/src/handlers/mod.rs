//! Route handlers organized by domain.

pub mod budget;
pub mod events;
pub mod file;
pub mod folder;
pub mod health;
pub mod note;
pub mod phase;
pub mod requirement;

use axum::Json;
use serde::Serialize;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;

/// What every JSON handler returns.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wrap data in the success envelope.
pub(crate) fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}
