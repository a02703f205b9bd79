//! Folder handlers: listing, custom folders, ordering, and sync.

use axum::Json;
use axum::extract::State;

use sitehub_core::types::FolderId;
use sitehub_entity::folder::{Folder, FolderListing, FolderOrder};
use sitehub_service::SyncReport;

use super::{ApiResult, ok};
use crate::dto::request::{FolderOrderRequest, FolderRequest, validated};
use crate::dto::response::DeletedResponse;
use crate::extractors::{ItemPath, PhasePath};
use crate::state::AppState;

/// GET /api/projects/{project_id}/phases/{phase}/folders
pub async fn list_folders(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
) -> ApiResult<FolderListing> {
    ok(state.manager.folders().listing(&scope).await?)
}

/// POST /api/projects/{project_id}/phases/{phase}/folders
pub async fn create_folder(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
    Json(req): Json<FolderRequest>,
) -> ApiResult<Folder> {
    let req = validated(req)?;
    ok(state.manager.phase(scope).create_folder(&req.label).await?)
}

/// PUT /api/projects/{project_id}/phases/{phase}/folders/{id}
pub async fn rename_folder(
    State(state): State<AppState>,
    path: ItemPath<FolderId>,
    Json(req): Json<FolderRequest>,
) -> ApiResult<Folder> {
    let req = validated(req)?;
    ok(state
        .manager
        .phase(path.scope)
        .rename_folder(path.id, &req.label)
        .await?)
}

/// DELETE /api/projects/{project_id}/phases/{phase}/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    path: ItemPath<FolderId>,
) -> ApiResult<DeletedResponse> {
    let removed = state.manager.phase(path.scope).delete_folder(path.id).await?;
    ok(DeletedResponse::new("Folder deleted", removed))
}

/// PUT /api/projects/{project_id}/phases/{phase}/folders/order
pub async fn reorder_folders(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
    Json(req): Json<FolderOrderRequest>,
) -> ApiResult<Vec<FolderOrder>> {
    let req = validated(req)?;
    ok(state.manager.phase(scope).reorder_folders(&req.folder_ids).await?)
}

/// POST /api/projects/{project_id}/phases/{phase}/folders/sync
pub async fn sync_folders(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
) -> ApiResult<SyncReport> {
    ok(state.manager.phase(scope).reconcile().await?)
}
