//! File handlers.

use axum::Json;
use axum::extract::{Query, State};

use sitehub_core::types::FileId;
use sitehub_entity::folder::PhaseFile;
use sitehub_service::FolderSelection;

use super::{ApiResult, ok};
use crate::dto::request::{CreateFileRequest, MoveFileRequest, ViewQuery, validated};
use crate::dto::response::DeletedResponse;
use crate::extractors::{ItemPath, PhasePath};
use crate::state::AppState;

/// GET /api/projects/{project_id}/phases/{phase}/files?folder=...
pub async fn list_files(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
    Query(query): Query<ViewQuery>,
) -> ApiResult<Vec<PhaseFile>> {
    let folders = state.manager.folders();
    let files = match FolderSelection::parse(query.folder.as_deref())? {
        FolderSelection::All => folders.files(&scope).await?,
        FolderSelection::Unfiled => folders.files_in(&scope, None).await?,
        FolderSelection::Folder(id) => folders.files_in(&scope, Some(id)).await?,
    };
    ok(files)
}

/// POST /api/projects/{project_id}/phases/{phase}/files
pub async fn add_file(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
    Json(req): Json<CreateFileRequest>,
) -> ApiResult<PhaseFile> {
    let req = validated(req)?;
    ok(state.manager.phase(scope).add_file(req.into()).await?)
}

/// PUT /api/projects/{project_id}/phases/{phase}/files/{id}/move
pub async fn move_file(
    State(state): State<AppState>,
    path: ItemPath<FileId>,
    Json(req): Json<MoveFileRequest>,
) -> ApiResult<PhaseFile> {
    ok(state
        .manager
        .phase(path.scope)
        .move_file(path.id, req.folder_id)
        .await?)
}

/// DELETE /api/projects/{project_id}/phases/{phase}/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    path: ItemPath<FileId>,
) -> ApiResult<DeletedResponse> {
    state.manager.phase(path.scope).delete_file(path.id).await?;
    ok(DeletedResponse::new("File deleted", 0))
}
