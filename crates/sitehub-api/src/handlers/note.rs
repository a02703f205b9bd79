//! Note handlers.

use axum::Json;
use axum::extract::State;

use sitehub_core::types::NoteId;
use sitehub_entity::note::PhaseNote;

use super::{ApiResult, ok};
use crate::dto::request::{CreateNoteRequest, validated};
use crate::dto::response::DeletedResponse;
use crate::extractors::{ItemPath, PhasePath};
use crate::state::AppState;

/// GET /api/projects/{project_id}/phases/{phase}/notes
pub async fn list_notes(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
) -> ApiResult<Vec<PhaseNote>> {
    ok(state.manager.notes().list(&scope).await?)
}

/// POST /api/projects/{project_id}/phases/{phase}/notes
pub async fn add_note(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
    Json(req): Json<CreateNoteRequest>,
) -> ApiResult<PhaseNote> {
    let req = validated(req)?;
    ok(state.manager.phase(scope).add_note(&req.content, req.author).await?)
}

/// DELETE /api/projects/{project_id}/phases/{phase}/notes/{id}
pub async fn delete_note(
    State(state): State<AppState>,
    path: ItemPath<NoteId>,
) -> ApiResult<DeletedResponse> {
    state.manager.phase(path.scope).delete_note(path.id).await?;
    ok(DeletedResponse::new("Note deleted", 0))
}
