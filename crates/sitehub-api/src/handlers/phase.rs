//! Phase listing, custom phases, views, and lifecycle handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use sitehub_core::types::ProjectId;
use sitehub_entity::phase::Phase;
use sitehub_service::manager::{FolderSelection, PhaseNavigation, PhaseTab};
use sitehub_service::phase::PhaseDeletion;
use sitehub_service::{PhaseCommand, PhaseOverview, PhaseView};

use super::{ApiResult, ok};
use crate::dto::request::{CreatePhaseRequest, ViewQuery, validated};
use crate::extractors::PhasePath;
use crate::state::AppState;

/// GET /api/projects/{project_id}/phases
pub async fn list_phases(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> ApiResult<Vec<Phase>> {
    ok(state.manager.list_phases(project_id).await?)
}

/// POST /api/projects/{project_id}/phases
pub async fn create_phase(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(req): Json<CreatePhaseRequest>,
) -> ApiResult<Phase> {
    let req = validated(req)?;
    ok(state
        .manager
        .create_custom_phase(project_id, &req.display_name)
        .await?)
}

/// GET /api/projects/{project_id}/phases/{phase}?tab=...&folder=...
pub async fn get_view(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
    Query(query): Query<ViewQuery>,
) -> ApiResult<PhaseView> {
    let tab = match query.tab.as_deref() {
        Some(tab) => tab.parse()?,
        None => PhaseTab::default(),
    };
    let navigation = PhaseNavigation {
        scope,
        tab,
        folder: FolderSelection::parse(query.folder.as_deref())?,
    };
    ok(state.manager.view(&navigation).await?)
}

/// GET /api/projects/{project_id}/phases/{phase}/overview
pub async fn get_overview(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
) -> ApiResult<PhaseOverview> {
    ok(state.manager.overview(&scope).await?)
}

/// DELETE /api/projects/{project_id}/phases/{phase}
pub async fn delete_phase(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
) -> ApiResult<PhaseDeletion> {
    ok(state.manager.phase(scope).delete().await?)
}

async fn transition(state: AppState, path: PhasePath, command: PhaseCommand) -> ApiResult<Phase> {
    ok(state.manager.phase(path.0).transition(command).await?)
}

/// POST /api/projects/{project_id}/phases/{phase}/lock
pub async fn lock_phase(State(state): State<AppState>, path: PhasePath) -> ApiResult<Phase> {
    transition(state, path, PhaseCommand::Lock).await
}

/// POST /api/projects/{project_id}/phases/{phase}/unlock
pub async fn unlock_phase(State(state): State<AppState>, path: PhasePath) -> ApiResult<Phase> {
    transition(state, path, PhaseCommand::Unlock).await
}

/// POST /api/projects/{project_id}/phases/{phase}/close
pub async fn close_phase(State(state): State<AppState>, path: PhasePath) -> ApiResult<Phase> {
    transition(state, path, PhaseCommand::Close).await
}

/// POST /api/projects/{project_id}/phases/{phase}/reopen
pub async fn reopen_phase(State(state): State<AppState>, path: PhasePath) -> ApiResult<Phase> {
    transition(state, path, PhaseCommand::Reopen).await
}

/// POST /api/projects/{project_id}/phases/{phase}/start
pub async fn start_phase(State(state): State<AppState>, path: PhasePath) -> ApiResult<Phase> {
    transition(state, path, PhaseCommand::Start).await
}
