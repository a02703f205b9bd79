//! Requirement checklist handlers.

use axum::Json;
use axum::extract::State;

use sitehub_core::types::RequirementId;
use sitehub_entity::requirement::{Requirement, RequirementTree};
use sitehub_service::ReorderPlan;

use super::{ApiResult, ok};
use crate::dto::request::{
    CompletionRequest, CreateRequirementRequest, MoveRequirementRequest, UpdateRequirementRequest,
    validated,
};
use crate::dto::response::DeletedResponse;
use crate::extractors::{ItemPath, PhasePath};
use crate::state::AppState;

/// GET /api/projects/{project_id}/phases/{phase}/requirements
pub async fn get_tree(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
) -> ApiResult<RequirementTree> {
    ok(state.manager.requirements().tree(&scope).await?)
}

/// POST /api/projects/{project_id}/phases/{phase}/requirements
pub async fn create_requirement(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
    Json(req): Json<CreateRequirementRequest>,
) -> ApiResult<Requirement> {
    let req = validated(req)?;
    ok(state.manager.phase(scope).add_requirement(req.into()).await?)
}

/// PUT /api/projects/{project_id}/phases/{phase}/requirements/{id}
pub async fn update_requirement(
    State(state): State<AppState>,
    path: ItemPath<RequirementId>,
    Json(req): Json<UpdateRequirementRequest>,
) -> ApiResult<Requirement> {
    let req = validated(req)?;
    ok(state
        .manager
        .phase(path.scope)
        .update_requirement(path.id, &req.text, req.is_mandatory)
        .await?)
}

/// PUT /api/projects/{project_id}/phases/{phase}/requirements/{id}/completion
pub async fn set_completion(
    State(state): State<AppState>,
    path: ItemPath<RequirementId>,
    Json(req): Json<CompletionRequest>,
) -> ApiResult<Requirement> {
    ok(state
        .manager
        .phase(path.scope)
        .toggle_completion(path.id, req.completed)
        .await?)
}

/// PUT /api/projects/{project_id}/phases/{phase}/requirements/{id}/move
pub async fn move_requirement(
    State(state): State<AppState>,
    path: ItemPath<RequirementId>,
    Json(req): Json<MoveRequirementRequest>,
) -> ApiResult<ReorderPlan> {
    ok(state
        .manager
        .phase(path.scope)
        .move_requirement(req.into_move(path.id))
        .await?)
}

/// DELETE /api/projects/{project_id}/phases/{phase}/requirements/{id}
pub async fn delete_requirement(
    State(state): State<AppState>,
    path: ItemPath<RequirementId>,
) -> ApiResult<DeletedResponse> {
    let deletion = state.manager.phase(path.scope).delete_requirement(path.id).await?;
    ok(DeletedResponse::new("Requirement deleted", deletion.total()))
}
