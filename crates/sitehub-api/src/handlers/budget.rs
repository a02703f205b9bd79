//! Budget handlers.

use axum::Json;
use axum::extract::State;

use sitehub_core::types::BudgetItemId;
use sitehub_entity::budget::{BudgetItem, BudgetSummary};

use super::{ApiResult, ok};
use crate::dto::request::{CreateBudgetRequest, UpdateBudgetRequest, validated};
use crate::dto::response::{BudgetResponse, DeletedResponse};
use crate::extractors::{ItemPath, PhasePath};
use crate::state::AppState;

/// GET /api/projects/{project_id}/phases/{phase}/budget
pub async fn get_budget(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
) -> ApiResult<BudgetResponse> {
    let items = state.manager.budget().list(&scope).await?;
    let summary = BudgetSummary::from_items(&items);
    ok(BudgetResponse { items, summary })
}

/// POST /api/projects/{project_id}/phases/{phase}/budget
pub async fn add_item(
    State(state): State<AppState>,
    PhasePath(scope): PhasePath,
    Json(req): Json<CreateBudgetRequest>,
) -> ApiResult<BudgetItem> {
    let req = validated(req)?;
    ok(state
        .manager
        .phase(scope)
        .add_budget_item(&req.description, req.budgeted_cents, req.actual_cents)
        .await?)
}

/// PUT /api/projects/{project_id}/phases/{phase}/budget/{id}
pub async fn update_item(
    State(state): State<AppState>,
    path: ItemPath<BudgetItemId>,
    Json(req): Json<UpdateBudgetRequest>,
) -> ApiResult<BudgetItem> {
    let req = validated(req)?;
    ok(state
        .manager
        .phase(path.scope)
        .update_budget_item(path.id, req.into())
        .await?)
}

/// DELETE /api/projects/{project_id}/phases/{phase}/budget/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    path: ItemPath<BudgetItemId>,
) -> ApiResult<DeletedResponse> {
    state.manager.phase(path.scope).delete_budget_item(path.id).await?;
    ok(DeletedResponse::new("Budget item deleted", 0))
}
