//! Budget store on PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use sitehub_core::error::{AppError, ErrorKind};
use sitehub_core::types::BudgetItemId;
use sitehub_core::{AppResult, PhaseScope};
use sitehub_entity::budget::{BudgetItem, BudgetUpdate, CreateBudgetItem};

use crate::store::BudgetStore;

/// Budget lines in the `budget_items` table.
#[derive(Debug, Clone)]
pub struct PgBudgetStore {
    pool: PgPool,
}

impl PgBudgetStore {
    /// Create a new budget store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BudgetStore for PgBudgetStore {
    async fn list_budget_items(&self, scope: &PhaseScope) -> AppResult<Vec<BudgetItem>> {
        sqlx::query_as::<_, BudgetItem>(
            "SELECT * FROM budget_items WHERE project_id = $1 AND phase_name = $2 \
             ORDER BY created_date ASC",
        )
        .bind(scope.project_id)
        .bind(&scope.phase_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to list budget items", e))
    }

    async fn find_budget_item(&self, id: BudgetItemId) -> AppResult<Option<BudgetItem>> {
        sqlx::query_as::<_, BudgetItem>("SELECT * FROM budget_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to find budget item", e))
    }

    async fn create_budget_item(&self, data: &CreateBudgetItem) -> AppResult<BudgetItem> {
        sqlx::query_as::<_, BudgetItem>(
            "INSERT INTO budget_items (project_id, phase_name, description, budgeted_cents, actual_cents) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.project_id)
        .bind(&data.phase_name)
        .bind(&data.description)
        .bind(data.budgeted_cents)
        .bind(data.actual_cents)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to create budget item", e))
    }

    async fn update_budget_item(
        &self,
        id: BudgetItemId,
        update: &BudgetUpdate,
    ) -> AppResult<BudgetItem> {
        sqlx::query_as::<_, BudgetItem>(
            "UPDATE budget_items SET \
             description = COALESCE($2, description), \
             budgeted_cents = COALESCE($3, budgeted_cents), \
             actual_cents = COALESCE($4, actual_cents) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.description)
        .bind(update.budgeted_cents)
        .bind(update.actual_cents)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to update budget item", e))?
        .ok_or_else(|| AppError::not_found(format!("Budget item {id} not found")))
    }

    async fn delete_budget_item(&self, id: BudgetItemId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM budget_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to delete budget item", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_budget_in_scope(&self, scope: &PhaseScope) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM budget_items WHERE project_id = $1 AND phase_name = $2")
                .bind(scope.project_id)
                .bind(&scope.phase_name)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Store, "Failed to delete phase budget", e)
                })?;
        Ok(result.rows_affected())
    }
}
