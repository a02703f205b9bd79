//! Requirement store on PostgreSQL.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use sitehub_core::error::{AppError, ErrorKind};
use sitehub_core::types::RequirementId;
use sitehub_core::{AppResult, PhaseScope};
use sitehub_entity::requirement::{
    CreateRequirement, OrderAssignment, Requirement, RequirementStatus,
};

use crate::store::RequirementStore;

/// Requirement records in the `requirements` table.
#[derive(Debug, Clone)]
pub struct PgRequirementStore {
    pool: PgPool,
}

impl PgRequirementStore {
    /// Create a new requirement store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequirementStore for PgRequirementStore {
    async fn list_requirements(&self, scope: &PhaseScope) -> AppResult<Vec<Requirement>> {
        sqlx::query_as::<_, Requirement>(
            "SELECT * FROM requirements WHERE project_id = $1 AND phase_name = $2 \
             ORDER BY sort_order ASC, created_date ASC",
        )
        .bind(scope.project_id)
        .bind(&scope.phase_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to list requirements", e))
    }

    async fn find_requirement(&self, id: RequirementId) -> AppResult<Option<Requirement>> {
        sqlx::query_as::<_, Requirement>("SELECT * FROM requirements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to find requirement", e))
    }

    async fn create_requirement(&self, data: &CreateRequirement) -> AppResult<Requirement> {
        sqlx::query_as::<_, Requirement>(
            "INSERT INTO requirements \
             (project_id, phase_name, parent_requirement_id, requirement_text, is_mandatory, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.project_id)
        .bind(&data.phase_name)
        .bind(data.parent_requirement_id)
        .bind(&data.requirement_text)
        .bind(data.is_mandatory)
        .bind(data.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to create requirement", e))
    }

    async fn update_requirement_text(
        &self,
        id: RequirementId,
        text: &str,
        is_mandatory: bool,
    ) -> AppResult<Requirement> {
        sqlx::query_as::<_, Requirement>(
            "UPDATE requirements SET requirement_text = $2, is_mandatory = $3 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(text)
        .bind(is_mandatory)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to update requirement", e))?
        .ok_or_else(|| AppError::not_found(format!("Requirement {id} not found")))
    }

    async fn set_requirement_completion(
        &self,
        id: RequirementId,
        status: RequirementStatus,
        completed_date: Option<NaiveDate>,
    ) -> AppResult<Requirement> {
        sqlx::query_as::<_, Requirement>(
            "UPDATE requirements SET status = $2, completed_date = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(completed_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to update requirement status", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Requirement {id} not found")))
    }

    async fn apply_ordering(&self, assignments: &[OrderAssignment]) -> AppResult<()> {
        if assignments.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to begin ordering transaction", e)
        })?;

        for assignment in assignments {
            let result = sqlx::query(
                "UPDATE requirements SET parent_requirement_id = $2, sort_order = $3 WHERE id = $1",
            )
            .bind(assignment.requirement_id)
            .bind(assignment.parent_requirement_id)
            .bind(assignment.order)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to write requirement order", e)
            })?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!(
                    "Requirement {} not found",
                    assignment.requirement_id
                )));
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to commit requirement order", e)
        })
    }

    async fn delete_requirement(&self, id: RequirementId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM requirements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to delete requirement", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_requirements_in_scope(&self, scope: &PhaseScope) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM requirements WHERE project_id = $1 AND phase_name = $2")
            .bind(scope.project_id)
            .bind(&scope.phase_name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to delete phase requirements", e)
            })?;
        Ok(result.rows_affected())
    }
}
