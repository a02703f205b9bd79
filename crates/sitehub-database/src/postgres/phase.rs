//! Phase store on PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use sitehub_core::error::{AppError, ErrorKind};
use sitehub_core::types::ProjectId;
use sitehub_core::{AppResult, PhaseScope};
use sitehub_entity::phase::Phase;

use crate::store::PhaseStore;

/// Phase records in the `phases` table, unique per `(project_id, phase_name)`.
#[derive(Debug, Clone)]
pub struct PgPhaseStore {
    pool: PgPool,
}

impl PgPhaseStore {
    /// Create a new phase store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhaseStore for PgPhaseStore {
    async fn list_phases(&self, project_id: ProjectId) -> AppResult<Vec<Phase>> {
        sqlx::query_as::<_, Phase>(
            "SELECT * FROM phases WHERE project_id = $1 ORDER BY sort_order ASC, created_at ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to list phases", e))
    }

    async fn find_phase(&self, scope: &PhaseScope) -> AppResult<Option<Phase>> {
        sqlx::query_as::<_, Phase>("SELECT * FROM phases WHERE project_id = $1 AND phase_name = $2")
            .bind(scope.project_id)
            .bind(&scope.phase_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to find phase", e))
    }

    async fn save_phase(&self, phase: &Phase) -> AppResult<Phase> {
        sqlx::query_as::<_, Phase>(
            "INSERT INTO phases (id, project_id, phase_name, display_name, sort_order, status, \
             progress_percent, is_locked, locked_date, completed_date, is_custom) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (project_id, phase_name) DO UPDATE SET \
             display_name = EXCLUDED.display_name, sort_order = EXCLUDED.sort_order, \
             status = EXCLUDED.status, progress_percent = EXCLUDED.progress_percent, \
             is_locked = EXCLUDED.is_locked, locked_date = EXCLUDED.locked_date, \
             completed_date = EXCLUDED.completed_date, updated_at = NOW() \
             RETURNING *",
        )
        .bind(phase.id)
        .bind(phase.project_id)
        .bind(&phase.phase_name)
        .bind(&phase.display_name)
        .bind(phase.order)
        .bind(phase.status)
        .bind(phase.progress_percent)
        .bind(phase.is_locked)
        .bind(phase.locked_date)
        .bind(phase.completed_date)
        .bind(phase.is_custom)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to save phase", e))
    }

    async fn delete_phase(&self, scope: &PhaseScope) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM phases WHERE project_id = $1 AND phase_name = $2")
            .bind(scope.project_id)
            .bind(&scope.phase_name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to delete phase", e))?;
        Ok(result.rows_affected() > 0)
    }
}
