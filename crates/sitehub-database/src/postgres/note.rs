//! Note store on PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use sitehub_core::error::{AppError, ErrorKind};
use sitehub_core::types::NoteId;
use sitehub_core::{AppResult, PhaseScope};
use sitehub_entity::note::{CreateNote, PhaseNote};

use crate::store::NoteStore;

/// Notes in the `phase_notes` table.
#[derive(Debug, Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    /// Create a new note store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn list_notes(&self, scope: &PhaseScope) -> AppResult<Vec<PhaseNote>> {
        sqlx::query_as::<_, PhaseNote>(
            "SELECT * FROM phase_notes WHERE project_id = $1 AND phase_name = $2 \
             ORDER BY created_date ASC",
        )
        .bind(scope.project_id)
        .bind(&scope.phase_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to list notes", e))
    }

    async fn find_note(&self, id: NoteId) -> AppResult<Option<PhaseNote>> {
        sqlx::query_as::<_, PhaseNote>("SELECT * FROM phase_notes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to find note", e))
    }

    async fn create_note(&self, data: &CreateNote) -> AppResult<PhaseNote> {
        sqlx::query_as::<_, PhaseNote>(
            "INSERT INTO phase_notes (project_id, phase_name, content, author) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.project_id)
        .bind(&data.phase_name)
        .bind(&data.content)
        .bind(&data.author)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to create note", e))
    }

    async fn delete_note(&self, id: NoteId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM phase_notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to delete note", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_notes_in_scope(&self, scope: &PhaseScope) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM phase_notes WHERE project_id = $1 AND phase_name = $2")
            .bind(scope.project_id)
            .bind(&scope.phase_name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to delete phase notes", e))?;
        Ok(result.rows_affected())
    }
}
