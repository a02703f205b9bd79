//! Folder and file store on PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use sitehub_core::error::{AppError, ErrorKind};
use sitehub_core::types::{FileId, FolderId, ProjectId, RequirementId};
use sitehub_core::{AppResult, PhaseScope};
use sitehub_entity::folder::{
    CreateFolder, CreatePhaseFile, Folder, FolderKind, FolderOrder, PhaseFile,
};

use crate::store::DocumentStore;

/// Row shape of the `folders` table.
///
/// Exactly one of `requirement_id` and `custom_key` is set.
#[derive(Debug, Clone, FromRow)]
struct FolderRow {
    id: FolderId,
    project_id: ProjectId,
    phase_name: String,
    requirement_id: Option<RequirementId>,
    custom_key: Option<String>,
    label: String,
    sort_order: i32,
    created_date: DateTime<Utc>,
}

impl TryFrom<FolderRow> for Folder {
    type Error = AppError;

    fn try_from(row: FolderRow) -> Result<Self, Self::Error> {
        let kind = match (row.requirement_id, row.custom_key) {
            (Some(requirement_id), None) => FolderKind::Requirement { requirement_id },
            (None, Some(custom_id)) => FolderKind::Custom { custom_id },
            _ => {
                return Err(AppError::internal(format!(
                    "Folder {} must have exactly one of requirement_id and custom_key",
                    row.id
                )));
            }
        };
        Ok(Folder {
            id: row.id,
            project_id: row.project_id,
            phase_name: row.phase_name,
            kind,
            label: row.label,
            order: row.sort_order,
            created_date: row.created_date,
        })
    }
}

fn split_kind(kind: &FolderKind) -> (Option<RequirementId>, Option<&str>) {
    match kind {
        FolderKind::Requirement { requirement_id } => (Some(*requirement_id), None),
        FolderKind::Custom { custom_id } => (None, Some(custom_id.as_str())),
    }
}

/// Folders in `folders`, files in `phase_files`.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list_folders(&self, scope: &PhaseScope) -> AppResult<Vec<Folder>> {
        let rows = sqlx::query_as::<_, FolderRow>(
            "SELECT * FROM folders WHERE project_id = $1 AND phase_name = $2 \
             ORDER BY sort_order ASC, created_date ASC",
        )
        .bind(scope.project_id)
        .bind(&scope.phase_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to list folders", e))?;

        rows.into_iter().map(Folder::try_from).collect()
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, FolderRow>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to find folder", e))?
            .map(Folder::try_from)
            .transpose()
    }

    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        let (requirement_id, custom_key) = split_kind(&data.kind);
        sqlx::query_as::<_, FolderRow>(
            "INSERT INTO folders (project_id, phase_name, requirement_id, custom_key, label, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.project_id)
        .bind(&data.phase_name)
        .bind(requirement_id)
        .bind(custom_key)
        .bind(&data.label)
        .bind(data.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to create folder", e))?
        .try_into()
    }

    async fn rename_folder(&self, id: FolderId, label: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, FolderRow>("UPDATE folders SET label = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(label)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to rename folder", e))?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?
            .try_into()
    }

    async fn apply_folder_ordering(&self, orders: &[FolderOrder]) -> AppResult<()> {
        if orders.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to begin ordering transaction", e)
        })?;

        for order in orders {
            let result = sqlx::query("UPDATE folders SET sort_order = $2 WHERE id = $1")
                .bind(order.folder_id)
                .bind(order.order)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Store, "Failed to write folder order", e)
                })?;
            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!(
                    "Folder {} not found",
                    order.folder_id
                )));
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to commit folder order", e)
        })
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to delete folder", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_files(&self, scope: &PhaseScope) -> AppResult<Vec<PhaseFile>> {
        sqlx::query_as::<_, PhaseFile>(
            "SELECT * FROM phase_files WHERE project_id = $1 AND phase_name = $2 \
             ORDER BY created_date ASC",
        )
        .bind(scope.project_id)
        .bind(&scope.phase_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to list files", e))
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<PhaseFile>> {
        sqlx::query_as::<_, PhaseFile>("SELECT * FROM phase_files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to find file", e))
    }

    async fn create_file(&self, data: &CreatePhaseFile) -> AppResult<PhaseFile> {
        sqlx::query_as::<_, PhaseFile>(
            "INSERT INTO phase_files \
             (project_id, phase_name, parent_folder_id, file_name, file_url, size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.project_id)
        .bind(&data.phase_name)
        .bind(data.parent_folder_id)
        .bind(&data.file_name)
        .bind(&data.file_url)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to create file", e))
    }

    async fn move_file(&self, id: FileId, folder_id: Option<FolderId>) -> AppResult<PhaseFile> {
        sqlx::query_as::<_, PhaseFile>(
            "UPDATE phase_files SET parent_folder_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to move file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn move_files(&self, from: FolderId, to: Option<FolderId>) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE phase_files SET parent_folder_id = $2 WHERE parent_folder_id = $1")
                .bind(from)
                .bind(to)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Store, "Failed to move folder contents", e)
                })?;
        Ok(result.rows_affected())
    }

    async fn delete_file(&self, id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM phase_files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_files_in_folder(&self, folder_id: FolderId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM phase_files WHERE parent_folder_id = $1")
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to delete folder contents", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn delete_documents_in_scope(&self, scope: &PhaseScope) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to begin delete transaction", e)
        })?;

        let files = sqlx::query("DELETE FROM phase_files WHERE project_id = $1 AND phase_name = $2")
            .bind(scope.project_id)
            .bind(&scope.phase_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to delete phase files", e))?;

        let folders = sqlx::query("DELETE FROM folders WHERE project_id = $1 AND phase_name = $2")
            .bind(scope.project_id)
            .bind(&scope.phase_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to delete phase folders", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Store, "Failed to commit phase document delete", e)
        })?;
        Ok(files.rows_affected() + folders.rows_affected())
    }
}
