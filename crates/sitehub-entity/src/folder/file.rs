//! Plain files filed under a phase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sitehub_core::PhaseScope;
use sitehub_core::types::{FileId, FolderId, ProjectId};

/// A document attached to a phase, optionally inside a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PhaseFile {
    /// Unique file identifier.
    pub id: FileId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning phase.
    pub phase_name: String,
    /// Containing folder; `None` means unfiled.
    pub parent_folder_id: Option<FolderId>,
    /// Display name.
    pub file_name: String,
    /// Location of the file content.
    pub file_url: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Upload time; files list in this order.
    pub created_date: DateTime<Utc>,
}

impl PhaseFile {
    /// Check if the file sits outside every folder.
    pub fn is_unfiled(&self) -> bool {
        self.parent_folder_id.is_none()
    }

    /// Check whether the file belongs to `scope`.
    pub fn in_scope(&self, scope: &PhaseScope) -> bool {
        scope.contains(self.project_id, &self.phase_name)
    }
}

/// Data required to attach a new file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePhaseFile {
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning phase.
    pub phase_name: String,
    /// Target folder (None for unfiled).
    pub parent_folder_id: Option<FolderId>,
    /// Display name.
    pub file_name: String,
    /// Location of the file content.
    pub file_url: String,
    /// Size in bytes.
    pub size_bytes: i64,
}
