//! Custom folders, folder ordering, and file filing.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use sitehub_core::events::FolderEvent;
use sitehub_core::types::{FileId, FolderId};
use sitehub_core::{AppError, AppResult, PhaseScope};
use sitehub_database::DocumentStore;
use sitehub_entity::folder::{
    CreateFolder, CreatePhaseFile, Folder, FolderKind, FolderListing, FolderOrder, PhaseFile,
};

use crate::events::EventBus;
use crate::gate::LockGate;

/// A file to attach to a phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFile {
    /// Target folder (`None` for unfiled).
    pub folder_id: Option<FolderId>,
    /// Display name.
    pub file_name: String,
    /// Location of the content.
    pub file_url: String,
    /// Size in bytes.
    pub size_bytes: i64,
}

/// Manages the folders and files of a phase.
///
/// Requirement folders are owned by the synchronizer; this service only
/// creates, renames, and deletes custom folders.
#[derive(Clone)]
pub struct FolderService {
    documents: Arc<dyn DocumentStore>,
    gate: LockGate,
    bus: EventBus,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(documents: Arc<dyn DocumentStore>, gate: LockGate, bus: EventBus) -> Self {
        Self {
            documents,
            gate,
            bus,
        }
    }

    /// Folders with file counts.
    pub async fn listing(&self, scope: &PhaseScope) -> AppResult<FolderListing> {
        let folders = self.documents.list_folders(scope).await?;
        let files = self.documents.list_files(scope).await?;
        Ok(FolderListing::build(folders, &files))
    }

    /// Every file in the phase, in upload order.
    pub async fn files(&self, scope: &PhaseScope) -> AppResult<Vec<PhaseFile>> {
        self.documents.list_files(scope).await
    }

    /// Files directly in `folder_id`, or unfiled files for `None`.
    ///
    /// Files pointing at a folder that no longer exists count as unfiled.
    pub async fn files_in(
        &self,
        scope: &PhaseScope,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<PhaseFile>> {
        let files = self.documents.list_files(scope).await?;
        match folder_id {
            Some(id) => {
                self.scoped_folder(scope, id).await?;
                Ok(files
                    .into_iter()
                    .filter(|f| f.parent_folder_id == Some(id))
                    .collect())
            }
            None => {
                let folders: HashSet<FolderId> = self
                    .documents
                    .list_folders(scope)
                    .await?
                    .into_iter()
                    .map(|f| f.id)
                    .collect();
                Ok(files
                    .into_iter()
                    .filter(|f| f.parent_folder_id.is_none_or(|p| !folders.contains(&p)))
                    .collect())
            }
        }
    }

    /// Create a user folder at the end of the folder list.
    pub async fn create_custom_folder(&self, scope: &PhaseScope, label: &str) -> AppResult<Folder> {
        let label = label.trim();
        if label.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        self.gate.ensure_unlocked(scope).await?;

        let order = self.documents.list_folders(scope).await?.len() as i32;
        let folder = self
            .documents
            .create_folder(&CreateFolder {
                project_id: scope.project_id,
                phase_name: scope.phase_name.clone(),
                kind: FolderKind::new_custom(),
                label: label.to_string(),
                order,
            })
            .await?;

        info!(scope = %scope, folder_id = %folder.id, label = %folder.label, "Custom folder created");
        self.bus.publish(
            scope,
            FolderEvent::CustomCreated {
                folder_id: folder.id,
                label: folder.label.clone(),
            },
        );
        Ok(folder)
    }

    /// Rename a custom folder.
    pub async fn rename_folder(
        &self,
        scope: &PhaseScope,
        folder_id: FolderId,
        label: &str,
    ) -> AppResult<Folder> {
        let label = label.trim();
        if label.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        let folder = self.scoped_folder(scope, folder_id).await?;
        ensure_custom(&folder, "renamed")?;
        self.gate.ensure_unlocked(scope).await?;

        let folder = self.documents.rename_folder(folder_id, label).await?;
        info!(scope = %scope, folder_id = %folder_id, label = %label, "Folder renamed");
        self.bus.publish(
            scope,
            FolderEvent::Renamed {
                folder_id,
                label: folder.label.clone(),
            },
        );
        Ok(folder)
    }

    /// Delete a custom folder and the files inside it.
    pub async fn delete_folder(&self, scope: &PhaseScope, folder_id: FolderId) -> AppResult<u64> {
        let folder = self.scoped_folder(scope, folder_id).await?;
        ensure_custom(&folder, "deleted")?;
        self.gate.ensure_unlocked(scope).await?;

        let removed_files = self.documents.delete_files_in_folder(folder_id).await?;
        self.documents.delete_folder(folder_id).await?;

        info!(scope = %scope, folder_id = %folder_id, removed_files, "Folder deleted");
        self.bus.publish(
            scope,
            FolderEvent::Deleted {
                folder_id,
                removed_files: removed_files as usize,
            },
        );
        Ok(removed_files)
    }

    /// Put the folders of a scope in the given order.
    ///
    /// `ordered` must list every folder of the scope exactly once. Only
    /// folders whose position changes are written, in one batch.
    pub async fn reorder_folders(
        &self,
        scope: &PhaseScope,
        ordered: &[FolderId],
    ) -> AppResult<Vec<FolderOrder>> {
        self.gate.ensure_unlocked(scope).await?;
        let folders = self.documents.list_folders(scope).await?;

        let expected: HashSet<FolderId> = folders.iter().map(|f| f.id).collect();
        let given: HashSet<FolderId> = ordered.iter().copied().collect();
        if given.len() != ordered.len() || given != expected {
            return Err(AppError::validation(
                "Folder order must list every folder of the phase exactly once",
            ));
        }

        let assignments: Vec<FolderOrder> = ordered
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let index = index as i32;
                folders
                    .iter()
                    .find(|f| f.id == *id && f.order != index)
                    .map(|f| FolderOrder {
                        folder_id: f.id,
                        order: index,
                    })
            })
            .collect();

        if assignments.is_empty() {
            return Ok(assignments);
        }
        self.documents.apply_folder_ordering(&assignments).await?;

        info!(scope = %scope, assignments = assignments.len(), "Folders reordered");
        self.bus.publish(
            scope,
            FolderEvent::Reordered {
                assignments: assignments.len(),
            },
        );
        Ok(assignments)
    }

    /// Attach a file to the phase.
    pub async fn add_file(&self, scope: &PhaseScope, file: NewFile) -> AppResult<PhaseFile> {
        if file.file_name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if file.size_bytes < 0 {
            return Err(AppError::validation("File size cannot be negative"));
        }
        if let Some(folder_id) = file.folder_id {
            self.scoped_folder(scope, folder_id).await?;
        }
        self.gate.ensure_unlocked(scope).await?;

        let created = self
            .documents
            .create_file(&CreatePhaseFile {
                project_id: scope.project_id,
                phase_name: scope.phase_name.clone(),
                parent_folder_id: file.folder_id,
                file_name: file.file_name.trim().to_string(),
                file_url: file.file_url,
                size_bytes: file.size_bytes,
            })
            .await?;

        info!(scope = %scope, file_id = %created.id, file_name = %created.file_name, "File added");
        self.bus.publish(
            scope,
            FolderEvent::FileAdded {
                file_id: created.id,
                folder_id: created.parent_folder_id,
            },
        );
        Ok(created)
    }

    /// Move a file into a folder, or to unfiled with `None`.
    pub async fn move_file(
        &self,
        scope: &PhaseScope,
        file_id: FileId,
        folder_id: Option<FolderId>,
    ) -> AppResult<PhaseFile> {
        let file = self.scoped_file(scope, file_id).await?;
        if let Some(id) = folder_id {
            self.scoped_folder(scope, id).await?;
        }
        self.gate.ensure_unlocked(scope).await?;

        if file.parent_folder_id == folder_id {
            return Ok(file);
        }
        let moved = self.documents.move_file(file_id, folder_id).await?;
        info!(scope = %scope, file_id = %file_id, "File moved");
        self.bus.publish(scope, FolderEvent::FileMoved { file_id, folder_id });
        Ok(moved)
    }

    /// Delete a file.
    pub async fn delete_file(&self, scope: &PhaseScope, file_id: FileId) -> AppResult<()> {
        self.scoped_file(scope, file_id).await?;
        self.gate.ensure_unlocked(scope).await?;

        self.documents.delete_file(file_id).await?;
        info!(scope = %scope, file_id = %file_id, "File deleted");
        self.bus.publish(scope, FolderEvent::FileDeleted { file_id });
        Ok(())
    }

    async fn scoped_folder(&self, scope: &PhaseScope, folder_id: FolderId) -> AppResult<Folder> {
        self.documents
            .find_folder(folder_id)
            .await?
            .filter(|f| f.in_scope(scope))
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    async fn scoped_file(&self, scope: &PhaseScope, file_id: FileId) -> AppResult<PhaseFile> {
        self.documents
            .find_file(file_id)
            .await?
            .filter(|f| f.in_scope(scope))
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }
}

fn ensure_custom(folder: &Folder, action: &str) -> AppResult<()> {
    if folder.kind.is_custom() {
        return Ok(());
    }
    Err(AppError::validation(format!(
        "Requirement folder '{}' follows its requirement and cannot be {action}",
        folder.label
    )))
}

impl std::fmt::Debug for FolderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderService").finish_non_exhaustive()
    }
}
