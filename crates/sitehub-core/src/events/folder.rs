//! Folder and file domain events.

use serde::{Deserialize, Serialize};

use crate::types::{FileId, FolderId};

/// Events related to the phase document structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FolderEvent {
    /// The synchronizer brought folders in line with requirements.
    Reconciled {
        /// Folders created.
        created: usize,
        /// Folders relabeled.
        relabeled: usize,
        /// Folders deleted (orphans and duplicates).
        deleted: usize,
    },
    /// A custom folder was created.
    CustomCreated {
        /// The folder ID.
        folder_id: FolderId,
        /// The folder label.
        label: String,
    },
    /// A folder was renamed.
    Renamed {
        /// The folder ID.
        folder_id: FolderId,
        /// The new label.
        label: String,
    },
    /// A folder was deleted together with its files.
    Deleted {
        /// The folder ID.
        folder_id: FolderId,
        /// Number of files removed with it.
        removed_files: usize,
    },
    /// Folders were reordered.
    Reordered {
        /// Number of order assignments written.
        assignments: usize,
    },
    /// A file was added to the phase.
    FileAdded {
        /// The file ID.
        file_id: FileId,
        /// Target folder, `None` for unfiled.
        folder_id: Option<FolderId>,
    },
    /// A file was moved between folders.
    FileMoved {
        /// The file ID.
        file_id: FileId,
        /// New folder, `None` for unfiled.
        folder_id: Option<FolderId>,
    },
    /// A file was deleted.
    FileDeleted {
        /// The file ID.
        file_id: FileId,
    },
}

impl FolderEvent {
    /// Short machine name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reconciled { .. } => "reconciled",
            Self::CustomCreated { .. } => "custom_created",
            Self::Renamed { .. } => "renamed",
            Self::Deleted { .. } => "deleted",
            Self::Reordered { .. } => "reordered",
            Self::FileAdded { .. } => "file_added",
            Self::FileMoved { .. } => "file_moved",
            Self::FileDeleted { .. } => "file_deleted",
        }
    }
}
