//! Folder list annotated with file counts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use sitehub_core::types::FolderId;

use super::file::PhaseFile;
use super::model::Folder;

/// A folder with the number of files inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSummary {
    /// The folder.
    #[serde(flatten)]
    pub folder: Folder,
    /// Display name (`"[Folder] " + label`).
    pub file_name: String,
    /// Interchange URL.
    pub file_url: String,
    /// Files whose `parent_folder_id` is this folder.
    pub file_count: u64,
}

/// The folder column of the files tab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderListing {
    /// Folders sorted by `(order, created_date)`.
    pub folders: Vec<FolderSummary>,
    /// Files outside every folder (including ones pointing at a missing folder).
    pub unfiled_count: u64,
    /// Total number of files in the phase.
    pub total_files: u64,
}

impl FolderListing {
    /// Build the listing from a scope's folders and files.
    pub fn build(mut folders: Vec<Folder>, files: &[PhaseFile]) -> Self {
        folders.sort_by_key(|f| (f.order, f.created_date));

        let mut counts: HashMap<FolderId, u64> = HashMap::new();
        for file in files {
            if let Some(folder_id) = file.parent_folder_id {
                *counts.entry(folder_id).or_default() += 1;
            }
        }

        let mut filed = 0;
        let folders = folders
            .into_iter()
            .map(|folder| {
                let file_count = counts.get(&folder.id).copied().unwrap_or(0);
                filed += file_count;
                FolderSummary {
                    file_name: folder.file_name(),
                    file_url: folder.file_url(),
                    file_count,
                    folder,
                }
            })
            .collect();

        let total_files = files.len() as u64;
        Self {
            folders,
            unfiled_count: total_files - filed,
            total_files,
        }
    }
}
