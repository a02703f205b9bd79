use async_trait::async_trait;
use chrono::Utc;

use sitehub_core::types::{FileId, FolderId};
use sitehub_core::{AppError, AppResult, PhaseScope};
use sitehub_entity::folder::{CreateFolder, CreatePhaseFile, Folder, FolderOrder, PhaseFile};

use super::{MemoryStore, remove_where};
use crate::store::DocumentStore;

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_folders(&self, scope: &PhaseScope) -> AppResult<Vec<Folder>> {
        let state = self.read().await;
        let mut folders: Vec<Folder> = state
            .folders
            .iter()
            .filter(|f| f.in_scope(scope))
            .cloned()
            .collect();
        folders.sort_by_key(|f| (f.order, f.created_date));
        Ok(folders)
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        let state = self.read().await;
        Ok(state.folders.iter().find(|f| f.id == id).cloned())
    }

    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        let folder = Folder {
            id: FolderId::new(),
            project_id: data.project_id,
            phase_name: data.phase_name.clone(),
            kind: data.kind.clone(),
            label: data.label.clone(),
            order: data.order,
            created_date: Utc::now(),
        };
        self.write().await.folders.push(folder.clone());
        self.record_write();
        Ok(folder)
    }

    async fn rename_folder(&self, id: FolderId, label: &str) -> AppResult<Folder> {
        let mut state = self.write().await;
        let folder = state
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.label = label.to_string();
        let updated = folder.clone();
        self.record_write();
        Ok(updated)
    }

    async fn apply_folder_ordering(&self, orders: &[FolderOrder]) -> AppResult<()> {
        if orders.is_empty() {
            return Ok(());
        }
        let mut state = self.write().await;
        if let Some(missing) = orders
            .iter()
            .find(|o| !state.folders.iter().any(|f| f.id == o.folder_id))
        {
            return Err(AppError::not_found(format!(
                "Folder {} not found",
                missing.folder_id
            )));
        }
        for order in orders {
            if let Some(folder) = state.folders.iter_mut().find(|f| f.id == order.folder_id) {
                folder.order = order.order;
            }
        }
        self.record_write();
        Ok(())
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        let removed = remove_where(&mut self.write().await.folders, |f| f.id == id);
        if removed > 0 {
            self.record_write();
        }
        Ok(removed > 0)
    }

    async fn list_files(&self, scope: &PhaseScope) -> AppResult<Vec<PhaseFile>> {
        let state = self.read().await;
        let mut files: Vec<PhaseFile> = state
            .files
            .iter()
            .filter(|f| f.in_scope(scope))
            .cloned()
            .collect();
        files.sort_by_key(|f| f.created_date);
        Ok(files)
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<PhaseFile>> {
        let state = self.read().await;
        Ok(state.files.iter().find(|f| f.id == id).cloned())
    }

    async fn create_file(&self, data: &CreatePhaseFile) -> AppResult<PhaseFile> {
        let file = PhaseFile {
            id: FileId::new(),
            project_id: data.project_id,
            phase_name: data.phase_name.clone(),
            parent_folder_id: data.parent_folder_id,
            file_name: data.file_name.clone(),
            file_url: data.file_url.clone(),
            size_bytes: data.size_bytes,
            created_date: Utc::now(),
        };
        self.write().await.files.push(file.clone());
        self.record_write();
        Ok(file)
    }

    async fn move_file(&self, id: FileId, folder_id: Option<FolderId>) -> AppResult<PhaseFile> {
        let mut state = self.write().await;
        let file = state
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        file.parent_folder_id = folder_id;
        let updated = file.clone();
        self.record_write();
        Ok(updated)
    }

    async fn move_files(&self, from: FolderId, to: Option<FolderId>) -> AppResult<u64> {
        let mut state = self.write().await;
        let mut moved = 0;
        for file in state.files.iter_mut().filter(|f| f.parent_folder_id == Some(from)) {
            file.parent_folder_id = to;
            moved += 1;
        }
        if moved > 0 {
            self.record_write();
        }
        Ok(moved)
    }

    async fn delete_file(&self, id: FileId) -> AppResult<bool> {
        let removed = remove_where(&mut self.write().await.files, |f| f.id == id);
        if removed > 0 {
            self.record_write();
        }
        Ok(removed > 0)
    }

    async fn delete_files_in_folder(&self, folder_id: FolderId) -> AppResult<u64> {
        let removed = remove_where(&mut self.write().await.files, |f| {
            f.parent_folder_id == Some(folder_id)
        });
        if removed > 0 {
            self.record_write();
        }
        Ok(removed)
    }

    async fn delete_documents_in_scope(&self, scope: &PhaseScope) -> AppResult<u64> {
        let mut state = self.write().await;
        let removed = remove_where(&mut state.files, |f| f.in_scope(scope))
            + remove_where(&mut state.folders, |f| f.in_scope(scope));
        if removed > 0 {
            self.record_write();
        }
        Ok(removed)
    }
}
