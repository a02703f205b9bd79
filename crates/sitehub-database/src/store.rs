//! Async record store traits, one per collection.
//!
//! Every listing is an exact match on the phase scope. Listings come back
//! sorted: requirements and folders by `(order, created_date)`, files,
//! notes and budget lines by creation time, phases by `order`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use sitehub_core::config::{DatabaseConfig, StoreBackend};
use sitehub_core::types::{
    BudgetItemId, FileId, FolderId, NoteId, ProjectId, RequirementId,
};
use sitehub_core::{AppResult, PhaseScope};
use sitehub_entity::budget::{BudgetItem, BudgetUpdate, CreateBudgetItem};
use sitehub_entity::folder::{CreateFolder, CreatePhaseFile, Folder, FolderOrder, PhaseFile};
use sitehub_entity::note::{CreateNote, PhaseNote};
use sitehub_entity::phase::Phase;
use sitehub_entity::requirement::{
    CreateRequirement, OrderAssignment, Requirement, RequirementStatus,
};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::postgres::{
    PgBudgetStore, PgDocumentStore, PgNoteStore, PgPhaseStore, PgRequirementStore,
};

/// Requirement records.
#[async_trait]
pub trait RequirementStore: Send + Sync {
    /// All requirements of a scope.
    async fn list_requirements(&self, scope: &PhaseScope) -> AppResult<Vec<Requirement>>;

    /// Find a requirement by ID.
    async fn find_requirement(&self, id: RequirementId) -> AppResult<Option<Requirement>>;

    /// Create a requirement; the store assigns `id` and `created_date`.
    async fn create_requirement(&self, data: &CreateRequirement) -> AppResult<Requirement>;

    /// Replace the text and mandatory flag.
    async fn update_requirement_text(
        &self,
        id: RequirementId,
        text: &str,
        is_mandatory: bool,
    ) -> AppResult<Requirement>;

    /// Set the completion status and date together.
    async fn set_requirement_completion(
        &self,
        id: RequirementId,
        status: RequirementStatus,
        completed_date: Option<NaiveDate>,
    ) -> AppResult<Requirement>;

    /// Write parent and order of several requirements as one batch.
    ///
    /// Either every assignment lands or none does.
    async fn apply_ordering(&self, assignments: &[OrderAssignment]) -> AppResult<()>;

    /// Delete one requirement. Returns whether it existed.
    async fn delete_requirement(&self, id: RequirementId) -> AppResult<bool>;

    /// Delete every requirement of a scope.
    async fn delete_requirements_in_scope(&self, scope: &PhaseScope) -> AppResult<u64>;
}

/// Folder and file records.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All folders of a scope.
    async fn list_folders(&self, scope: &PhaseScope) -> AppResult<Vec<Folder>>;

    /// Find a folder by ID.
    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Create a folder.
    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Change a folder's label.
    async fn rename_folder(&self, id: FolderId, label: &str) -> AppResult<Folder>;

    /// Write the order of several folders as one batch.
    async fn apply_folder_ordering(&self, orders: &[FolderOrder]) -> AppResult<()>;

    /// Delete one folder record (files are left untouched).
    async fn delete_folder(&self, id: FolderId) -> AppResult<bool>;

    /// All files of a scope.
    async fn list_files(&self, scope: &PhaseScope) -> AppResult<Vec<PhaseFile>>;

    /// Find a file by ID.
    async fn find_file(&self, id: FileId) -> AppResult<Option<PhaseFile>>;

    /// Attach a file.
    async fn create_file(&self, data: &CreatePhaseFile) -> AppResult<PhaseFile>;

    /// Move one file to a folder, or to unfiled with `None`.
    async fn move_file(&self, id: FileId, folder_id: Option<FolderId>) -> AppResult<PhaseFile>;

    /// Move every file of `from` to `to`. Returns the number moved.
    async fn move_files(&self, from: FolderId, to: Option<FolderId>) -> AppResult<u64>;

    /// Delete one file.
    async fn delete_file(&self, id: FileId) -> AppResult<bool>;

    /// Delete every file inside a folder.
    async fn delete_files_in_folder(&self, folder_id: FolderId) -> AppResult<u64>;

    /// Delete every folder and file of a scope.
    async fn delete_documents_in_scope(&self, scope: &PhaseScope) -> AppResult<u64>;
}

/// Stored phase records. Built-in phases without a record are implicit.
#[async_trait]
pub trait PhaseStore: Send + Sync {
    /// Stored phases of a project.
    async fn list_phases(&self, project_id: ProjectId) -> AppResult<Vec<Phase>>;

    /// The stored record for a scope, if any.
    async fn find_phase(&self, scope: &PhaseScope) -> AppResult<Option<Phase>>;

    /// Insert or replace the record for the phase's scope.
    async fn save_phase(&self, phase: &Phase) -> AppResult<Phase>;

    /// Delete the record for a scope.
    async fn delete_phase(&self, scope: &PhaseScope) -> AppResult<bool>;
}

/// Phase notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Notes of a scope, oldest first.
    async fn list_notes(&self, scope: &PhaseScope) -> AppResult<Vec<PhaseNote>>;

    /// Find a note by ID.
    async fn find_note(&self, id: NoteId) -> AppResult<Option<PhaseNote>>;

    /// Create a note.
    async fn create_note(&self, data: &CreateNote) -> AppResult<PhaseNote>;

    /// Delete a note.
    async fn delete_note(&self, id: NoteId) -> AppResult<bool>;

    /// Delete every note of a scope.
    async fn delete_notes_in_scope(&self, scope: &PhaseScope) -> AppResult<u64>;
}

/// Phase budget lines.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Budget lines of a scope, oldest first.
    async fn list_budget_items(&self, scope: &PhaseScope) -> AppResult<Vec<BudgetItem>>;

    /// Find a budget line by ID.
    async fn find_budget_item(&self, id: BudgetItemId) -> AppResult<Option<BudgetItem>>;

    /// Add a budget line.
    async fn create_budget_item(&self, data: &CreateBudgetItem) -> AppResult<BudgetItem>;

    /// Apply a partial update.
    async fn update_budget_item(&self, id: BudgetItemId, update: &BudgetUpdate) -> AppResult<BudgetItem>;

    /// Delete a budget line.
    async fn delete_budget_item(&self, id: BudgetItemId) -> AppResult<bool>;

    /// Delete every budget line of a scope.
    async fn delete_budget_in_scope(&self, scope: &PhaseScope) -> AppResult<u64>;
}

/// One handle per collection, shared by every service.
#[derive(Clone)]
pub struct Stores {
    /// Requirement records.
    pub requirements: Arc<dyn RequirementStore>,
    /// Folder and file records.
    pub documents: Arc<dyn DocumentStore>,
    /// Phase records.
    pub phases: Arc<dyn PhaseStore>,
    /// Notes.
    pub notes: Arc<dyn NoteStore>,
    /// Budget lines.
    pub budget: Arc<dyn BudgetStore>,
}

impl Stores {
    /// Every collection backed by one shared [`MemoryStore`].
    pub fn memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Every collection backed by the given [`MemoryStore`].
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            requirements: store.clone(),
            documents: store.clone(),
            phases: store.clone(),
            notes: store.clone(),
            budget: store,
        }
    }

    /// Every collection backed by PostgreSQL.
    pub fn postgres(pool: &DatabasePool) -> Self {
        let pool = pool.pool().clone();
        Self {
            requirements: Arc::new(PgRequirementStore::new(pool.clone())),
            documents: Arc::new(PgDocumentStore::new(pool.clone())),
            phases: Arc::new(PgPhaseStore::new(pool.clone())),
            notes: Arc::new(PgNoteStore::new(pool.clone())),
            budget: Arc::new(PgBudgetStore::new(pool)),
        }
    }

    /// Build the stores selected by configuration, connecting and
    /// migrating PostgreSQL when it is the backend.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            StoreBackend::Memory => {
                info!("Using in-memory record store");
                Ok(Self::memory())
            }
            StoreBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(&pool))
            }
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
