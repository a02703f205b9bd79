//! Composition root of the phase engine.
//!
//! [`PhaseManager`] wires one instance of every service over a shared
//! [`Stores`] bundle and [`EventBus`]. [`PhaseHandle`] binds a manager to a
//! single phase so callers never pass the scope twice.

pub mod navigation;
pub mod overview;

use tokio::sync::broadcast;
use tracing::warn;

use sitehub_core::config::SyncConfig;
use sitehub_core::events::DomainEvent;
use sitehub_core::types::{BudgetItemId, FileId, FolderId, NoteId, ProjectId, RequirementId};
use sitehub_core::{AppResult, PhaseScope};
use sitehub_database::Stores;
use sitehub_entity::budget::{BudgetItem, BudgetUpdate};
use sitehub_entity::folder::{Folder, FolderOrder, PhaseFile};
use sitehub_entity::note::PhaseNote;
use sitehub_entity::phase::Phase;
use sitehub_entity::requirement::Requirement;

pub use navigation::{FolderSelection, PhaseNavigation, PhaseTab};
pub use overview::{PhaseOverview, PhaseView, TabContent};

use crate::budget::BudgetService;
use crate::events::EventBus;
use crate::folder::{FolderService, FolderSynchronizer, NewFile, SyncReport};
use crate::gate::LockGate;
use crate::note::NoteService;
use crate::phase::{PhaseCommand, PhaseDeletion, PhaseService};
use crate::reorder::{DragMove, ReorderPlan, ReorderService};
use crate::requirement::{NewRequirement, RequirementDeletion, RequirementService};

/// Every phase engine service over one store bundle.
#[derive(Debug, Clone)]
pub struct PhaseManager {
    config: SyncConfig,
    bus: EventBus,
    gate: LockGate,
    phases: PhaseService,
    requirements: RequirementService,
    reorder: ReorderService,
    sync: FolderSynchronizer,
    folders: FolderService,
    notes: NoteService,
    budget: BudgetService,
}

impl PhaseManager {
    /// Wire the services over `stores`.
    pub fn new(stores: Stores, config: SyncConfig) -> Self {
        let bus = EventBus::default();
        let gate = LockGate::new(stores.phases.clone());
        let phases = PhaseService::new(stores.clone(), bus.clone());
        let sync = FolderSynchronizer::new(
            stores.requirements.clone(),
            stores.documents.clone(),
            gate.clone(),
            bus.clone(),
        );
        let requirements = RequirementService::new(
            stores.requirements.clone(),
            stores.documents.clone(),
            gate.clone(),
            sync.clone(),
            phases.clone(),
            bus.clone(),
        );
        let reorder = ReorderService::new(
            stores.requirements.clone(),
            gate.clone(),
            sync.clone(),
            bus.clone(),
        );
        let folders = FolderService::new(stores.documents.clone(), gate.clone(), bus.clone());
        let notes = NoteService::new(stores.notes.clone(), gate.clone(), bus.clone());
        let budget = BudgetService::new(stores.budget.clone(), gate.clone(), bus.clone());

        Self {
            config,
            bus,
            gate,
            phases,
            requirements,
            reorder,
            sync,
            folders,
            notes,
            budget,
        }
    }

    /// Bind to one phase.
    pub fn phase(&self, scope: PhaseScope) -> PhaseHandle<'_> {
        PhaseHandle {
            manager: self,
            scope,
        }
    }

    /// Receive every domain event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.bus.subscribe()
    }

    /// Phases of a project, built-in and custom, in display order.
    pub async fn list_phases(&self, project_id: ProjectId) -> AppResult<Vec<Phase>> {
        self.phases.list_phases(project_id).await
    }

    /// Create a user-defined phase.
    pub async fn create_custom_phase(&self, project_id: ProjectId, display_name: &str) -> AppResult<Phase> {
        self.phases.create_custom_phase(project_id, display_name).await
    }

    /// Phase summary. Reconciles folders first when configured to; a
    /// failed reconcile is logged and the read continues.
    pub async fn overview(&self, scope: &PhaseScope) -> AppResult<PhaseOverview> {
        let phase = self.phases.get_phase(scope).await?;

        let last_sync = if self.config.reconcile_on_read && !phase.is_locked {
            match self.sync.reconcile(scope).await {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(scope = %scope, error = %e, "Folder reconcile on read failed");
                    None
                }
            }
        } else {
            None
        };

        Ok(PhaseOverview {
            read_only: phase.is_read_only(),
            phase,
            tree: self.requirements.tree(scope).await?,
            folders: self.folders.listing(scope).await?,
            note_count: self.notes.list(scope).await?.len(),
            budget: self.budget.summary(scope).await?,
            last_sync,
        })
    }

    /// The overview plus the data of the selected tab.
    pub async fn view(&self, navigation: &PhaseNavigation) -> AppResult<PhaseView> {
        let scope = &navigation.scope;
        let overview = self.overview(scope).await?;
        let content = match navigation.tab {
            PhaseTab::Requirements => TabContent::Requirements,
            PhaseTab::Files => TabContent::Files {
                folder: navigation.folder,
                files: match navigation.folder {
                    FolderSelection::All => self.folders.files(scope).await?,
                    FolderSelection::Unfiled => self.folders.files_in(scope, None).await?,
                    FolderSelection::Folder(id) => self.folders.files_in(scope, Some(id)).await?,
                },
            },
            PhaseTab::Notes => TabContent::Notes {
                notes: self.notes.list(scope).await?,
            },
            PhaseTab::Budget => TabContent::Budget {
                items: self.budget.list(scope).await?,
            },
        };
        Ok(PhaseView {
            navigation: navigation.clone(),
            overview,
            content,
        })
    }

    /// Phase records and lifecycle.
    pub fn phases(&self) -> &PhaseService {
        &self.phases
    }

    /// Requirement checklist.
    pub fn requirements(&self) -> &RequirementService {
        &self.requirements
    }

    /// Drag-and-drop moves.
    pub fn reorder(&self) -> &ReorderService {
        &self.reorder
    }

    /// Folder reconciliation.
    pub fn sync(&self) -> &FolderSynchronizer {
        &self.sync
    }

    /// Folders and files.
    pub fn folders(&self) -> &FolderService {
        &self.folders
    }

    /// Notes.
    pub fn notes(&self) -> &NoteService {
        &self.notes
    }

    /// Budget lines.
    pub fn budget(&self) -> &BudgetService {
        &self.budget
    }

    /// The lock gate.
    pub fn gate(&self) -> &LockGate {
        &self.gate
    }
}

/// A manager bound to one phase.
#[derive(Debug, Clone)]
pub struct PhaseHandle<'a> {
    manager: &'a PhaseManager,
    scope: PhaseScope,
}

impl PhaseHandle<'_> {
    /// The bound scope.
    pub fn scope(&self) -> &PhaseScope {
        &self.scope
    }

    /// Navigation state for the requirements tab of this phase.
    pub fn navigation(&self) -> PhaseNavigation {
        PhaseNavigation::new(self.scope.clone())
    }

    /// The phase record.
    pub async fn get(&self) -> AppResult<Phase> {
        self.manager.phases.get_phase(&self.scope).await
    }

    /// Phase summary.
    pub async fn overview(&self) -> AppResult<PhaseOverview> {
        self.manager.overview(&self.scope).await
    }

    /// Summary plus one tab of this phase.
    pub async fn view(&self, tab: PhaseTab, folder: FolderSelection) -> AppResult<PhaseView> {
        let navigation = PhaseNavigation {
            scope: self.scope.clone(),
            tab,
            folder,
        };
        self.manager.view(&navigation).await
    }

    /// Apply a lifecycle command.
    pub async fn transition(&self, command: PhaseCommand) -> AppResult<Phase> {
        self.manager.phases.apply(&self.scope, command).await
    }

    /// Lock the phase.
    pub async fn lock(&self) -> AppResult<Phase> {
        self.transition(PhaseCommand::Lock).await
    }

    /// Unlock the phase.
    pub async fn unlock(&self) -> AppResult<Phase> {
        self.transition(PhaseCommand::Unlock).await
    }

    /// Close the phase.
    pub async fn close(&self) -> AppResult<Phase> {
        self.transition(PhaseCommand::Close).await
    }

    /// Reopen a closed phase.
    pub async fn reopen(&self) -> AppResult<Phase> {
        self.transition(PhaseCommand::Reopen).await
    }

    /// Delete a custom phase with everything in it.
    pub async fn delete(&self) -> AppResult<PhaseDeletion> {
        self.manager.phases.delete_phase(&self.scope).await
    }

    /// Requirements sorted by `(order, created_date)`.
    pub async fn requirements(&self) -> AppResult<Vec<Requirement>> {
        self.manager.requirements.list(&self.scope).await
    }

    /// Add a requirement.
    pub async fn add_requirement(&self, input: NewRequirement) -> AppResult<Requirement> {
        self.manager.requirements.add(&self.scope, input).await
    }

    /// Check or uncheck a requirement.
    pub async fn toggle_completion(&self, id: RequirementId, completed: bool) -> AppResult<Requirement> {
        self.manager
            .requirements
            .toggle_completion(&self.scope, id, completed)
            .await
    }

    /// Edit a requirement.
    pub async fn update_requirement(
        &self,
        id: RequirementId,
        text: &str,
        is_mandatory: Option<bool>,
    ) -> AppResult<Requirement> {
        self.manager
            .requirements
            .update_text(&self.scope, id, text, is_mandatory)
            .await
    }

    /// Delete a requirement with its subs, folder, and files.
    pub async fn delete_requirement(&self, id: RequirementId) -> AppResult<RequirementDeletion> {
        self.manager.requirements.delete(&self.scope, id).await
    }

    /// Drag-and-drop move.
    pub async fn move_requirement(&self, mv: DragMove) -> AppResult<ReorderPlan> {
        self.manager.reorder.move_requirement(&self.scope, mv).await
    }

    /// Run the folder synchronizer.
    pub async fn reconcile(&self) -> AppResult<SyncReport> {
        self.manager.sync.reconcile(&self.scope).await
    }

    /// Create a custom folder.
    pub async fn create_folder(&self, label: &str) -> AppResult<Folder> {
        self.manager.folders.create_custom_folder(&self.scope, label).await
    }

    /// Rename a custom folder.
    pub async fn rename_folder(&self, folder_id: FolderId, label: &str) -> AppResult<Folder> {
        self.manager
            .folders
            .rename_folder(&self.scope, folder_id, label)
            .await
    }

    /// Delete a custom folder with its files.
    pub async fn delete_folder(&self, folder_id: FolderId) -> AppResult<u64> {
        self.manager.folders.delete_folder(&self.scope, folder_id).await
    }

    /// Set the folder order.
    pub async fn reorder_folders(&self, ordered: &[FolderId]) -> AppResult<Vec<FolderOrder>> {
        self.manager.folders.reorder_folders(&self.scope, ordered).await
    }

    /// Attach a file.
    pub async fn add_file(&self, file: NewFile) -> AppResult<PhaseFile> {
        self.manager.folders.add_file(&self.scope, file).await
    }

    /// Move a file to a folder or to unfiled.
    pub async fn move_file(&self, file_id: FileId, folder_id: Option<FolderId>) -> AppResult<PhaseFile> {
        self.manager
            .folders
            .move_file(&self.scope, file_id, folder_id)
            .await
    }

    /// Delete a file.
    pub async fn delete_file(&self, file_id: FileId) -> AppResult<()> {
        self.manager.folders.delete_file(&self.scope, file_id).await
    }

    /// Add a note.
    pub async fn add_note(&self, content: &str, author: Option<String>) -> AppResult<PhaseNote> {
        self.manager.notes.add_note(&self.scope, content, author).await
    }

    /// Delete a note.
    pub async fn delete_note(&self, note_id: NoteId) -> AppResult<()> {
        self.manager.notes.delete_note(&self.scope, note_id).await
    }

    /// Add a budget line.
    pub async fn add_budget_item(
        &self,
        description: &str,
        budgeted_cents: i64,
        actual_cents: i64,
    ) -> AppResult<BudgetItem> {
        self.manager
            .budget
            .add_item(&self.scope, description, budgeted_cents, actual_cents)
            .await
    }

    /// Update a budget line.
    pub async fn update_budget_item(&self, item_id: BudgetItemId, update: BudgetUpdate) -> AppResult<BudgetItem> {
        self.manager.budget.update_item(&self.scope, item_id, update).await
    }

    /// Delete a budget line.
    pub async fn delete_budget_item(&self, item_id: BudgetItemId) -> AppResult<()> {
        self.manager.budget.delete_item(&self.scope, item_id).await
    }
}
