//! Requirement tree: create, complete, edit, delete, and list.
//!
//! The tree has two levels. A new requirement's parent must be a root of
//! the same scope; this is checked here on every write rather than left
//! to callers.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sitehub_core::events::RequirementEvent;
use sitehub_core::types::RequirementId;
use sitehub_core::{AppError, AppResult, PhaseScope};
use sitehub_database::{DocumentStore, RequirementStore};
use sitehub_entity::requirement::{
    CreateRequirement, Requirement, RequirementStatus, RequirementTree,
};

use crate::events::EventBus;
use crate::folder::FolderSynchronizer;
use crate::gate::LockGate;
use crate::phase::PhaseService;
use crate::reorder::close_gap;

/// Input for a new checklist item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequirement {
    /// Checklist text.
    pub text: String,
    /// Whether the item must be completed before close-out.
    #[serde(default)]
    pub is_mandatory: bool,
    /// Root to nest under; `None` creates a root requirement.
    #[serde(default)]
    pub parent_id: Option<RequirementId>,
}

/// What a requirement delete removed besides the requirement itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementDeletion {
    /// Sub-requirements removed with it.
    pub subs: usize,
    /// Bound folders removed.
    pub folders: usize,
    /// Files inside those folders.
    pub files: u64,
}

impl RequirementDeletion {
    /// Number of dependent records removed.
    pub fn total(&self) -> u64 {
        (self.subs + self.folders) as u64 + self.files
    }
}

/// Manages the requirement checklist of a phase.
#[derive(Clone)]
pub struct RequirementService {
    requirements: Arc<dyn RequirementStore>,
    documents: Arc<dyn DocumentStore>,
    gate: LockGate,
    sync: FolderSynchronizer,
    phases: PhaseService,
    bus: EventBus,
}

impl RequirementService {
    /// Creates a new requirement service.
    pub fn new(
        requirements: Arc<dyn RequirementStore>,
        documents: Arc<dyn DocumentStore>,
        gate: LockGate,
        sync: FolderSynchronizer,
        phases: PhaseService,
        bus: EventBus,
    ) -> Self {
        Self {
            requirements,
            documents,
            gate,
            sync,
            phases,
            bus,
        }
    }

    /// All requirements of a scope sorted by `(order, created_date)`.
    pub async fn list(&self, scope: &PhaseScope) -> AppResult<Vec<Requirement>> {
        self.requirements.list_requirements(scope).await
    }

    /// Roots with nested sub-lists and completion counts.
    pub async fn tree(&self, scope: &PhaseScope) -> AppResult<RequirementTree> {
        let tree = RequirementTree::build(self.list(scope).await?);
        for orphan in &tree.orphans {
            warn!(
                scope = %scope,
                requirement_id = %orphan.id,
                parent_id = ?orphan.parent_requirement_id,
                "Requirement refers to a missing or nested parent"
            );
        }
        Ok(tree)
    }

    /// Find a requirement of this scope.
    pub async fn get(&self, scope: &PhaseScope, id: RequirementId) -> AppResult<Requirement> {
        self.requirements
            .find_requirement(id)
            .await?
            .filter(|r| r.in_scope(scope))
            .ok_or_else(|| AppError::not_found(format!("Requirement {id} not found")))
    }

    /// Add a checklist item at the end of its sibling list.
    ///
    /// A root requirement gets its folder before this returns.
    pub async fn add(&self, scope: &PhaseScope, input: NewRequirement) -> AppResult<Requirement> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Requirement text cannot be empty"));
        }
        self.gate.ensure_unlocked(scope).await?;

        if let Some(parent_id) = input.parent_id {
            let parent = self
                .requirements
                .find_requirement(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Requirement {parent_id} not found")))?;
            if !parent.in_scope(scope) {
                return Err(AppError::validation(
                    "Parent requirement belongs to another phase",
                ));
            }
            if !parent.is_root() {
                return Err(AppError::validation(
                    "Sub-requirements cannot have their own sub-requirements",
                ));
            }
        }

        let siblings = self
            .requirements
            .list_requirements(scope)
            .await?
            .iter()
            .filter(|r| r.parent_requirement_id == input.parent_id)
            .count();

        let requirement = self
            .requirements
            .create_requirement(&CreateRequirement {
                project_id: scope.project_id,
                phase_name: scope.phase_name.clone(),
                parent_requirement_id: input.parent_id,
                requirement_text: text.to_string(),
                is_mandatory: input.is_mandatory,
                order: siblings as i32,
            })
            .await?;

        info!(
            scope = %scope,
            requirement_id = %requirement.id,
            parent_id = ?requirement.parent_requirement_id,
            order = requirement.order,
            "Requirement created"
        );

        if requirement.is_root() {
            self.sync.reconcile(scope).await?;
        }
        self.phases.refresh_progress(scope).await?;
        self.bus.publish(
            scope,
            RequirementEvent::Created {
                requirement_id: requirement.id,
                parent_id: requirement.parent_requirement_id,
            },
        );
        Ok(requirement)
    }

    /// Check or uncheck an item. `completed_date` follows the status.
    pub async fn toggle_completion(
        &self,
        scope: &PhaseScope,
        id: RequirementId,
        completed: bool,
    ) -> AppResult<Requirement> {
        let requirement = self.get(scope, id).await?;
        self.gate.ensure_unlocked(scope).await?;

        let status = RequirementStatus::from_completed(completed);
        if requirement.status == status {
            return Ok(requirement);
        }
        let completed_date = completed.then(|| Utc::now().date_naive());
        let updated = self
            .requirements
            .set_requirement_completion(id, status, completed_date)
            .await?;

        info!(scope = %scope, requirement_id = %id, status = %status, "Requirement completion changed");
        self.phases.refresh_progress(scope).await?;
        self.bus.publish(
            scope,
            RequirementEvent::Completed {
                requirement_id: id,
                completed,
            },
        );
        Ok(updated)
    }

    /// Edit the text (and optionally the mandatory flag) of an item.
    ///
    /// A root's folder is relabeled to match.
    pub async fn update_text(
        &self,
        scope: &PhaseScope,
        id: RequirementId,
        text: &str,
        is_mandatory: Option<bool>,
    ) -> AppResult<Requirement> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Requirement text cannot be empty"));
        }
        let requirement = self.get(scope, id).await?;
        self.gate.ensure_unlocked(scope).await?;

        let is_mandatory = is_mandatory.unwrap_or(requirement.is_mandatory);
        if requirement.requirement_text == text && requirement.is_mandatory == is_mandatory {
            return Ok(requirement);
        }
        let updated = self
            .requirements
            .update_requirement_text(id, text, is_mandatory)
            .await?;

        info!(scope = %scope, requirement_id = %id, "Requirement updated");
        if updated.is_root() {
            self.sync.reconcile(scope).await?;
        }
        self.bus.publish(scope, RequirementEvent::Updated { requirement_id: id });
        Ok(updated)
    }

    /// Delete an item with its sub-requirements, its folder, and the files
    /// in that folder. The remaining siblings are renumbered to `0..n`.
    pub async fn delete(&self, scope: &PhaseScope, id: RequirementId) -> AppResult<RequirementDeletion> {
        self.get(scope, id).await?;
        self.gate.ensure_unlocked(scope).await?;

        let listing = self.requirements.list_requirements(scope).await?;
        let gap = close_gap(&listing, id);
        let subs: Vec<RequirementId> = listing
            .iter()
            .filter(|r| r.parent_requirement_id == Some(id))
            .map(|r| r.id)
            .collect();
        for sub in &subs {
            self.requirements.delete_requirement(*sub).await?;
        }

        let mut deletion = RequirementDeletion {
            subs: subs.len(),
            ..RequirementDeletion::default()
        };
        for folder in self
            .documents
            .list_folders(scope)
            .await?
            .into_iter()
            .filter(|f| f.requirement_id() == Some(id))
        {
            deletion.files += self.documents.delete_files_in_folder(folder.id).await?;
            self.documents.delete_folder(folder.id).await?;
            deletion.folders += 1;
        }

        self.requirements.delete_requirement(id).await?;
        if !gap.is_empty() {
            self.requirements.apply_ordering(&gap).await?;
        }

        info!(
            scope = %scope,
            requirement_id = %id,
            removed_subs = deletion.subs,
            removed_files = deletion.files,
            renumbered = gap.len(),
            "Requirement deleted"
        );
        self.sync.reconcile(scope).await?;
        self.phases.refresh_progress(scope).await?;
        self.bus.publish(
            scope,
            RequirementEvent::Deleted {
                requirement_id: id,
                removed_subs: deletion.subs,
            },
        );
        Ok(deletion)
    }
}

impl std::fmt::Debug for RequirementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequirementService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, fixture, locked_phase};
    use sitehub_core::ErrorKind;
    use sitehub_entity::folder::CreatePhaseFile;
    use sitehub_entity::phase::PhaseStatus;

    fn service(fx: &Fixture) -> RequirementService {
        let gate = LockGate::new(fx.stores.phases.clone());
        let sync = FolderSynchronizer::new(
            fx.stores.requirements.clone(),
            fx.stores.documents.clone(),
            gate.clone(),
            fx.bus.clone(),
        );
        RequirementService::new(
            fx.stores.requirements.clone(),
            fx.stores.documents.clone(),
            gate,
            sync,
            PhaseService::new(fx.stores.clone(), fx.bus.clone()),
            fx.bus.clone(),
        )
    }

    fn new_req(text: &str, parent_id: Option<RequirementId>) -> NewRequirement {
        NewRequirement {
            text: text.into(),
            is_mandatory: true,
            parent_id,
        }
    }

    #[tokio::test]
    async fn test_add_rejects_blank_text() {
        let fx = fixture();
        let err = service(&fx).add(&fx.scope, new_req("   ", None)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(fx.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_order_is_sibling_count() {
        let fx = fixture();
        let service = service(&fx);
        let a = service.add(&fx.scope, new_req("A", None)).await.unwrap();
        let b = service.add(&fx.scope, new_req("B", None)).await.unwrap();
        let a1 = service.add(&fx.scope, new_req("A1", Some(a.id))).await.unwrap();
        let a2 = service.add(&fx.scope, new_req("A2", Some(a.id))).await.unwrap();
        assert_eq!((a.order, b.order, a1.order, a2.order), (0, 1, 0, 1));
    }

    #[tokio::test]
    async fn test_depth_is_bounded() {
        let fx = fixture();
        let service = service(&fx);
        let root = service.add(&fx.scope, new_req("Pour Foundation", None)).await.unwrap();
        let sub = service
            .add(&fx.scope, new_req("Inspect rebar", Some(root.id)))
            .await
            .unwrap();

        let err = service
            .add(&fx.scope, new_req("Too deep", Some(sub.id)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = service
            .add(&fx.scope, new_req("Dangling", Some(RequirementId::new())))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_parent_from_other_phase_is_rejected() {
        let fx = fixture();
        let service = service(&fx);
        let framing = PhaseScope::new(fx.scope.project_id, "framing").unwrap();
        let other = service.add(&framing, new_req("Walls", None)).await.unwrap();

        let err = service
            .add(&fx.scope, new_req("Sub", Some(other.id)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_toggle_keeps_date_consistent_and_updates_progress() {
        let fx = fixture();
        let service = service(&fx);
        let a = service.add(&fx.scope, new_req("A", None)).await.unwrap();
        service.add(&fx.scope, new_req("B", None)).await.unwrap();

        let done = service.toggle_completion(&fx.scope, a.id, true).await.unwrap();
        assert_eq!(done.status, RequirementStatus::Completed);
        assert_eq!(done.completed_date, Some(Utc::now().date_naive()));

        let phase = fx.stores.phases.find_phase(&fx.scope).await.unwrap().unwrap();
        assert_eq!(phase.progress_percent, 50);
        assert_eq!(phase.status, PhaseStatus::InProgress);

        let undone = service.toggle_completion(&fx.scope, a.id, false).await.unwrap();
        assert_eq!(undone.status, RequirementStatus::Pending);
        assert_eq!(undone.completed_date, None);
    }

    #[tokio::test]
    async fn test_update_text_relabels_folder() {
        let fx = fixture();
        let service = service(&fx);
        let root = service.add(&fx.scope, new_req("Pour footing", None)).await.unwrap();
        service
            .update_text(&fx.scope, root.id, "Pour Foundation", None)
            .await
            .unwrap();

        let folders = fx.stores.documents.list_folders(&fx.scope).await.unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].file_name(), "[Folder] Pour Foundation");
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let fx = fixture();
        let service = service(&fx);
        let root = service.add(&fx.scope, new_req("Pour Foundation", None)).await.unwrap();
        let keep = service.add(&fx.scope, new_req("Excavate", None)).await.unwrap();
        service
            .add(&fx.scope, new_req("Inspect rebar", Some(root.id)))
            .await
            .unwrap();

        let folder = fx
            .stores
            .documents
            .list_folders(&fx.scope)
            .await
            .unwrap()
            .into_iter()
            .find(|f| f.requirement_id() == Some(root.id))
            .unwrap();
        fx.stores
            .documents
            .create_file(&CreatePhaseFile {
                project_id: fx.scope.project_id,
                phase_name: fx.scope.phase_name.clone(),
                parent_folder_id: Some(folder.id),
                file_name: "pour.jpg".into(),
                file_url: "https://files.example/pour.jpg".into(),
                size_bytes: 1,
            })
            .await
            .unwrap();

        let deletion = service.delete(&fx.scope, root.id).await.unwrap();
        assert_eq!(
            deletion,
            RequirementDeletion {
                subs: 1,
                folders: 1,
                files: 1,
            }
        );
        assert_eq!(deletion.total(), 3);

        let remaining = service.list(&fx.scope).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
        assert_eq!(remaining[0].order, 0);
        let folders = fx.stores.documents.list_folders(&fx.scope).await.unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].requirement_id(), Some(keep.id));
        assert!(fx.stores.documents.list_files(&fx.scope).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_locked_phase_rejects_every_mutation() {
        let fx = fixture();
        let service = service(&fx);
        let root = service.add(&fx.scope, new_req("Pour Foundation", None)).await.unwrap();
        fx.stores.phases.save_phase(&locked_phase(&fx.scope)).await.unwrap();
        let writes = fx.store.write_count();

        let results = [
            service.add(&fx.scope, new_req("New", None)).await.err(),
            service.toggle_completion(&fx.scope, root.id, true).await.err(),
            service.update_text(&fx.scope, root.id, "Renamed", None).await.err(),
            service.delete(&fx.scope, root.id).await.err(),
        ];
        for err in results {
            assert_eq!(err.unwrap().kind, ErrorKind::LockedPhase);
        }
        assert_eq!(fx.store.write_count(), writes);
        let unchanged = service.get(&fx.scope, root.id).await.unwrap();
        assert_eq!(unchanged.status, RequirementStatus::Pending);
    }

    #[tokio::test]
    async fn test_requirement_of_other_scope_is_not_found() {
        let fx = fixture();
        let service = service(&fx);
        let root = service.add(&fx.scope, new_req("Pour Foundation", None)).await.unwrap();
        let framing = PhaseScope::new(fx.scope.project_id, "framing").unwrap();
        let err = service
            .toggle_completion(&framing, root.id, true)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_add_after_delete_keeps_orders_distinct() {
        let fx = fixture();
        let service = service(&fx);
        let a = service.add(&fx.scope, new_req("A", None)).await.unwrap();
        service.add(&fx.scope, new_req("B", None)).await.unwrap();
        service.add(&fx.scope, new_req("C", None)).await.unwrap();

        service.delete(&fx.scope, a.id).await.unwrap();
        service.add(&fx.scope, new_req("D", None)).await.unwrap();

        let orders: Vec<(String, i32)> = service
            .list(&fx.scope)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.requirement_text, r.order))
            .collect();
        assert_eq!(
            orders,
            vec![("B".into(), 0), ("C".into(), 1), ("D".into(), 2)]
        );
    }

    #[tokio::test]
    async fn test_deleting_sub_renumbers_its_list_only() {
        let fx = fixture();
        let service = service(&fx);
        let root = service.add(&fx.scope, new_req("Pour Foundation", None)).await.unwrap();
        let first = service
            .add(&fx.scope, new_req("Inspect rebar", Some(root.id)))
            .await
            .unwrap();
        service
            .add(&fx.scope, new_req("Order concrete", Some(root.id)))
            .await
            .unwrap();

        let deletion = service.delete(&fx.scope, first.id).await.unwrap();
        assert_eq!(deletion, RequirementDeletion::default());

        let tree = service.tree(&fx.scope).await.unwrap();
        assert_eq!(tree.roots[0].requirement.order, 0);
        assert_eq!(tree.roots[0].subs.len(), 1);
        assert_eq!(tree.roots[0].subs[0].order, 0);
    }

    #[tokio::test]
    async fn test_unknown_custom_phase_rejects_add() {
        let fx = fixture();
        let service = service(&fx);
        let scope = PhaseScope::new(fx.scope.project_id, "no_such_phase").unwrap();
        let writes = fx.store.write_count();

        let err = service.add(&scope, new_req("Stray", None)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(fx.store.write_count(), writes);
        assert!(service.list(&scope).await.unwrap().is_empty());
    }
}
