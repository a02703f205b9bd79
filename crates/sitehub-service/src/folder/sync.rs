//! Folder reconciliation.
//!
//! Keeps one folder per root requirement in a phase. A run lists the
//! scope once and then issues independent writes; a failed write is
//! logged, counted, and repaired by the next run. Custom folders are never
//! touched. A consistent scope produces no writes at all.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use sitehub_core::events::FolderEvent;
use sitehub_core::types::RequirementId;
use sitehub_core::{AppResult, PhaseScope};
use sitehub_database::{DocumentStore, RequirementStore};
use sitehub_entity::folder::{CreateFolder, Folder};
use sitehub_entity::requirement::Requirement;

use crate::events::EventBus;
use crate::gate::LockGate;

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// The phase was locked; nothing was written.
    pub skipped_locked: bool,
    /// Folders created for roots that had none.
    pub created: usize,
    /// Requirement folders whose label was brought in line with the text.
    pub relabeled: usize,
    /// Folders deleted because their requirement is gone or not a root.
    pub orphans_removed: usize,
    /// Extra folders of one requirement merged into the oldest.
    pub duplicates_merged: usize,
    /// Files moved out of removed folders.
    pub files_moved: u64,
    /// Writes that failed; retried on the next run.
    pub failed: usize,
}

impl SyncReport {
    fn skipped() -> Self {
        Self {
            skipped_locked: true,
            ..Self::default()
        }
    }

    /// Number of folder records changed.
    pub fn changes(&self) -> usize {
        self.created + self.relabeled + self.orphans_removed + self.duplicates_merged
    }

    /// Whether the scope was already consistent.
    pub fn is_noop(&self) -> bool {
        self.changes() == 0 && self.files_moved == 0 && self.failed == 0
    }
}

/// Reconciles requirement folders against root requirements.
#[derive(Clone)]
pub struct FolderSynchronizer {
    requirements: Arc<dyn RequirementStore>,
    documents: Arc<dyn DocumentStore>,
    gate: LockGate,
    bus: EventBus,
}

impl FolderSynchronizer {
    /// Creates a new folder synchronizer.
    pub fn new(
        requirements: Arc<dyn RequirementStore>,
        documents: Arc<dyn DocumentStore>,
        gate: LockGate,
        bus: EventBus,
    ) -> Self {
        Self {
            requirements,
            documents,
            gate,
            bus,
        }
    }

    /// Make the folders of `scope` match its root requirements.
    ///
    /// Only the initial listing can fail the call; individual writes are
    /// counted in [`SyncReport::failed`].
    pub async fn reconcile(&self, scope: &PhaseScope) -> AppResult<SyncReport> {
        if self.gate.is_locked(scope).await? {
            debug!(scope = %scope, "Skipping folder sync on locked phase");
            return Ok(SyncReport::skipped());
        }

        let requirements = self.requirements.list_requirements(scope).await?;
        let folders = self.documents.list_folders(scope).await?;

        let roots: HashMap<RequirementId, &Requirement> = requirements
            .iter()
            .filter(|r| r.is_root())
            .map(|r| (r.id, r))
            .collect();

        let mut bound: BTreeMap<RequirementId, Vec<Folder>> = BTreeMap::new();
        for folder in folders {
            if let Some(requirement_id) = folder.requirement_id() {
                bound.entry(requirement_id).or_default().push(folder);
            }
        }

        let mut report = SyncReport::default();

        for (requirement_id, mut group) in bound.iter().map(|(id, g)| (*id, g.clone())) {
            let Some(root) = roots.get(&requirement_id) else {
                for folder in &group {
                    self.remove_folder(scope, folder, None, &mut report).await;
                }
                continue;
            };

            group.sort_by_key(|f| (f.created_date, f.id));
            let (kept, extras) = group.split_at(1);
            let kept = &kept[0];

            for extra in extras {
                self.remove_folder(scope, extra, Some(kept), &mut report).await;
            }

            if kept.label != root.requirement_text {
                match self.documents.rename_folder(kept.id, &root.requirement_text).await {
                    Ok(_) => report.relabeled += 1,
                    Err(e) => {
                        warn!(scope = %scope, folder_id = %kept.id, error = %e, "Failed to relabel folder");
                        report.failed += 1;
                    }
                }
            }
        }

        for requirement in requirements.iter().filter(|r| r.is_root()) {
            if bound.contains_key(&requirement.id) {
                continue;
            }
            let data = CreateFolder::for_requirement(
                scope,
                requirement.id,
                &requirement.requirement_text,
                requirement.order,
            );
            match self.documents.create_folder(&data).await {
                Ok(_) => report.created += 1,
                Err(e) => {
                    warn!(
                        scope = %scope,
                        requirement_id = %requirement.id,
                        error = %e,
                        "Failed to create requirement folder"
                    );
                    report.failed += 1;
                }
            }
        }

        if !report.is_noop() {
            info!(
                scope = %scope,
                created = report.created,
                relabeled = report.relabeled,
                orphans_removed = report.orphans_removed,
                duplicates_merged = report.duplicates_merged,
                failed = report.failed,
                "Folders reconciled"
            );
        }
        if report.changes() > 0 {
            self.bus.publish(
                scope,
                FolderEvent::Reconciled {
                    created: report.created,
                    relabeled: report.relabeled,
                    deleted: report.orphans_removed + report.duplicates_merged,
                },
            );
        }
        Ok(report)
    }

    /// Move a folder's files (to `into`, or unfiled) and delete it.
    async fn remove_folder(
        &self,
        scope: &PhaseScope,
        folder: &Folder,
        into: Option<&Folder>,
        report: &mut SyncReport,
    ) {
        match self.documents.move_files(folder.id, into.map(|f| f.id)).await {
            Ok(moved) => report.files_moved += moved,
            Err(e) => {
                warn!(scope = %scope, folder_id = %folder.id, error = %e, "Failed to move folder files");
                report.failed += 1;
                return;
            }
        }

        match self.documents.delete_folder(folder.id).await {
            Ok(_) if into.is_some() => report.duplicates_merged += 1,
            Ok(_) => report.orphans_removed += 1,
            Err(e) => {
                warn!(scope = %scope, folder_id = %folder.id, error = %e, "Failed to delete folder");
                report.failed += 1;
            }
        }
    }
}

impl std::fmt::Debug for FolderSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderSynchronizer").finish_non_exhaustive()
    }
}
