//! Process-local record store.
//!
//! All collections live behind one `tokio::sync::RwLock`, so a batch
//! write such as [`RequirementStore::apply_ordering`] is applied under a
//! single write guard and is never observed half-done.
//!
//! [`RequirementStore::apply_ordering`]: crate::store::RequirementStore::apply_ordering

mod documents;
mod phases;
mod requirements;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use sitehub_entity::budget::BudgetItem;
use sitehub_entity::folder::{Folder, PhaseFile};
use sitehub_entity::note::PhaseNote;
use sitehub_entity::phase::Phase;
use sitehub_entity::requirement::Requirement;

/// Collections kept in insertion order so equal sort keys stay stable.
#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    pub(crate) requirements: Vec<Requirement>,
    pub(crate) folders: Vec<Folder>,
    pub(crate) files: Vec<PhaseFile>,
    pub(crate) phases: Vec<Phase>,
    pub(crate) notes: Vec<PhaseNote>,
    pub(crate) budget: Vec<BudgetItem>,
}

/// In-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutating calls that changed at least one record.
    ///
    /// Lets callers assert that an operation persisted nothing.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().await
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Remove every element matching `pred`, returning how many were removed.
pub(crate) fn remove_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> u64 {
    let before = items.len();
    items.retain(|item| !pred(item));
    (before - items.len()) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentStore, NoteStore, PhaseStore, RequirementStore};
    use sitehub_core::types::ProjectId;
    use sitehub_core::{ErrorKind, PhaseScope};
    use sitehub_entity::folder::{CreateFolder, CreatePhaseFile, FolderKind, FolderOrder};
    use sitehub_entity::note::CreateNote;
    use sitehub_entity::phase::{BUILTIN_PHASES, Phase};
    use sitehub_entity::requirement::{CreateRequirement, OrderAssignment, RequirementStatus};

    fn scope(phase: &str) -> PhaseScope {
        PhaseScope::new(ProjectId::new(), phase).unwrap()
    }

    fn create_req(scope: &PhaseScope, text: &str, order: i32) -> CreateRequirement {
        CreateRequirement {
            project_id: scope.project_id,
            phase_name: scope.phase_name.clone(),
            parent_requirement_id: None,
            requirement_text: text.into(),
            is_mandatory: false,
            order,
        }
    }

    #[tokio::test]
    async fn test_requirements_are_scoped_and_sorted() {
        let store = MemoryStore::new();
        let foundation = scope("foundation");
        let mut framing = foundation.clone();
        framing.phase_name = "framing".into();

        store.create_requirement(&create_req(&foundation, "second", 1)).await.unwrap();
        store.create_requirement(&create_req(&foundation, "first", 0)).await.unwrap();
        store.create_requirement(&create_req(&framing, "other", 0)).await.unwrap();

        let listed = store.list_requirements(&foundation).await.unwrap();
        let texts: Vec<_> = listed.iter().map(|r| r.requirement_text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(store.write_count(), 3);
    }

    #[tokio::test]
    async fn test_set_completion_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .set_requirement_completion(
                sitehub_core::types::RequirementId::new(),
                RequirementStatus::Completed,
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_apply_ordering_is_all_or_nothing() {
        let store = MemoryStore::new();
        let s = scope("foundation");
        let a = store.create_requirement(&create_req(&s, "a", 0)).await.unwrap();
        let b = store.create_requirement(&create_req(&s, "b", 1)).await.unwrap();

        let bad = [
            OrderAssignment {
                requirement_id: a.id,
                parent_requirement_id: None,
                order: 1,
            },
            OrderAssignment {
                requirement_id: sitehub_core::types::RequirementId::new(),
                parent_requirement_id: None,
                order: 0,
            },
        ];
        assert!(store.apply_ordering(&bad).await.is_err());
        assert_eq!(store.find_requirement(a.id).await.unwrap().unwrap().order, 0);

        let good = [
            OrderAssignment {
                requirement_id: a.id,
                parent_requirement_id: None,
                order: 1,
            },
            OrderAssignment {
                requirement_id: b.id,
                parent_requirement_id: None,
                order: 0,
            },
        ];
        store.apply_ordering(&good).await.unwrap();
        let listed = store.list_requirements(&s).await.unwrap();
        assert_eq!(listed[0].id, b.id);
        assert_eq!(listed[1].id, a.id);
    }

    #[tokio::test]
    async fn test_move_files_between_folders() {
        let store = MemoryStore::new();
        let s = scope("framing");
        let create = |label: &str| CreateFolder {
            project_id: s.project_id,
            phase_name: s.phase_name.clone(),
            kind: FolderKind::new_custom(),
            label: label.into(),
            order: 0,
        };
        let from = store.create_folder(&create("From")).await.unwrap();
        let to = store.create_folder(&create("To")).await.unwrap();
        for name in ["a.pdf", "b.pdf"] {
            store
                .create_file(&CreatePhaseFile {
                    project_id: s.project_id,
                    phase_name: s.phase_name.clone(),
                    parent_folder_id: Some(from.id),
                    file_name: name.into(),
                    file_url: format!("https://files.example/{name}"),
                    size_bytes: 10,
                })
                .await
                .unwrap();
        }

        assert_eq!(store.move_files(from.id, Some(to.id)).await.unwrap(), 2);
        let files = store.list_files(&s).await.unwrap();
        assert!(files.iter().all(|f| f.parent_folder_id == Some(to.id)));
        assert_eq!(files[0].file_name, "a.pdf");

        store
            .apply_folder_ordering(&[
                FolderOrder { folder_id: to.id, order: 0 },
                FolderOrder { folder_id: from.id, order: 1 },
            ])
            .await
            .unwrap();
        let folders = store.list_folders(&s).await.unwrap();
        assert_eq!(folders[0].id, to.id);
    }

    #[tokio::test]
    async fn test_save_phase_upserts_by_scope() {
        let store = MemoryStore::new();
        let project = ProjectId::new();
        let mut phase = Phase::from_builtin(project, &BUILTIN_PHASES[2]);
        store.save_phase(&phase).await.unwrap();

        phase.is_locked = true;
        store.save_phase(&phase).await.unwrap();

        let phases = store.list_phases(project).await.unwrap();
        assert_eq!(phases.len(), 1);
        assert!(phases[0].is_locked);
        assert!(store.delete_phase(&phase.scope()).await.unwrap());
        assert!(store.find_phase(&phase.scope()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_notes_in_scope() {
        let store = MemoryStore::new();
        let s = scope("closeout");
        for content in ["punch list walked", "keys handed over"] {
            store
                .create_note(&CreateNote {
                    project_id: s.project_id,
                    phase_name: s.phase_name.clone(),
                    content: content.into(),
                    author: None,
                })
                .await
                .unwrap();
        }
        assert_eq!(store.delete_notes_in_scope(&s).await.unwrap(), 2);
        assert!(store.list_notes(&s).await.unwrap().is_empty());
    }
}
