//! Applies planned moves to the store.

use std::sync::Arc;

use tracing::info;

use sitehub_core::events::RequirementEvent;
use sitehub_core::{AppError, AppResult, PhaseScope};
use sitehub_database::RequirementStore;

use super::plan::{DragMove, ReorderPlan, plan_move};
use crate::events::EventBus;
use crate::folder::FolderSynchronizer;
use crate::gate::LockGate;

/// Moves requirements within and between sibling lists.
#[derive(Clone)]
pub struct ReorderService {
    requirements: Arc<dyn RequirementStore>,
    gate: LockGate,
    sync: FolderSynchronizer,
    bus: EventBus,
}

impl ReorderService {
    /// Creates a new reorder service.
    pub fn new(
        requirements: Arc<dyn RequirementStore>,
        gate: LockGate,
        sync: FolderSynchronizer,
        bus: EventBus,
    ) -> Self {
        Self {
            requirements,
            gate,
            sync,
            bus,
        }
    }

    /// Move one requirement. All order changes are written in one batch;
    /// a change of level reconciles the folders afterwards.
    pub async fn move_requirement(&self, scope: &PhaseScope, mv: DragMove) -> AppResult<ReorderPlan> {
        let listing = self.requirements.list_requirements(scope).await?;
        if !listing.iter().any(|r| r.id == mv.requirement_id) {
            return Err(AppError::not_found(format!(
                "Requirement {} not found",
                mv.requirement_id
            )));
        }
        self.gate.ensure_unlocked(scope).await?;

        let plan = plan_move(&listing, mv)?;
        if plan.is_noop() {
            return Ok(plan);
        }
        self.requirements.apply_ordering(&plan.assignments).await?;

        info!(
            scope = %scope,
            requirement_id = %mv.requirement_id,
            destination = %mv.destination,
            index = mv.index,
            assignments = plan.assignments.len(),
            "Requirement moved"
        );
        if plan.level_changed {
            self.sync.reconcile(scope).await?;
        }
        self.bus.publish(
            scope,
            RequirementEvent::Moved {
                requirement_id: mv.requirement_id,
                reparented: plan.reparented,
                assignments: plan.assignments.len(),
            },
        );
        Ok(plan)
    }
}

impl std::fmt::Debug for ReorderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReorderService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhaseService;
    use crate::requirement::{NewRequirement, RequirementService};
    use crate::reorder::DropList;
    use crate::testing::{Fixture, fixture, locked_phase};
    use sitehub_core::ErrorKind;
    use sitehub_core::types::RequirementId;

    struct Services {
        requirements: RequirementService,
        reorder: ReorderService,
    }

    fn services(fx: &Fixture) -> Services {
        let gate = LockGate::new(fx.stores.phases.clone());
        let sync = FolderSynchronizer::new(
            fx.stores.requirements.clone(),
            fx.stores.documents.clone(),
            gate.clone(),
            fx.bus.clone(),
        );
        Services {
            requirements: RequirementService::new(
                fx.stores.requirements.clone(),
                fx.stores.documents.clone(),
                gate.clone(),
                sync.clone(),
                PhaseService::new(fx.stores.clone(), fx.bus.clone()),
                fx.bus.clone(),
            ),
            reorder: ReorderService::new(fx.stores.requirements.clone(), gate, sync, fx.bus.clone()),
        }
    }

    async fn add(s: &Services, fx: &Fixture, text: &str, parent_id: Option<RequirementId>) -> RequirementId {
        s.requirements
            .add(
                &fx.scope,
                NewRequirement {
                    text: text.into(),
                    is_mandatory: false,
                    parent_id,
                },
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_promotion_creates_folder() {
        let fx = fixture();
        let s = services(&fx);
        let pour = add(&s, &fx, "Pour Foundation", None).await;
        let rebar = add(&s, &fx, "Inspect rebar", Some(pour)).await;

        let plan = s
            .reorder
            .move_requirement(
                &fx.scope,
                DragMove {
                    requirement_id: rebar,
                    destination: DropList::Root,
                    index: 0,
                },
            )
            .await
            .unwrap();
        assert!(plan.level_changed);

        let rebar = s.requirements.get(&fx.scope, rebar).await.unwrap();
        assert!(rebar.is_root());
        assert_eq!(rebar.order, 0);
        let pour = s.requirements.get(&fx.scope, pour).await.unwrap();
        assert_eq!(pour.order, 1);

        let folders = fx.stores.documents.list_folders(&fx.scope).await.unwrap();
        assert_eq!(folders.len(), 2);
        assert!(folders.iter().any(|f| f.requirement_id() == Some(rebar.id)));
    }

    #[tokio::test]
    async fn test_demotion_removes_folder() {
        let fx = fixture();
        let s = services(&fx);
        let pour = add(&s, &fx, "Pour Foundation", None).await;
        let excavate = add(&s, &fx, "Excavate", None).await;

        s.reorder
            .move_requirement(
                &fx.scope,
                DragMove {
                    requirement_id: excavate,
                    destination: DropList::Sub(pour),
                    index: 0,
                },
            )
            .await
            .unwrap();

        let folders = fx.stores.documents.list_folders(&fx.scope).await.unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].requirement_id(), Some(pour));
    }

    #[tokio::test]
    async fn test_noop_move_writes_nothing() {
        let fx = fixture();
        let s = services(&fx);
        let a = add(&s, &fx, "A", None).await;
        add(&s, &fx, "B", None).await;
        let writes = fx.store.write_count();

        let plan = s
            .reorder
            .move_requirement(
                &fx.scope,
                DragMove {
                    requirement_id: a,
                    destination: DropList::Root,
                    index: 0,
                },
            )
            .await
            .unwrap();
        assert!(plan.is_noop());
        assert_eq!(fx.store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_locked_phase_rejects_move() {
        let fx = fixture();
        let s = services(&fx);
        let a = add(&s, &fx, "A", None).await;
        add(&s, &fx, "B", None).await;
        fx.stores.phases.save_phase(&locked_phase(&fx.scope)).await.unwrap();
        let writes = fx.store.write_count();

        let err = s
            .reorder
            .move_requirement(
                &fx.scope,
                DragMove {
                    requirement_id: a,
                    destination: DropList::Root,
                    index: 1,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::LockedPhase);
        assert_eq!(fx.store.write_count(), writes);
    }
}
