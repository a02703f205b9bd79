//! Phase listing, custom phases, cascade delete, and persisted transitions.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sitehub_core::events::PhaseEvent;
use sitehub_core::types::ProjectId;
use sitehub_core::types::scope::validate_phase_name;
use sitehub_core::{AppError, AppResult, PhaseScope};
use sitehub_database::Stores;
use sitehub_entity::phase::{BUILTIN_PHASES, Phase, builtin};
use sitehub_entity::requirement::tree::completion_percent;

use super::state::{self, PhaseCommand, PhaseTransition};
use crate::events::EventBus;

/// What a phase delete removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDeletion {
    /// Requirements removed.
    pub requirements: u64,
    /// Folders and files removed.
    pub documents: u64,
    /// Notes removed.
    pub notes: u64,
    /// Budget lines removed.
    pub budget_items: u64,
}

/// Manages phase records and their lifecycle.
#[derive(Debug, Clone)]
pub struct PhaseService {
    stores: Stores,
    bus: EventBus,
}

impl PhaseService {
    /// Creates a new phase service.
    pub fn new(stores: Stores, bus: EventBus) -> Self {
        Self { stores, bus }
    }

    /// All phases of a project: the built-in catalogue (stored state where
    /// it exists) plus custom phases, sorted by `order`.
    pub async fn list_phases(&self, project_id: ProjectId) -> AppResult<Vec<Phase>> {
        let stored = self.stores.phases.list_phases(project_id).await?;

        let mut phases: Vec<Phase> = BUILTIN_PHASES
            .iter()
            .map(|b| {
                stored
                    .iter()
                    .find(|p| p.phase_name == b.name)
                    .cloned()
                    .unwrap_or_else(|| Phase::from_builtin(project_id, b))
            })
            .collect();

        phases.extend(
            stored
                .into_iter()
                .filter(|p| !builtin::is_builtin(&p.phase_name)),
        );
        phases.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.display_name.cmp(&b.display_name)));
        Ok(phases)
    }

    /// The stored record of a scope, or the default record of a built-in
    /// phase. `None` for an unknown custom phase.
    pub async fn resolve(&self, scope: &PhaseScope) -> AppResult<Option<Phase>> {
        if let Some(phase) = self.stores.phases.find_phase(scope).await? {
            return Ok(Some(phase));
        }
        Ok(builtin::find(&scope.phase_name).map(|b| Phase::from_builtin(scope.project_id, b)))
    }

    /// Like [`resolve`](Self::resolve) but fails with `NotFound`.
    pub async fn get_phase(&self, scope: &PhaseScope) -> AppResult<Phase> {
        self.resolve(scope)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Phase '{}' not found", scope.phase_name)))
    }

    /// Create a user-defined phase. The machine name is a slug of the
    /// display name and must not collide with an existing phase.
    pub async fn create_custom_phase(
        &self,
        project_id: ProjectId,
        display_name: &str,
    ) -> AppResult<Phase> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::validation("Phase name cannot be empty"));
        }
        let phase_name = slugify(display_name);
        validate_phase_name(&phase_name)?;

        let existing = self.list_phases(project_id).await?;
        if existing.iter().any(|p| p.phase_name == phase_name) {
            return Err(AppError::conflict(format!(
                "Phase '{phase_name}' already exists"
            )));
        }
        let order = existing.iter().map(|p| p.order).max().map_or(0, |o| o + 1);

        let phase = self
            .stores
            .phases
            .save_phase(&Phase::custom(project_id, &phase_name, display_name, order))
            .await?;

        info!(
            project_id = %project_id,
            phase_name = %phase.phase_name,
            order = phase.order,
            "Custom phase created"
        );
        self.bus.publish(
            &phase.scope(),
            PhaseEvent::Created {
                display_name: phase.display_name.clone(),
            },
        );
        Ok(phase)
    }

    /// Delete a custom phase and everything scoped to it.
    pub async fn delete_phase(&self, scope: &PhaseScope) -> AppResult<PhaseDeletion> {
        if builtin::is_builtin(&scope.phase_name) {
            return Err(AppError::validation(format!(
                "Built-in phase '{}' cannot be deleted",
                scope.phase_name
            )));
        }
        let phase = self
            .stores
            .phases
            .find_phase(scope)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Phase '{}' not found", scope.phase_name)))?;
        if phase.is_locked {
            return Err(AppError::locked_phase(format!(
                "Phase '{}' is locked",
                scope.phase_name
            )));
        }

        let deletion = PhaseDeletion {
            requirements: self.stores.requirements.delete_requirements_in_scope(scope).await?,
            documents: self.stores.documents.delete_documents_in_scope(scope).await?,
            notes: self.stores.notes.delete_notes_in_scope(scope).await?,
            budget_items: self.stores.budget.delete_budget_in_scope(scope).await?,
        };
        self.stores.phases.delete_phase(scope).await?;

        info!(
            scope = %scope,
            requirements = deletion.requirements,
            documents = deletion.documents,
            notes = deletion.notes,
            budget_items = deletion.budget_items,
            "Phase deleted"
        );
        self.bus.publish(scope, PhaseEvent::Deleted);
        Ok(deletion)
    }

    /// Apply a lifecycle command and persist the result.
    ///
    /// A command that does not apply (closing a locked phase, locking a
    /// locked one) writes nothing and returns the current record.
    pub async fn apply(&self, scope: &PhaseScope, command: PhaseCommand) -> AppResult<Phase> {
        let phase = self.get_phase(scope).await?;
        let today = Utc::now().date_naive();

        let Some(next) = command.apply(&phase, today).changed() else {
            debug!(scope = %scope, command = %command, "Phase transition did not apply");
            return Ok(phase);
        };

        let saved = self.stores.phases.save_phase(&next).await?;
        info!(
            scope = %scope,
            command = %command,
            status = %saved.status,
            is_locked = saved.is_locked,
            "Phase transition applied"
        );
        self.bus.publish(scope, command_event(command));

        if command == PhaseCommand::Reopen {
            return Ok(self.refresh_progress(scope).await?.unwrap_or(saved));
        }
        Ok(saved)
    }

    /// Lock the phase.
    pub async fn lock(&self, scope: &PhaseScope) -> AppResult<Phase> {
        self.apply(scope, PhaseCommand::Lock).await
    }

    /// Unlock the phase.
    pub async fn unlock(&self, scope: &PhaseScope) -> AppResult<Phase> {
        self.apply(scope, PhaseCommand::Unlock).await
    }

    /// Close the phase.
    pub async fn close(&self, scope: &PhaseScope) -> AppResult<Phase> {
        self.apply(scope, PhaseCommand::Close).await
    }

    /// Reopen a closed phase.
    pub async fn reopen(&self, scope: &PhaseScope) -> AppResult<Phase> {
        self.apply(scope, PhaseCommand::Reopen).await
    }

    /// Recompute `progress_percent` from the requirement checklist.
    ///
    /// Returns the current record; `None` for an unknown custom phase.
    pub async fn refresh_progress(&self, scope: &PhaseScope) -> AppResult<Option<Phase>> {
        let Some(phase) = self.resolve(scope).await? else {
            debug!(scope = %scope, "Skipping progress for unknown phase");
            return Ok(None);
        };

        let requirements = self.stores.requirements.list_requirements(scope).await?;
        let completed = requirements.iter().filter(|r| r.is_completed()).count();
        let percent = completion_percent(completed, requirements.len());

        match state::record_progress(&phase, percent) {
            PhaseTransition::Unchanged => Ok(Some(phase)),
            PhaseTransition::Changed(next) => {
                let saved = self.stores.phases.save_phase(&next).await?;
                debug!(scope = %scope, progress = saved.progress_percent, "Phase progress updated");
                self.bus.publish(
                    scope,
                    PhaseEvent::ProgressChanged {
                        progress_percent: saved.progress_percent,
                    },
                );
                Ok(Some(saved))
            }
        }
    }
}

fn command_event(command: PhaseCommand) -> PhaseEvent {
    match command {
        PhaseCommand::Lock => PhaseEvent::Locked,
        PhaseCommand::Unlock => PhaseEvent::Unlocked,
        PhaseCommand::Close => PhaseEvent::Closed,
        PhaseCommand::Reopen => PhaseEvent::Reopened,
        PhaseCommand::Start => PhaseEvent::Started,
    }
}

/// Derive a phase machine name from a display name
/// (`"Landscaping & Paving"` becomes `landscaping_paving`).
pub fn slugify(display_name: &str) -> String {
    let mut slug = String::with_capacity(display_name.len());
    for c in display_name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;
    use sitehub_core::ErrorKind;
    use sitehub_entity::phase::PhaseStatus;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Landscaping & Paving"), "landscaping_paving");
        assert_eq!(slugify("  Punch List 2 "), "punch_list_2");
        assert_eq!(slugify("!!!"), "");
    }

    #[tokio::test]
    async fn test_list_includes_builtins_without_records() {
        let fx = fixture();
        let service = PhaseService::new(fx.stores.clone(), fx.bus.clone());
        let phases = service.list_phases(fx.scope.project_id).await.unwrap();
        assert_eq!(phases.len(), BUILTIN_PHASES.len());
        assert_eq!(phases[0].phase_name, "pre_construction");
        assert_eq!(fx.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_create_custom_phase_appends_and_rejects_duplicates() {
        let fx = fixture();
        let service = PhaseService::new(fx.stores.clone(), fx.bus.clone());

        let phase = service
            .create_custom_phase(fx.scope.project_id, "Landscaping")
            .await
            .unwrap();
        assert_eq!(phase.phase_name, "landscaping");
        assert!(phase.is_custom);
        assert_eq!(phase.order, BUILTIN_PHASES.len() as i32);

        let err = service
            .create_custom_phase(fx.scope.project_id, "landscaping")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = service
            .create_custom_phase(fx.scope.project_id, "Foundation")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = service
            .create_custom_phase(fx.scope.project_id, "  ")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_builtin_phase_materializes_on_first_transition() {
        let fx = fixture();
        let service = PhaseService::new(fx.stores.clone(), fx.bus.clone());
        assert!(fx.stores.phases.find_phase(&fx.scope).await.unwrap().is_none());

        let locked = service.lock(&fx.scope).await.unwrap();
        assert!(locked.is_locked);
        assert!(fx.stores.phases.find_phase(&fx.scope).await.unwrap().is_some());

        let writes = fx.store.write_count();
        let again = service.close(&fx.scope).await.unwrap();
        assert_eq!(again.status, PhaseStatus::NotStarted);
        assert_eq!(fx.store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_unknown_custom_phase_is_not_found() {
        let fx = fixture();
        let service = PhaseService::new(fx.stores.clone(), fx.bus.clone());
        let scope = PhaseScope::new(fx.scope.project_id, "landscaping").unwrap();
        let err = service.lock(&scope).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(service.refresh_progress(&scope).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_phase_rules() {
        let fx = fixture();
        let service = PhaseService::new(fx.stores.clone(), fx.bus.clone());

        let err = service.delete_phase(&fx.scope).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let custom = service
            .create_custom_phase(fx.scope.project_id, "Landscaping")
            .await
            .unwrap();
        let scope = custom.scope();
        service.lock(&scope).await.unwrap();
        let err = service.delete_phase(&scope).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::LockedPhase);

        service.unlock(&scope).await.unwrap();
        service.delete_phase(&scope).await.unwrap();
        assert!(fx.stores.phases.find_phase(&scope).await.unwrap().is_none());
    }
}
