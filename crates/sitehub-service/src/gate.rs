//! The lock check every mutation goes through.

use std::sync::Arc;

use tracing::warn;

use sitehub_core::{AppError, AppResult, PhaseScope};
use sitehub_database::PhaseStore;
use sitehub_entity::phase::builtin;

/// Rejects writes to locked or unknown phases.
///
/// A built-in phase without a stored record is unlocked. A custom phase
/// must have a record; writes to one that was never created or has been
/// deleted fail with `NotFound`.
#[derive(Clone)]
pub struct LockGate {
    phases: Arc<dyn PhaseStore>,
}

impl LockGate {
    /// Creates a new lock gate.
    pub fn new(phases: Arc<dyn PhaseStore>) -> Self {
        Self { phases }
    }

    /// Whether the phase of `scope` is locked. `NotFound` for an unknown
    /// custom phase.
    pub async fn is_locked(&self, scope: &PhaseScope) -> AppResult<bool> {
        match self.phases.find_phase(scope).await? {
            Some(phase) => Ok(phase.is_locked),
            None if builtin::is_builtin(&scope.phase_name) => Ok(false),
            None => Err(AppError::not_found(format!(
                "Phase '{}' not found",
                scope.phase_name
            ))),
        }
    }

    /// Fail with `NotFound` when the phase of `scope` does not exist and
    /// with `LockedPhase` when it is locked.
    pub async fn ensure_unlocked(&self, scope: &PhaseScope) -> AppResult<()> {
        if self.is_locked(scope).await? {
            warn!(scope = %scope, "Rejected mutation on locked phase");
            return Err(AppError::locked_phase(format!(
                "Phase '{}' is locked",
                scope.phase_name
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for LockGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGate").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, locked_phase};
    use sitehub_core::ErrorKind;

    #[tokio::test]
    async fn test_missing_phase_record_is_unlocked() {
        let fx = fixture();
        let gate = LockGate::new(fx.stores.phases.clone());
        assert!(gate.ensure_unlocked(&fx.scope).await.is_ok());
    }

    #[tokio::test]
    async fn test_locked_phase_is_rejected() {
        let fx = fixture();
        fx.stores.phases.save_phase(&locked_phase(&fx.scope)).await.unwrap();
        let gate = LockGate::new(fx.stores.phases.clone());
        let err = gate.ensure_unlocked(&fx.scope).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::LockedPhase);
    }

    #[tokio::test]
    async fn test_unknown_custom_phase_is_rejected() {
        let fx = fixture();
        let gate = LockGate::new(fx.stores.phases.clone());
        let scope = PhaseScope::new(fx.scope.project_id, "no_such_phase").unwrap();
        let err = gate.ensure_unlocked(&scope).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
