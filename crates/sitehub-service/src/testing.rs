//! Fixtures shared by the service tests.

use std::sync::Arc;

use sitehub_core::PhaseScope;
use sitehub_core::types::ProjectId;
use sitehub_database::{MemoryStore, Stores};
use sitehub_entity::phase::{Phase, builtin};

use crate::events::EventBus;

pub(crate) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub stores: Stores,
    pub bus: EventBus,
    pub scope: PhaseScope,
}

/// Empty memory store scoped to a fresh project's `foundation` phase.
pub(crate) fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    Fixture {
        stores: Stores::from_memory(store.clone()),
        store,
        bus: EventBus::default(),
        scope: PhaseScope::new(ProjectId::new(), "foundation").unwrap(),
    }
}

/// A locked record for a built-in scope.
pub(crate) fn locked_phase(scope: &PhaseScope) -> Phase {
    let mut phase = Phase::from_builtin(scope.project_id, builtin::find(&scope.phase_name).unwrap());
    phase.is_locked = true;
    phase
}
