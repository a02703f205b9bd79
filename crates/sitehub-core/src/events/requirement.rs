//! Requirement-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::RequirementId;

/// Events related to the requirement checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequirementEvent {
    /// A requirement was created.
    Created {
        /// The requirement ID.
        requirement_id: RequirementId,
        /// Parent requirement for sub-requirements.
        parent_id: Option<RequirementId>,
    },
    /// A requirement's text was edited.
    Updated {
        /// The requirement ID.
        requirement_id: RequirementId,
    },
    /// A requirement was checked or unchecked.
    Completed {
        /// The requirement ID.
        requirement_id: RequirementId,
        /// The new completion state.
        completed: bool,
    },
    /// A requirement (and its subs) was deleted.
    Deleted {
        /// The requirement ID.
        requirement_id: RequirementId,
        /// Number of sub-requirements removed with it.
        removed_subs: usize,
    },
    /// A requirement was moved by drag-and-drop.
    Moved {
        /// The requirement ID.
        requirement_id: RequirementId,
        /// Whether the move changed its level or parent.
        reparented: bool,
        /// Number of order assignments written.
        assignments: usize,
    },
}

impl RequirementEvent {
    /// Short machine name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Completed { .. } => "completed",
            Self::Deleted { .. } => "deleted",
            Self::Moved { .. } => "moved",
        }
    }
}
