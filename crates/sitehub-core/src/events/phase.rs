//! Phase lifecycle, note, and budget events.

use serde::{Deserialize, Serialize};

use crate::types::{BudgetItemId, NoteId};

/// Events related to a phase as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PhaseEvent {
    /// A custom phase was created.
    Created {
        /// Display name of the phase.
        display_name: String,
    },
    /// A phase and everything scoped to it was deleted.
    Deleted,
    /// Work on the phase started.
    Started,
    /// The phase was locked.
    Locked,
    /// The phase was unlocked.
    Unlocked,
    /// The phase was closed (completed and locked).
    Closed,
    /// A closed phase was reopened.
    Reopened,
    /// Progress was recomputed from the requirement checklist.
    ProgressChanged {
        /// New progress percentage.
        progress_percent: i32,
    },
    /// A note was added.
    NoteAdded {
        /// The note ID.
        note_id: NoteId,
    },
    /// A note was deleted.
    NoteDeleted {
        /// The note ID.
        note_id: NoteId,
    },
    /// A budget line was added or changed.
    BudgetChanged {
        /// The budget item ID.
        item_id: BudgetItemId,
    },
    /// A budget line was deleted.
    BudgetDeleted {
        /// The budget item ID.
        item_id: BudgetItemId,
    },
}

impl PhaseEvent {
    /// Short machine name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Deleted => "deleted",
            Self::Started => "started",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
            Self::ProgressChanged { .. } => "progress_changed",
            Self::NoteAdded { .. } => "note_added",
            Self::NoteDeleted { .. } => "note_deleted",
            Self::BudgetChanged { .. } => "budget_changed",
            Self::BudgetDeleted { .. } => "budget_deleted",
        }
    }
}
