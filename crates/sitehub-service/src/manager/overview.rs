//! Read models assembled by the phase manager.

use serde::{Deserialize, Serialize};

use sitehub_entity::budget::{BudgetItem, BudgetSummary};
use sitehub_entity::folder::{FolderListing, PhaseFile};
use sitehub_entity::note::PhaseNote;
use sitehub_entity::phase::Phase;
use sitehub_entity::requirement::RequirementTree;

use super::navigation::{FolderSelection, PhaseNavigation};
use crate::folder::SyncReport;

/// Everything the phase detail header and checklist need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseOverview {
    /// Phase flags (`status`, `progress_percent`, `is_locked`).
    pub phase: Phase,
    /// Every mutating affordance must be disabled.
    pub read_only: bool,
    /// Roots with nested subs and completion counts.
    pub tree: RequirementTree,
    /// Folders with file counts.
    pub folders: FolderListing,
    /// Number of notes.
    pub note_count: usize,
    /// Budget totals.
    pub budget: BudgetSummary,
    /// Result of the reconcile run on this read, if one ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<SyncReport>,
}

/// Data of the selected tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tab", rename_all = "snake_case")]
pub enum TabContent {
    /// The checklist lives in the overview tree.
    Requirements,
    /// Files of the selected folder.
    Files {
        /// What was selected.
        folder: FolderSelection,
        /// Matching files in upload order.
        files: Vec<PhaseFile>,
    },
    /// Notes, oldest first.
    Notes {
        /// The notes.
        notes: Vec<PhaseNote>,
    },
    /// Budget lines, oldest first.
    Budget {
        /// The lines.
        items: Vec<BudgetItem>,
    },
}

/// The overview plus the data of one tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseView {
    /// Where the caller is.
    pub navigation: PhaseNavigation,
    /// Phase summary.
    pub overview: PhaseOverview,
    /// Selected tab.
    pub content: TabContent,
}
