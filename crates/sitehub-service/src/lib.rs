//! # sitehub-service
//!
//! The phase engine. Each service works against the record store traits
//! of `sitehub-database` and consults the [`LockGate`] before writing.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`PhaseManager`] wires one
//! instance of each over a shared [`Stores`](sitehub_database::Stores).

pub mod budget;
pub mod events;
pub mod folder;
pub mod gate;
pub mod manager;
pub mod note;
pub mod phase;
pub mod reorder;
pub mod requirement;

#[cfg(test)]
pub(crate) mod testing;

pub use budget::BudgetService;
pub use events::EventBus;
pub use folder::{FolderService, FolderSynchronizer, SyncReport};
pub use gate::LockGate;
pub use manager::{
    FolderSelection, PhaseHandle, PhaseManager, PhaseNavigation, PhaseOverview, PhaseTab, PhaseView,
    TabContent,
};
pub use note::NoteService;
pub use phase::{PhaseCommand, PhaseService, PhaseTransition};
pub use reorder::{DragMove, DropList, ReorderPlan, ReorderService};
pub use requirement::{NewRequirement, RequirementDeletion, RequirementService};
