//! PostgreSQL implementations of the store traits.

pub mod budget;
pub mod document;
pub mod note;
pub mod phase;
pub mod requirement;

pub use budget::PgBudgetStore;
pub use document::PgDocumentStore;
pub use note::PgNoteStore;
pub use phase::PgPhaseStore;
pub use requirement::PgRequirementStore;
