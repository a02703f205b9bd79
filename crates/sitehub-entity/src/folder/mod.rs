//! Folder and file entities of a phase document structure.

pub mod file;
pub mod listing;
pub mod model;

pub use file::{CreatePhaseFile, PhaseFile};
pub use listing::{FolderListing, FolderSummary};
pub use model::{CreateFolder, FOLDER_NAME_PREFIX, FOLDER_URL_SCHEME, Folder, FolderKind, FolderOrder};
