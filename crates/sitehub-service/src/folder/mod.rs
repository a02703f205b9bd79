//! Phase document structure: the folder synchronizer and folder/file CRUD.

pub mod service;
pub mod sync;

pub use service::{FolderService, NewFile};
pub use sync::{FolderSynchronizer, SyncReport};
