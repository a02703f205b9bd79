//! Core type definitions used across the SiteHub workspace.

pub mod id;
pub mod scope;

pub use id::*;
pub use scope::PhaseScope;
