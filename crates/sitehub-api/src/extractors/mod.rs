//! Custom Axum extractors.

pub mod path;

pub use path::{ItemPath, PhasePath};
