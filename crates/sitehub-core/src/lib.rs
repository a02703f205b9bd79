//! # sitehub-core
//!
//! Core crate for SiteHub. Contains configuration schemas, typed
//! identifiers, the phase scope key, domain events, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other SiteHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use types::PhaseScope;
