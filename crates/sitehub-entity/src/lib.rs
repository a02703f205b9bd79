//! # sitehub-entity
//!
//! Domain entity models for SiteHub phases. Every struct in this crate
//! represents a stored record or a read-side view built from records.
//! Stored entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`,
//! and, where the row maps one-to-one, `sqlx::FromRow`.

pub mod budget;
pub mod folder;
pub mod note;
pub mod phase;
pub mod requirement;
