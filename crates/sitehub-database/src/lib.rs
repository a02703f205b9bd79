//! # sitehub-database
//!
//! The record store contract used by the phase engine, plus two
//! implementations: a process-local [`MemoryStore`] and PostgreSQL
//! stores on a sqlx connection pool.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use connection::{DatabasePool, mask_password};
pub use memory::MemoryStore;
pub use store::{BudgetStore, DocumentStore, NoteStore, PhaseStore, RequirementStore, Stores};
