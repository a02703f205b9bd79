//! Requirement checklist operations.

pub mod service;

pub use service::{NewRequirement, RequirementDeletion, RequirementService};
