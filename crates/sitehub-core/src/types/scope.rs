//! The composite `(project_id, phase_name)` key every phase record lives under.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::id::ProjectId;

/// Scope key shared by requirements, folders, files, notes, and budget
/// lines of one project phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseScope {
    /// The owning project.
    pub project_id: ProjectId,
    /// Machine name of the phase (e.g. `foundation`).
    pub phase_name: String,
}

impl PhaseScope {
    /// Build a scope, validating the phase name.
    ///
    /// Phase names are lowercase ASCII letters, digits, and underscores.
    pub fn new(project_id: ProjectId, phase_name: impl Into<String>) -> Result<Self, AppError> {
        let phase_name = phase_name.into();
        validate_phase_name(&phase_name)?;
        Ok(Self {
            project_id,
            phase_name,
        })
    }

    /// Whether a record with the given project and phase belongs to this scope.
    pub fn contains(&self, project_id: ProjectId, phase_name: &str) -> bool {
        self.project_id == project_id && self.phase_name == phase_name
    }
}

impl fmt::Display for PhaseScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project_id, self.phase_name)
    }
}

/// Check that a phase name is a non-empty slug.
pub fn validate_phase_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::validation("Phase name cannot be empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(AppError::validation(format!(
            "Invalid phase name '{name}': use lowercase letters, digits, and underscores"
        )));
    }
    Ok(())
}
