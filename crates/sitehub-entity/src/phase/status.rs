//! Phase lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "phase_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    /// No requirement has been worked on yet.
    #[default]
    NotStarted,
    /// Work is under way.
    InProgress,
    /// The phase was closed out.
    Completed,
}

impl PhaseStatus {
    /// Check if the phase was closed out.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PhaseStatus {
    type Err = sitehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(sitehub_core::AppError::validation(format!(
                "Invalid phase status: '{s}'. Expected one of: not_started, in_progress, completed"
            ))),
        }
    }
}
