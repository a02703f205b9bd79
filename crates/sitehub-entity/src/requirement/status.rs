//! Requirement completion status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Completion status of a checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "requirement_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequirementStatus {
    /// Not yet done.
    #[default]
    Pending,
    /// Checked off.
    Completed,
}

impl RequirementStatus {
    /// Status for a checkbox state.
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::Pending
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequirementStatus {
    type Err = sitehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(sitehub_core::AppError::validation(format!(
                "Invalid requirement status: '{s}'. Expected one of: pending, completed"
            ))),
        }
    }
}
