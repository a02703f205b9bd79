//! Requirement entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sitehub_core::PhaseScope;
use sitehub_core::types::{ProjectId, RequirementId};

use super::status::RequirementStatus;

/// A checklist item inside one project phase.
///
/// A requirement with no parent is a root requirement and owns exactly
/// one folder. A requirement with a parent is a sub-requirement; its
/// parent must be a root of the same scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Requirement {
    /// Unique requirement identifier.
    pub id: RequirementId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning phase.
    pub phase_name: String,
    /// Parent root requirement (`None` for roots).
    pub parent_requirement_id: Option<RequirementId>,
    /// Checklist text, never empty.
    pub requirement_text: String,
    /// Whether the item must be completed before close-out.
    pub is_mandatory: bool,
    /// Completion status.
    pub status: RequirementStatus,
    /// Set iff `status` is completed.
    pub completed_date: Option<NaiveDate>,
    /// Position within its sibling list.
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    /// Creation timestamp; tie-breaker for equal `order`.
    pub created_date: DateTime<Utc>,
}

/// Explicit view of a requirement's place in the two-level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum RequirementLevel {
    /// Top-level item.
    Root,
    /// Nested under a root.
    Sub {
        /// The owning root requirement.
        parent: RequirementId,
    },
}

impl Requirement {
    /// Level of this requirement in the tree.
    pub fn level(&self) -> RequirementLevel {
        match self.parent_requirement_id {
            None => RequirementLevel::Root,
            Some(parent) => RequirementLevel::Sub { parent },
        }
    }

    /// Check if this is a root requirement.
    pub fn is_root(&self) -> bool {
        self.parent_requirement_id.is_none()
    }

    /// Check if the requirement is checked off.
    pub fn is_completed(&self) -> bool {
        self.status == RequirementStatus::Completed
    }

    /// The scope this requirement lives in.
    pub fn scope(&self) -> PhaseScope {
        PhaseScope {
            project_id: self.project_id,
            phase_name: self.phase_name.clone(),
        }
    }

    /// Check whether the requirement belongs to `scope`.
    pub fn in_scope(&self, scope: &PhaseScope) -> bool {
        scope.contains(self.project_id, &self.phase_name)
    }

    /// Sort key used by every listing: `order`, then creation time.
    pub fn sort_key(&self) -> (i32, DateTime<Utc>) {
        (self.order, self.created_date)
    }
}

/// Data required to create a new requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequirement {
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning phase.
    pub phase_name: String,
    /// Parent root (None for a root requirement).
    pub parent_requirement_id: Option<RequirementId>,
    /// Checklist text.
    pub requirement_text: String,
    /// Mandatory flag.
    pub is_mandatory: bool,
    /// Initial position within the sibling list.
    pub order: i32,
}

/// One row of a batch ordering write: where a requirement ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAssignment {
    /// The requirement being placed.
    pub requirement_id: RequirementId,
    /// Its parent after the write.
    pub parent_requirement_id: Option<RequirementId>,
    /// Its position after the write.
    pub order: i32,
}
