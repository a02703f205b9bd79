//! Phase entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sitehub_core::PhaseScope;
use sitehub_core::types::{PhaseId, ProjectId};

use super::builtin::BuiltinPhase;
use super::status::PhaseStatus;

/// A project phase with its lifecycle state and lock flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Phase {
    /// Unique phase identifier.
    pub id: PhaseId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Machine name (scope key).
    pub phase_name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Position in the phase list.
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    /// Lifecycle status.
    pub status: PhaseStatus,
    /// 0 to 100.
    pub progress_percent: i32,
    /// While set, nothing scoped to the phase may change.
    pub is_locked: bool,
    /// Day the phase was last locked.
    pub locked_date: Option<NaiveDate>,
    /// Day the phase was closed.
    pub completed_date: Option<NaiveDate>,
    /// Created by a user rather than taken from the catalogue.
    pub is_custom: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Phase {
    /// A fresh, not yet stored record for a built-in phase.
    pub fn from_builtin(project_id: ProjectId, builtin: &BuiltinPhase) -> Self {
        Self::fresh(project_id, builtin.name, builtin.display_name, builtin.order, false)
    }

    /// A fresh, not yet stored record for a user-defined phase.
    pub fn custom(project_id: ProjectId, phase_name: &str, display_name: &str, order: i32) -> Self {
        Self::fresh(project_id, phase_name, display_name, order, true)
    }

    fn fresh(
        project_id: ProjectId,
        phase_name: &str,
        display_name: &str,
        order: i32,
        is_custom: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PhaseId::new(),
            project_id,
            phase_name: phase_name.to_string(),
            display_name: display_name.to_string(),
            order,
            status: PhaseStatus::NotStarted,
            progress_percent: 0,
            is_locked: false,
            locked_date: None,
            completed_date: None,
            is_custom,
            created_at: now,
            updated_at: now,
        }
    }

    /// The scope key of this phase.
    pub fn scope(&self) -> PhaseScope {
        PhaseScope {
            project_id: self.project_id,
            phase_name: self.phase_name.clone(),
        }
    }

    /// Whether the UI should render the phase read-only.
    pub fn is_read_only(&self) -> bool {
        self.is_locked
    }
}
