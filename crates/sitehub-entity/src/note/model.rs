//! Phase note entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sitehub_core::types::{NoteId, ProjectId};

/// A free-text note attached to a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PhaseNote {
    /// Unique note identifier.
    pub id: NoteId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning phase.
    pub phase_name: String,
    /// Note body.
    pub content: String,
    /// Who wrote it, if known.
    pub author: Option<String>,
    /// When the note was written.
    pub created_date: DateTime<Utc>,
}

/// Data required to create a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning phase.
    pub phase_name: String,
    /// Note body.
    pub content: String,
    /// Author name.
    pub author: Option<String>,
}
