//! Folder entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sitehub_core::types::{FolderId, ProjectId, RequirementId};
use sitehub_core::{AppError, PhaseScope};

/// Display prefix rendered in front of every folder label.
pub const FOLDER_NAME_PREFIX: &str = "[Folder] ";

/// URL scheme of folder records in the interchange format.
pub const FOLDER_URL_SCHEME: &str = "folder://";

const CUSTOM_PREFIX: &str = "custom_";

/// What a folder is addressed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FolderKind {
    /// Folder owned by a root requirement; maintained by the synchronizer.
    Requirement {
        /// The owning root requirement.
        requirement_id: RequirementId,
    },
    /// Folder created by a user; never touched by the synchronizer.
    Custom {
        /// Opaque key (a creation timestamp in milliseconds).
        custom_id: String,
    },
}

impl FolderKind {
    /// A fresh custom folder key derived from the current time.
    pub fn new_custom() -> Self {
        Self::Custom {
            custom_id: Utc::now().timestamp_millis().to_string(),
        }
    }

    /// The requirement this folder is bound to, if any.
    pub fn requirement_id(&self) -> Option<RequirementId> {
        match self {
            Self::Requirement { requirement_id } => Some(*requirement_id),
            Self::Custom { .. } => None,
        }
    }

    /// Check if this is a user-created folder.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }

    /// Render the interchange URL (`folder://<id>` or `folder://custom_<key>`).
    pub fn to_url(&self) -> String {
        match self {
            Self::Requirement { requirement_id } => format!("{FOLDER_URL_SCHEME}{requirement_id}"),
            Self::Custom { custom_id } => format!("{FOLDER_URL_SCHEME}{CUSTOM_PREFIX}{custom_id}"),
        }
    }

    /// Parse an interchange URL back into a folder kind.
    pub fn parse_url(url: &str) -> Result<Self, AppError> {
        let rest = url.strip_prefix(FOLDER_URL_SCHEME).ok_or_else(|| {
            AppError::validation(format!("'{url}' is not a folder URL"))
        })?;

        if let Some(custom_id) = rest.strip_prefix(CUSTOM_PREFIX) {
            if custom_id.is_empty() {
                return Err(AppError::validation(format!(
                    "Folder URL '{url}' has an empty custom key"
                )));
            }
            return Ok(Self::Custom {
                custom_id: custom_id.to_string(),
            });
        }

        let requirement_id = rest.parse::<RequirementId>().map_err(|_| {
            AppError::validation(format!("Folder URL '{url}' does not name a requirement"))
        })?;
        Ok(Self::Requirement { requirement_id })
    }
}

impl fmt::Display for FolderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// A folder in a phase's document structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning phase.
    pub phase_name: String,
    /// Addressing of this folder.
    #[serde(flatten)]
    pub kind: FolderKind,
    /// Label without the display prefix.
    pub label: String,
    /// Display position among the phase's folders.
    pub order: i32,
    /// When the folder was created.
    pub created_date: DateTime<Utc>,
}

impl Folder {
    /// Display name: `"[Folder] " + label`.
    pub fn file_name(&self) -> String {
        format!("{FOLDER_NAME_PREFIX}{}", self.label)
    }

    /// Interchange URL for this folder.
    pub fn file_url(&self) -> String {
        self.kind.to_url()
    }

    /// The bound requirement, if this is a requirement folder.
    pub fn requirement_id(&self) -> Option<RequirementId> {
        self.kind.requirement_id()
    }

    /// Check whether the folder belongs to `scope`.
    pub fn in_scope(&self, scope: &PhaseScope) -> bool {
        scope.contains(self.project_id, &self.phase_name)
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning phase.
    pub phase_name: String,
    /// Addressing of the folder.
    pub kind: FolderKind,
    /// Folder label.
    pub label: String,
    /// Display position.
    pub order: i32,
}

impl CreateFolder {
    /// Folder creation data for a root requirement.
    pub fn for_requirement(scope: &PhaseScope, requirement_id: RequirementId, text: &str, order: i32) -> Self {
        Self {
            project_id: scope.project_id,
            phase_name: scope.phase_name.clone(),
            kind: FolderKind::Requirement { requirement_id },
            label: text.to_string(),
            order,
        }
    }
}

/// One row of a batch folder ordering write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderOrder {
    /// The folder being placed.
    pub folder_id: FolderId,
    /// Its position after the write.
    pub order: i32,
}
