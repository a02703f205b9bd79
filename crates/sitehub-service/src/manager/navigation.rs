//! Explicit navigation state: which phase, tab, and folder a caller is
//! looking at.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sitehub_core::types::FolderId;
use sitehub_core::{AppError, PhaseScope};

/// Tabs of the phase detail view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTab {
    /// The requirement checklist.
    #[default]
    Requirements,
    /// Folders and files.
    Files,
    /// Notes.
    Notes,
    /// Budget lines.
    Budget,
}

impl PhaseTab {
    /// Return the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requirements => "requirements",
            Self::Files => "files",
            Self::Notes => "notes",
            Self::Budget => "budget",
        }
    }
}

impl fmt::Display for PhaseTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PhaseTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requirements" => Ok(Self::Requirements),
            "files" => Ok(Self::Files),
            "notes" => Ok(Self::Notes),
            "budget" => Ok(Self::Budget),
            other => Err(AppError::validation(format!("Unknown tab: {other}"))),
        }
    }
}

/// Which files the Files tab shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "selection", content = "folder_id", rename_all = "snake_case")]
pub enum FolderSelection {
    /// Every file of the phase.
    #[default]
    All,
    /// Files outside any folder.
    Unfiled,
    /// Files of one folder.
    Folder(FolderId),
}

impl FolderSelection {
    /// Build from an optional folder query value: absent means all,
    /// `"unfiled"` means unfiled, anything else must be a folder ID.
    pub fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None | Some("") | Some("all") => Ok(Self::All),
            Some("unfiled") => Ok(Self::Unfiled),
            Some(id) => id
                .parse()
                .map(Self::Folder)
                .map_err(|_| AppError::validation(format!("Invalid folder: {id}"))),
        }
    }
}

/// Where a caller is within the phase detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseNavigation {
    /// The phase.
    pub scope: PhaseScope,
    /// The selected tab.
    #[serde(default)]
    pub tab: PhaseTab,
    /// The selected folder on the Files tab.
    #[serde(default)]
    pub folder: FolderSelection,
}

impl PhaseNavigation {
    /// Requirements tab of a phase.
    pub fn new(scope: PhaseScope) -> Self {
        Self {
            scope,
            tab: PhaseTab::default(),
            folder: FolderSelection::default(),
        }
    }

    /// Switch tab. Leaving the Files tab keeps the folder selection.
    pub fn with_tab(self, tab: PhaseTab) -> Self {
        Self { tab, ..self }
    }

    /// Select a folder; implies the Files tab.
    pub fn with_folder(self, folder: FolderSelection) -> Self {
        Self {
            tab: PhaseTab::Files,
            folder,
            ..self
        }
    }
}
