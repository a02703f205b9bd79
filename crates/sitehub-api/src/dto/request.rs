//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use sitehub_core::AppError;
use sitehub_core::types::{FolderId, RequirementId};
use sitehub_entity::budget::BudgetUpdate;
use sitehub_service::folder::NewFile;
use sitehub_service::{DragMove, DropList, NewRequirement};

/// Run the derived validators, mapping failures to a validation error.
pub fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(req)
}

/// Create a custom phase.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePhaseRequest {
    /// Display name; the machine name is derived from it.
    #[validate(length(min = 1, max = 100, message = "Phase name is required"))]
    pub display_name: String,
}

/// Add a requirement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRequirementRequest {
    /// Checklist text.
    #[validate(length(min = 1, max = 500, message = "Requirement text is required"))]
    pub text: String,
    /// Must be completed before close-out.
    #[serde(default)]
    pub is_mandatory: bool,
    /// Root to nest under.
    #[serde(default)]
    pub parent_id: Option<RequirementId>,
}

impl From<CreateRequirementRequest> for NewRequirement {
    fn from(req: CreateRequirementRequest) -> Self {
        Self {
            text: req.text,
            is_mandatory: req.is_mandatory,
            parent_id: req.parent_id,
        }
    }
}

/// Edit a requirement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRequirementRequest {
    /// New text.
    #[validate(length(min = 1, max = 500, message = "Requirement text is required"))]
    pub text: String,
    /// New mandatory flag; unchanged when absent.
    #[serde(default)]
    pub is_mandatory: Option<bool>,
}

/// Check or uncheck a requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Target state.
    pub completed: bool,
}

/// Drop a requirement into a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequirementRequest {
    /// Root whose sub-list receives the item; absent for the root list.
    #[serde(default)]
    pub parent_id: Option<RequirementId>,
    /// Position within that list.
    pub index: usize,
}

impl MoveRequirementRequest {
    /// The drag gesture for `requirement_id`.
    pub fn into_move(self, requirement_id: RequirementId) -> DragMove {
        DragMove {
            requirement_id,
            destination: self.parent_id.map_or(DropList::Root, DropList::Sub),
            index: self.index,
        }
    }
}

/// Create or rename a custom folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FolderRequest {
    /// Folder label.
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub label: String,
}

/// Full folder order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FolderOrderRequest {
    /// Every folder of the phase, in the new order.
    #[validate(length(min = 1, message = "Folder order cannot be empty"))]
    pub folder_ids: Vec<FolderId>,
}

/// Attach a file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFileRequest {
    /// Target folder; absent for unfiled.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub file_name: String,
    /// Location of the content.
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,
    /// Size in bytes.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub size_bytes: i64,
}

impl From<CreateFileRequest> for NewFile {
    fn from(req: CreateFileRequest) -> Self {
        Self {
            folder_id: req.folder_id,
            file_name: req.file_name,
            file_url: req.file_url,
            size_bytes: req.size_bytes,
        }
    }
}

/// Move a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFileRequest {
    /// Target folder; absent for unfiled.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

/// Add a note.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNoteRequest {
    /// Note body.
    #[validate(length(min = 1, max = 10000, message = "Note cannot be empty"))]
    pub content: String,
    /// Author name.
    #[serde(default)]
    pub author: Option<String>,
}

/// Add a budget line.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBudgetRequest {
    /// What the money is for.
    #[validate(length(min = 1, max = 255, message = "Description is required"))]
    pub description: String,
    /// Planned amount in cents.
    #[validate(range(min = 0))]
    pub budgeted_cents: i64,
    /// Spent so far in cents.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub actual_cents: i64,
}

/// Change a budget line.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateBudgetRequest {
    /// New description.
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    /// New planned amount.
    #[validate(range(min = 0))]
    pub budgeted_cents: Option<i64>,
    /// New spent amount.
    #[validate(range(min = 0))]
    pub actual_cents: Option<i64>,
}

impl From<UpdateBudgetRequest> for BudgetUpdate {
    fn from(req: UpdateBudgetRequest) -> Self {
        Self {
            description: req.description,
            budgeted_cents: req.budgeted_cents,
            actual_cents: req.actual_cents,
        }
    }
}

/// `?tab=files&folder=unfiled` on the phase view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewQuery {
    /// Tab name.
    pub tab: Option<String>,
    /// `all`, `unfiled`, or a folder ID.
    pub folder: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_rejects_negative_amounts() {
        let req = CreateBudgetRequest {
            description: "Concrete".into(),
            budgeted_cents: -1,
            actual_cents: 0,
        };
        assert!(validated(req).is_err());
    }

    #[test]
    fn test_move_without_parent_targets_root() {
        let req: MoveRequirementRequest = serde_json::from_str(r#"{"index": 2}"#).unwrap();
        let id = RequirementId::new();
        let mv = req.into_move(id);
        assert_eq!(mv.destination, DropList::Root);
        assert_eq!(mv.index, 2);
    }
}
