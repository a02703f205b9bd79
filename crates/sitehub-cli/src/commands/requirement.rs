//! Requirement checklist commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use sitehub_core::AppResult;
use sitehub_core::types::RequirementId;
use sitehub_entity::requirement::Requirement;
use sitehub_service::{DragMove, DropList, NewRequirement, PhaseManager};

use super::ScopeArgs;
use crate::output::{self, OutputFormat};

/// Arguments for requirement commands
#[derive(Debug, Args)]
pub struct RequirementArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
    /// Requirement subcommand
    #[command(subcommand)]
    pub command: RequirementCommand,
}

/// Requirement subcommands
#[derive(Debug, Subcommand)]
pub enum RequirementCommand {
    /// Show the checklist as a tree
    List,
    /// Add a requirement
    Add {
        /// Checklist text
        #[arg(long)]
        text: String,
        /// Must be completed before close-out
        #[arg(long)]
        mandatory: bool,
        /// Root requirement to nest under
        #[arg(long)]
        parent: Option<RequirementId>,
    },
    /// Mark a requirement completed (or pending with --undo)
    Complete {
        /// Requirement ID
        id: RequirementId,
        /// Mark pending instead
        #[arg(long)]
        undo: bool,
    },
    /// Change the text of a requirement
    Edit {
        /// Requirement ID
        id: RequirementId,
        /// New text
        #[arg(long)]
        text: String,
    },
    /// Move a requirement to a list position
    Move {
        /// Requirement ID
        id: RequirementId,
        /// Root whose sub-list receives it; omit for the root list
        #[arg(long)]
        parent: Option<RequirementId>,
        /// Position in the target list
        #[arg(long, default_value = "0")]
        index: usize,
    },
    /// Delete a requirement with its subs, folder, and files
    Delete {
        /// Requirement ID
        id: RequirementId,
    },
}

/// Requirement display row
#[derive(Debug, Serialize, Tabled)]
struct RequirementRow {
    /// Requirement ID
    id: String,
    /// Indented text
    text: String,
    /// Mandatory
    mandatory: bool,
    /// Status
    status: String,
    /// Completed on
    completed: String,
}

impl RequirementRow {
    fn new(r: &Requirement, depth: usize) -> Self {
        Self {
            id: r.id.to_string(),
            text: format!("{}{}", "  ".repeat(depth), r.requirement_text),
            mandatory: r.is_mandatory,
            status: r.status.to_string(),
            completed: r
                .completed_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Execute requirement commands
pub async fn execute(
    args: &RequirementArgs,
    manager: &PhaseManager,
    format: OutputFormat,
) -> AppResult<()> {
    let phase = manager.phase(args.scope.scope()?);

    match &args.command {
        RequirementCommand::List => {
            let tree = manager.requirements().tree(phase.scope()).await?;
            if format == OutputFormat::Json {
                output::print_item(&tree);
                return Ok(());
            }
            let mut rows = Vec::with_capacity(tree.total);
            for node in &tree.roots {
                rows.push(RequirementRow::new(&node.requirement, 0));
                rows.extend(node.subs.iter().map(|s| RequirementRow::new(s, 1)));
            }
            output::print_list(&rows, format);
            output::print_kv(
                "completion",
                &format!("{}% ({}/{})", tree.completion_percent, tree.completed, tree.total),
            );
        }
        RequirementCommand::Add {
            text,
            mandatory,
            parent,
        } => {
            let requirement = phase
                .add_requirement(NewRequirement {
                    text: text.clone(),
                    is_mandatory: *mandatory,
                    parent_id: *parent,
                })
                .await?;
            output::print_success(&format!("Requirement {} added", requirement.id));
        }
        RequirementCommand::Complete { id, undo } => {
            let requirement = phase.toggle_completion(*id, !undo).await?;
            output::print_success(&format!("Requirement is {}", requirement.status));
        }
        RequirementCommand::Edit { id, text } => {
            phase.update_requirement(*id, text, None).await?;
            output::print_success("Requirement updated");
        }
        RequirementCommand::Move { id, parent, index } => {
            let plan = phase
                .move_requirement(DragMove {
                    requirement_id: *id,
                    destination: parent.map_or(DropList::Root, DropList::Sub),
                    index: *index,
                })
                .await?;
            if plan.is_noop() {
                output::print_success("Requirement already in place");
            } else {
                output::print_success(&format!(
                    "Requirement moved ({} positions updated)",
                    plan.assignments.len()
                ));
            }
        }
        RequirementCommand::Delete { id } => {
            let deletion = phase.delete_requirement(*id).await?;
            output::print_success(&format!(
                "Requirement deleted ({} sub-requirements, {} files removed)",
                deletion.subs, deletion.files
            ));
        }
    }
    Ok(())
}
