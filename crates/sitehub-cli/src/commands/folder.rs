//! Phase folder commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use sitehub_core::AppResult;
use sitehub_core::types::FolderId;
use sitehub_entity::folder::FolderSummary;
use sitehub_service::PhaseManager;

use super::ScopeArgs;
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List folders with file counts
    List,
    /// Reconcile requirement folders now
    Sync,
    /// Create a custom folder
    Create {
        /// Folder label
        #[arg(long)]
        label: String,
    },
    /// Set the folder order (every folder ID, in order)
    Order {
        /// Folder IDs
        #[arg(required = true)]
        ids: Vec<FolderId>,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Display name
    name: String,
    /// Requirement or custom
    kind: String,
    /// Position
    order: i32,
    /// Files inside
    files: u64,
}

impl From<&FolderSummary> for FolderRow {
    fn from(s: &FolderSummary) -> Self {
        Self {
            id: s.folder.id.to_string(),
            name: s.file_name.clone(),
            kind: if s.folder.kind.is_custom() {
                "custom".to_string()
            } else {
                "requirement".to_string()
            },
            order: s.folder.order,
            files: s.file_count,
        }
    }
}

/// Execute folder commands
pub async fn execute(args: &FolderArgs, manager: &PhaseManager, format: OutputFormat) -> AppResult<()> {
    let phase = manager.phase(args.scope.scope()?);

    match &args.command {
        FolderCommand::List => {
            let listing = manager.folders().listing(phase.scope()).await?;
            let rows: Vec<FolderRow> = listing.folders.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
            output::print_kv("unfiled files", &listing.unfiled_count.to_string());
        }
        FolderCommand::Sync => {
            let report = phase.reconcile().await?;
            if report.skipped_locked {
                output::print_success("Phase is locked; nothing to do");
            } else {
                output::print_success(&format!(
                    "Folders reconciled: {} created, {} relabeled, {} orphans removed, {} duplicates merged, {} failed",
                    report.created,
                    report.relabeled,
                    report.orphans_removed,
                    report.duplicates_merged,
                    report.failed
                ));
            }
        }
        FolderCommand::Create { label } => {
            let folder = phase.create_folder(label).await?;
            output::print_success(&format!("Folder {} created", folder.id));
        }
        FolderCommand::Order { ids } => {
            let changes = phase.reorder_folders(ids).await?;
            output::print_success(&format!("{} folders repositioned", changes.len()));
        }
    }
    Ok(())
}
