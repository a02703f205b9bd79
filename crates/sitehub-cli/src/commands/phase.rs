//! Phase listing and lifecycle commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use sitehub_core::AppResult;
use sitehub_core::types::ProjectId;
use sitehub_entity::phase::Phase;
use sitehub_service::{PhaseCommand, PhaseManager};

use super::ScopeArgs;
use crate::output::{self, OutputFormat};

/// Arguments for phase commands
#[derive(Debug, Args)]
pub struct PhaseArgs {
    /// Phase subcommand
    #[command(subcommand)]
    pub command: PhaseSubcommand,
}

/// Phase subcommands
#[derive(Debug, Subcommand)]
pub enum PhaseSubcommand {
    /// List the phases of a project
    List {
        /// Project ID
        #[arg(long)]
        project: ProjectId,
    },
    /// Create a custom phase
    Create {
        /// Project ID
        #[arg(long)]
        project: ProjectId,
        /// Display name
        #[arg(long)]
        name: String,
    },
    /// Show the phase overview
    Show(ScopeArgs),
    /// Apply a lifecycle command (lock, unlock, close, reopen, start)
    Transition {
        #[command(flatten)]
        scope: ScopeArgs,
        /// The command
        command: PhaseCommand,
    },
    /// Delete a custom phase and everything in it
    Delete(ScopeArgs),
}

/// Phase display row
#[derive(Debug, Serialize, Tabled)]
struct PhaseRow {
    /// Machine name
    name: String,
    /// Display name
    display_name: String,
    /// Position
    order: i32,
    /// Status
    status: String,
    /// Progress
    progress: String,
    /// Locked
    locked: bool,
    /// Custom
    custom: bool,
}

impl From<&Phase> for PhaseRow {
    fn from(p: &Phase) -> Self {
        Self {
            name: p.phase_name.clone(),
            display_name: p.display_name.clone(),
            order: p.order,
            status: p.status.to_string(),
            progress: format!("{}%", p.progress_percent),
            locked: p.is_locked,
            custom: p.is_custom,
        }
    }
}

/// Execute phase commands
pub async fn execute(args: &PhaseArgs, manager: &PhaseManager, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        PhaseSubcommand::List { project } => {
            let phases = manager.list_phases(*project).await?;
            let rows: Vec<PhaseRow> = phases.iter().map(PhaseRow::from).collect();
            output::print_list(&rows, format);
        }
        PhaseSubcommand::Create { project, name } => {
            let phase = manager.create_custom_phase(*project, name).await?;
            output::print_success(&format!("Phase '{}' created", phase.phase_name));
        }
        PhaseSubcommand::Show(scope) => {
            let overview = manager.overview(&scope.scope()?).await?;
            match format {
                OutputFormat::Json => output::print_item(&overview),
                OutputFormat::Table => {
                    output::print_kv("phase", &overview.phase.display_name);
                    output::print_kv("status", overview.phase.status.as_str());
                    output::print_kv("progress", &format!("{}%", overview.phase.progress_percent));
                    output::print_kv("locked", &overview.phase.is_locked.to_string());
                    output::print_kv(
                        "requirements",
                        &format!("{}/{} complete", overview.tree.completed, overview.tree.total),
                    );
                    output::print_kv("folders", &overview.folders.folders.len().to_string());
                    output::print_kv("files", &overview.folders.total_files.to_string());
                    output::print_kv("notes", &overview.note_count.to_string());
                    output::print_kv(
                        "budget variance",
                        &format!("{:.2}", overview.budget.variance_cents as f64 / 100.0),
                    );
                }
            }
        }
        PhaseSubcommand::Transition { scope, command } => {
            let phase = manager.phase(scope.scope()?).transition(*command).await?;
            output::print_success(&format!(
                "Phase '{}' is {} ({})",
                phase.phase_name,
                phase.status,
                if phase.is_locked { "locked" } else { "unlocked" }
            ));
        }
        PhaseSubcommand::Delete(scope) => {
            let deletion = manager.phase(scope.scope()?).delete().await?;
            output::print_success(&format!(
                "Phase deleted ({} requirements, {} documents, {} notes, {} budget lines)",
                deletion.requirements, deletion.documents, deletion.notes, deletion.budget_items
            ));
        }
    }
    Ok(())
}
