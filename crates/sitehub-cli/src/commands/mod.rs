//! CLI command definitions and dispatch.

pub mod config;
pub mod folder;
pub mod migrate;
pub mod phase;
pub mod requirement;
pub mod serve;

use clap::{Args, Parser, Subcommand};

use sitehub_core::config::AppConfig;
use sitehub_core::types::ProjectId;
use sitehub_core::{AppResult, PhaseScope};
use sitehub_database::Stores;
use sitehub_service::PhaseManager;

use crate::output::OutputFormat;

/// SiteHub: construction phase checklists and document folders
#[derive(Debug, Parser)]
#[command(name = "sitehub", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file (without extension)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay next to the base file
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve,
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Show the effective configuration
    Config,
    /// Phase listing and lifecycle
    Phase(phase::PhaseArgs),
    /// Requirement checklist
    Req(requirement::RequirementArgs),
    /// Phase folders
    Folder(folder::FolderArgs),
}

/// The phase a command works on.
#[derive(Debug, Clone, Args)]
pub struct ScopeArgs {
    /// Project ID
    #[arg(long)]
    pub project: ProjectId,
    /// Phase machine name (e.g. foundation)
    #[arg(long)]
    pub phase: String,
}

impl ScopeArgs {
    /// Validated scope.
    pub fn scope(&self) -> AppResult<PhaseScope> {
        PhaseScope::new(self.project, self.phase.clone())
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        let config = AppConfig::load_from(&self.config, &self.env)?;
        match &self.command {
            Commands::Serve => serve::execute(config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Config => config::execute(&config, self.format),
            Commands::Phase(args) => phase::execute(args, &open_manager(&config).await?, self.format).await,
            Commands::Req(args) => {
                requirement::execute(args, &open_manager(&config).await?, self.format).await
            }
            Commands::Folder(args) => folder::execute(args, &open_manager(&config).await?, self.format).await,
        }
    }
}

/// Helper: build the phase engine over the configured store
pub async fn open_manager(config: &AppConfig) -> AppResult<PhaseManager> {
    let stores = Stores::from_config(&config.database).await?;
    Ok(PhaseManager::new(stores, config.sync.clone()))
}
