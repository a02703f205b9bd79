//! Database migration management commands.

use clap::{Args, Subcommand};

use sitehub_core::config::{AppConfig, StoreBackend};
use sitehub_core::{AppError, AppResult};
use sitehub_database::DatabasePool;
use sitehub_database::migration::run_migrations;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check that the database answers
    Check,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> AppResult<()> {
    if config.database.backend != StoreBackend::Postgres {
        return Err(AppError::configuration(format!(
            "Migrations need the postgres backend (configured: {})",
            config.database.backend
        )));
    }
    let pool = DatabasePool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Check => {
            pool.health_check().await?;
            output::print_success("Database is reachable.");
        }
    }

    pool.close().await;
    Ok(())
}
