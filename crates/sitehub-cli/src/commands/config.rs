//! Show the effective configuration.

use sitehub_core::AppResult;
use sitehub_core::config::AppConfig;
use sitehub_database::mask_password;

use crate::output::{self, OutputFormat};

/// Print the merged configuration with the database password masked
pub fn execute(config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let mut shown = config.clone();
    shown.database.url = mask_password(&shown.database.url);

    match format {
        OutputFormat::Json => output::print_item(&shown),
        OutputFormat::Table => {
            println!("Server");
            output::print_kv("host", &shown.server.host);
            output::print_kv("port", &shown.server.port.to_string());
            output::print_kv("cors origins", &shown.server.cors.allowed_origins.join(", "));
            println!("Database");
            output::print_kv("backend", &shown.database.backend.to_string());
            output::print_kv("url", &shown.database.url);
            output::print_kv("max connections", &shown.database.max_connections.to_string());
            output::print_kv("run migrations", &shown.database.run_migrations.to_string());
            println!("Logging");
            output::print_kv("level", &shown.logging.level);
            output::print_kv("format", &shown.logging.format);
            println!("Sync");
            output::print_kv("reconcile on read", &shown.sync.reconcile_on_read.to_string());
        }
    }
    Ok(())
}
