//! SiteHub Server: construction phase checklists and document folders.
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use sitehub_core::AppResult;
use sitehub_core::config::AppConfig;
use sitehub_database::Stores;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `SITEHUB_ENV` overlay, and
/// `SITEHUB__*` overrides.
fn load_configuration() -> AppResult<AppConfig> {
    let base = std::env::var("SITEHUB_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("SITEHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(&base, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Select the record store and serve the API
async fn run(config: AppConfig) -> AppResult<()> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.database.backend,
        "Starting SiteHub"
    );
    let stores = Stores::from_config(&config.database).await?;
    sitehub_api::run_server(config, stores).await
}
