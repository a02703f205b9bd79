//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod database;
pub mod logging;
pub mod sync;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::{DatabaseConfig, StoreBackend};
pub use self::logging::LoggingConfig;
pub use self::sync::SyncConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`SITEHUB__SERVER__PORT=9000`).
pub const ENV_PREFIX: &str = "SITEHUB";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Record store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Folder reconciliation settings.
    #[serde(default)]
    pub sync: SyncConfig,
}

impl AppConfig {
    /// Load configuration from `config/default`, the `config/{env}`
    /// overlay, and `SITEHUB__*` environment variables.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration from an explicit base file plus the environment
    /// overlay that sits next to it.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let overlay = std::path::Path::new(base)
            .parent()
            .map(|dir| dir.join(env).to_string_lossy().into_owned())
            .unwrap_or_else(|| env.to_string());

        let config = ::config::Config::builder()
            .add_source(::config::File::with_name(base).required(false))
            .add_source(::config::File::with_name(&overlay).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from a TOML string (no file or env lookup).
    pub fn from_toml(toml: &str) -> Result<Self, AppError> {
        let config = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.logging.level, "info");
        assert!(config.sync.reconcile_on_read);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [database]
            backend = "postgres"
            url = "postgres://sitehub@localhost/sitehub"

            [logging]
            format = "pretty"

            [sync]
            reconcile_on_read = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.backend, StoreBackend::Postgres);
        assert_eq!(config.database.url, "postgres://sitehub@localhost/sitehub");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.logging.format, "pretty");
        assert!(!config.sync.reconcile_on_read);
    }

    #[test]
    fn test_unknown_backend_is_a_configuration_error() {
        let err = AppConfig::from_toml("[database]\nbackend = \"mongo\"").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
