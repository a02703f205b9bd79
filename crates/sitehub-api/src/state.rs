//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use sitehub_core::config::AppConfig;
use sitehub_database::Stores;
use sitehub_service::PhaseManager;

/// Application state passed to every handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Every phase engine service.
    pub manager: Arc<PhaseManager>,
    /// When the server started.
    pub started_at: Instant,
}

impl AppState {
    /// Build the state over a store bundle.
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let manager = PhaseManager::new(stores, config.sync.clone());
        Self {
            config: Arc::new(config),
            manager: Arc::new(manager),
            started_at: Instant::now(),
        }
    }
}
