//! Start the HTTP API.

use sitehub_core::AppResult;
use sitehub_core::config::AppConfig;
use sitehub_database::Stores;

/// Serve until Ctrl-C
pub async fn execute(config: AppConfig) -> AppResult<()> {
    let stores = Stores::from_config(&config.database).await?;
    sitehub_api::run_server(config, stores).await
}
