//! Folder reconciliation settings.

use serde::{Deserialize, Serialize};

/// Controls when the folder synchronizer runs outside of the
/// requirement create/delete/move paths (where it always runs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Reconcile folders every time a phase overview is read.
    #[serde(default = "default_reconcile_on_read")]
    pub reconcile_on_read: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reconcile_on_read: default_reconcile_on_read(),
        }
    }
}

fn default_reconcile_on_read() -> bool {
    true
}
