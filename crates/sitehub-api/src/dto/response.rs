//! Response DTOs.

use serde::{Deserialize, Serialize};

use sitehub_entity::budget::{BudgetItem, BudgetSummary};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the server answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Configured record store.
    pub backend: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
}

/// Budget lines with totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetResponse {
    /// Lines, oldest first.
    pub items: Vec<BudgetItem>,
    /// Totals.
    pub summary: BudgetSummary,
}

/// Result of a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    /// What happened.
    pub message: String,
    /// Dependent records removed with it.
    pub removed: u64,
}

impl DeletedResponse {
    /// Build a delete result.
    pub fn new(message: impl Into<String>, removed: u64) -> Self {
        Self {
            message: message.into(),
            removed,
        }
    }
}
