//! Budget line entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sitehub_core::types::{BudgetItemId, ProjectId};

/// One budget line of a phase. Amounts are in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BudgetItem {
    /// Unique budget line identifier.
    pub id: BudgetItemId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning phase.
    pub phase_name: String,
    /// What the money is for.
    pub description: String,
    /// Planned amount.
    pub budgeted_cents: i64,
    /// Spent so far.
    pub actual_cents: i64,
    /// When the line was added.
    pub created_date: DateTime<Utc>,
}

impl BudgetItem {
    /// Budgeted minus actual; negative when over budget.
    pub fn variance_cents(&self) -> i64 {
        self.budgeted_cents - self.actual_cents
    }
}

/// Data required to add a budget line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBudgetItem {
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning phase.
    pub phase_name: String,
    /// Description.
    pub description: String,
    /// Planned amount.
    pub budgeted_cents: i64,
    /// Spent so far.
    pub actual_cents: i64,
}

/// Partial update of a budget line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetUpdate {
    /// New description.
    pub description: Option<String>,
    /// New planned amount.
    pub budgeted_cents: Option<i64>,
    /// New spent amount.
    pub actual_cents: Option<i64>,
}

/// Totals over a phase's budget lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Number of lines.
    pub item_count: usize,
    /// Sum of planned amounts.
    pub total_budgeted_cents: i64,
    /// Sum of spent amounts.
    pub total_actual_cents: i64,
    /// Planned minus spent.
    pub variance_cents: i64,
}

impl BudgetSummary {
    /// Sum up a list of budget lines.
    pub fn from_items(items: &[BudgetItem]) -> Self {
        let total_budgeted_cents = items.iter().map(|i| i.budgeted_cents).sum();
        let total_actual_cents = items.iter().map(|i| i.actual_cents).sum();
        Self {
            item_count: items.len(),
            total_budgeted_cents,
            total_actual_cents,
            variance_cents: total_budgeted_cents - total_actual_cents,
        }
    }
}
