//! Phase budget lines.

use std::sync::Arc;

use tracing::info;

use sitehub_core::events::PhaseEvent;
use sitehub_core::types::BudgetItemId;
use sitehub_core::{AppError, AppResult, PhaseScope};
use sitehub_database::BudgetStore;
use sitehub_entity::budget::{BudgetItem, BudgetSummary, BudgetUpdate, CreateBudgetItem};

use crate::events::EventBus;
use crate::gate::LockGate;

/// Budget lines of a phase. Amounts are cents and never negative.
#[derive(Clone)]
pub struct BudgetService {
    budget: Arc<dyn BudgetStore>,
    gate: LockGate,
    bus: EventBus,
}

impl BudgetService {
    /// Creates a new budget service.
    pub fn new(budget: Arc<dyn BudgetStore>, gate: LockGate, bus: EventBus) -> Self {
        Self { budget, gate, bus }
    }

    /// Budget lines of a scope, oldest first.
    pub async fn list(&self, scope: &PhaseScope) -> AppResult<Vec<BudgetItem>> {
        self.budget.list_budget_items(scope).await
    }

    /// Totals over a scope's budget lines.
    pub async fn summary(&self, scope: &PhaseScope) -> AppResult<BudgetSummary> {
        Ok(BudgetSummary::from_items(&self.list(scope).await?))
    }

    /// Add a budget line.
    pub async fn add_item(
        &self,
        scope: &PhaseScope,
        description: &str,
        budgeted_cents: i64,
        actual_cents: i64,
    ) -> AppResult<BudgetItem> {
        let description = validate_description(description)?;
        validate_amount("budgeted", budgeted_cents)?;
        validate_amount("actual", actual_cents)?;
        self.gate.ensure_unlocked(scope).await?;

        let item = self
            .budget
            .create_budget_item(&CreateBudgetItem {
                project_id: scope.project_id,
                phase_name: scope.phase_name.clone(),
                description,
                budgeted_cents,
                actual_cents,
            })
            .await?;

        info!(scope = %scope, item_id = %item.id, budgeted_cents, "Budget line added");
        self.bus.publish(scope, PhaseEvent::BudgetChanged { item_id: item.id });
        Ok(item)
    }

    /// Apply a partial update to a budget line.
    pub async fn update_item(
        &self,
        scope: &PhaseScope,
        item_id: BudgetItemId,
        update: BudgetUpdate,
    ) -> AppResult<BudgetItem> {
        let update = BudgetUpdate {
            description: update.description.as_deref().map(validate_description).transpose()?,
            ..update
        };
        if let Some(cents) = update.budgeted_cents {
            validate_amount("budgeted", cents)?;
        }
        if let Some(cents) = update.actual_cents {
            validate_amount("actual", cents)?;
        }
        self.scoped_item(scope, item_id).await?;
        self.gate.ensure_unlocked(scope).await?;

        let item = self.budget.update_budget_item(item_id, &update).await?;
        info!(scope = %scope, item_id = %item_id, "Budget line updated");
        self.bus.publish(scope, PhaseEvent::BudgetChanged { item_id });
        Ok(item)
    }

    /// Delete a budget line.
    pub async fn delete_item(&self, scope: &PhaseScope, item_id: BudgetItemId) -> AppResult<()> {
        self.scoped_item(scope, item_id).await?;
        self.gate.ensure_unlocked(scope).await?;

        self.budget.delete_budget_item(item_id).await?;
        info!(scope = %scope, item_id = %item_id, "Budget line deleted");
        self.bus.publish(scope, PhaseEvent::BudgetDeleted { item_id });
        Ok(())
    }

    async fn scoped_item(&self, scope: &PhaseScope, item_id: BudgetItemId) -> AppResult<BudgetItem> {
        self.budget
            .find_budget_item(item_id)
            .await?
            .filter(|i| scope.contains(i.project_id, &i.phase_name))
            .ok_or_else(|| AppError::not_found(format!("Budget item {item_id} not found")))
    }
}

fn validate_description(description: &str) -> AppResult<String> {
    let description = description.trim();
    if description.is_empty() {
        return Err(AppError::validation("Budget description cannot be empty"));
    }
    Ok(description.to_string())
}

fn validate_amount(field: &str, cents: i64) -> AppResult<()> {
    if cents < 0 {
        return Err(AppError::validation(format!(
            "The {field} amount cannot be negative"
        )));
    }
    Ok(())
}

impl std::fmt::Debug for BudgetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, fixture, locked_phase};
    use sitehub_core::ErrorKind;

    fn service(fx: &Fixture) -> BudgetService {
        BudgetService::new(
            fx.stores.budget.clone(),
            LockGate::new(fx.stores.phases.clone()),
            fx.bus.clone(),
        )
    }

    #[tokio::test]
    async fn test_budget_lines_and_summary() {
        let fx = fixture();
        let service = service(&fx);
        let concrete = service.add_item(&fx.scope, "Concrete", 12_000_00, 0).await.unwrap();
        service.add_item(&fx.scope, "Rebar", 3_000_00, 3_250_00).await.unwrap();

        service
            .update_item(
                &fx.scope,
                concrete.id,
                BudgetUpdate {
                    actual_cents: Some(11_500_00),
                    ..BudgetUpdate::default()
                },
            )
            .await
            .unwrap();

        let summary = service.summary(&fx.scope).await.unwrap();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_budgeted_cents, 15_000_00);
        assert_eq!(summary.total_actual_cents, 14_750_00);
        assert_eq!(summary.variance_cents, 250_00);
    }

    #[tokio::test]
    async fn test_invalid_lines_are_rejected() {
        let fx = fixture();
        let service = service(&fx);
        let err = service.add_item(&fx.scope, "", 1, 0).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = service.add_item(&fx.scope, "Forms", -1, 0).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(fx.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_locked_phase_rejects_budget_changes() {
        let fx = fixture();
        let service = service(&fx);
        let item = service.add_item(&fx.scope, "Concrete", 100, 0).await.unwrap();
        fx.stores.phases.save_phase(&locked_phase(&fx.scope)).await.unwrap();

        let err = service.add_item(&fx.scope, "Forms", 1, 0).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::LockedPhase);
        let err = service.delete_item(&fx.scope, item.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::LockedPhase);
        let err = service
            .update_item(&fx.scope, item.id, BudgetUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::LockedPhase);
    }
}
