use async_trait::async_trait;
use chrono::Utc;

use sitehub_core::types::{BudgetItemId, NoteId, ProjectId};
use sitehub_core::{AppError, AppResult, PhaseScope};
use sitehub_entity::budget::{BudgetItem, BudgetUpdate, CreateBudgetItem};
use sitehub_entity::note::{CreateNote, PhaseNote};
use sitehub_entity::phase::Phase;

use super::{MemoryStore, remove_where};
use crate::store::{BudgetStore, NoteStore, PhaseStore};

fn phase_in(phase: &Phase, scope: &PhaseScope) -> bool {
    scope.contains(phase.project_id, &phase.phase_name)
}

#[async_trait]
impl PhaseStore for MemoryStore {
    async fn list_phases(&self, project_id: ProjectId) -> AppResult<Vec<Phase>> {
        let state = self.read().await;
        let mut phases: Vec<Phase> = state
            .phases
            .iter()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect();
        phases.sort_by_key(|p| (p.order, p.created_at));
        Ok(phases)
    }

    async fn find_phase(&self, scope: &PhaseScope) -> AppResult<Option<Phase>> {
        let state = self.read().await;
        Ok(state.phases.iter().find(|p| phase_in(p, scope)).cloned())
    }

    async fn save_phase(&self, phase: &Phase) -> AppResult<Phase> {
        let mut saved = phase.clone();
        saved.updated_at = Utc::now();

        let scope = phase.scope();
        let mut state = self.write().await;
        match state.phases.iter_mut().find(|p| phase_in(p, &scope)) {
            Some(existing) => {
                saved.id = existing.id;
                saved.created_at = existing.created_at;
                *existing = saved.clone();
            }
            None => state.phases.push(saved.clone()),
        }
        self.record_write();
        Ok(saved)
    }

    async fn delete_phase(&self, scope: &PhaseScope) -> AppResult<bool> {
        let removed = remove_where(&mut self.write().await.phases, |p| phase_in(p, scope));
        if removed > 0 {
            self.record_write();
        }
        Ok(removed > 0)
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list_notes(&self, scope: &PhaseScope) -> AppResult<Vec<PhaseNote>> {
        let state = self.read().await;
        let mut notes: Vec<PhaseNote> = state
            .notes
            .iter()
            .filter(|n| scope.contains(n.project_id, &n.phase_name))
            .cloned()
            .collect();
        notes.sort_by_key(|n| n.created_date);
        Ok(notes)
    }

    async fn find_note(&self, id: NoteId) -> AppResult<Option<PhaseNote>> {
        let state = self.read().await;
        Ok(state.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn create_note(&self, data: &CreateNote) -> AppResult<PhaseNote> {
        let note = PhaseNote {
            id: NoteId::new(),
            project_id: data.project_id,
            phase_name: data.phase_name.clone(),
            content: data.content.clone(),
            author: data.author.clone(),
            created_date: Utc::now(),
        };
        self.write().await.notes.push(note.clone());
        self.record_write();
        Ok(note)
    }

    async fn delete_note(&self, id: NoteId) -> AppResult<bool> {
        let removed = remove_where(&mut self.write().await.notes, |n| n.id == id);
        if removed > 0 {
            self.record_write();
        }
        Ok(removed > 0)
    }

    async fn delete_notes_in_scope(&self, scope: &PhaseScope) -> AppResult<u64> {
        let removed = remove_where(&mut self.write().await.notes, |n| {
            scope.contains(n.project_id, &n.phase_name)
        });
        if removed > 0 {
            self.record_write();
        }
        Ok(removed)
    }
}

#[async_trait]
impl BudgetStore for MemoryStore {
    async fn list_budget_items(&self, scope: &PhaseScope) -> AppResult<Vec<BudgetItem>> {
        let state = self.read().await;
        let mut items: Vec<BudgetItem> = state
            .budget
            .iter()
            .filter(|b| scope.contains(b.project_id, &b.phase_name))
            .cloned()
            .collect();
        items.sort_by_key(|b| b.created_date);
        Ok(items)
    }

    async fn find_budget_item(&self, id: BudgetItemId) -> AppResult<Option<BudgetItem>> {
        let state = self.read().await;
        Ok(state.budget.iter().find(|b| b.id == id).cloned())
    }

    async fn create_budget_item(&self, data: &CreateBudgetItem) -> AppResult<BudgetItem> {
        let item = BudgetItem {
            id: BudgetItemId::new(),
            project_id: data.project_id,
            phase_name: data.phase_name.clone(),
            description: data.description.clone(),
            budgeted_cents: data.budgeted_cents,
            actual_cents: data.actual_cents,
            created_date: Utc::now(),
        };
        self.write().await.budget.push(item.clone());
        self.record_write();
        Ok(item)
    }

    async fn update_budget_item(
        &self,
        id: BudgetItemId,
        update: &BudgetUpdate,
    ) -> AppResult<BudgetItem> {
        let mut state = self.write().await;
        let item = state
            .budget
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found(format!("Budget item {id} not found")))?;
        if let Some(description) = &update.description {
            item.description = description.clone();
        }
        if let Some(budgeted) = update.budgeted_cents {
            item.budgeted_cents = budgeted;
        }
        if let Some(actual) = update.actual_cents {
            item.actual_cents = actual;
        }
        let updated = item.clone();
        self.record_write();
        Ok(updated)
    }

    async fn delete_budget_item(&self, id: BudgetItemId) -> AppResult<bool> {
        let removed = remove_where(&mut self.write().await.budget, |b| b.id == id);
        if removed > 0 {
            self.record_write();
        }
        Ok(removed > 0)
    }

    async fn delete_budget_in_scope(&self, scope: &PhaseScope) -> AppResult<u64> {
        let removed = remove_where(&mut self.write().await.budget, |b| {
            scope.contains(b.project_id, &b.phase_name)
        });
        if removed > 0 {
            self.record_write();
        }
        Ok(removed)
    }
}
