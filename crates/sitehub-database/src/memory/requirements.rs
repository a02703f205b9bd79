use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use sitehub_core::types::RequirementId;
use sitehub_core::{AppError, AppResult, PhaseScope};
use sitehub_entity::requirement::{
    CreateRequirement, OrderAssignment, Requirement, RequirementStatus,
};

use super::{MemoryStore, remove_where};
use crate::store::RequirementStore;

fn missing(id: RequirementId) -> AppError {
    AppError::not_found(format!("Requirement {id} not found"))
}

#[async_trait]
impl RequirementStore for MemoryStore {
    async fn list_requirements(&self, scope: &PhaseScope) -> AppResult<Vec<Requirement>> {
        let state = self.read().await;
        let mut items: Vec<Requirement> = state
            .requirements
            .iter()
            .filter(|r| r.in_scope(scope))
            .cloned()
            .collect();
        items.sort_by_key(Requirement::sort_key);
        Ok(items)
    }

    async fn find_requirement(&self, id: RequirementId) -> AppResult<Option<Requirement>> {
        let state = self.read().await;
        Ok(state.requirements.iter().find(|r| r.id == id).cloned())
    }

    async fn create_requirement(&self, data: &CreateRequirement) -> AppResult<Requirement> {
        let requirement = Requirement {
            id: RequirementId::new(),
            project_id: data.project_id,
            phase_name: data.phase_name.clone(),
            parent_requirement_id: data.parent_requirement_id,
            requirement_text: data.requirement_text.clone(),
            is_mandatory: data.is_mandatory,
            status: RequirementStatus::Pending,
            completed_date: None,
            order: data.order,
            created_date: Utc::now(),
        };
        self.write().await.requirements.push(requirement.clone());
        self.record_write();
        Ok(requirement)
    }

    async fn update_requirement_text(
        &self,
        id: RequirementId,
        text: &str,
        is_mandatory: bool,
    ) -> AppResult<Requirement> {
        let mut state = self.write().await;
        let requirement = state
            .requirements
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| missing(id))?;
        requirement.requirement_text = text.to_string();
        requirement.is_mandatory = is_mandatory;
        let updated = requirement.clone();
        self.record_write();
        Ok(updated)
    }

    async fn set_requirement_completion(
        &self,
        id: RequirementId,
        status: RequirementStatus,
        completed_date: Option<NaiveDate>,
    ) -> AppResult<Requirement> {
        let mut state = self.write().await;
        let requirement = state
            .requirements
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| missing(id))?;
        requirement.status = status;
        requirement.completed_date = completed_date;
        let updated = requirement.clone();
        self.record_write();
        Ok(updated)
    }

    async fn apply_ordering(&self, assignments: &[OrderAssignment]) -> AppResult<()> {
        if assignments.is_empty() {
            return Ok(());
        }
        let mut state = self.write().await;

        let mut positions = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let pos = state
                .requirements
                .iter()
                .position(|r| r.id == assignment.requirement_id)
                .ok_or_else(|| missing(assignment.requirement_id))?;
            positions.push(pos);
        }

        for (pos, assignment) in positions.into_iter().zip(assignments) {
            let requirement = &mut state.requirements[pos];
            requirement.parent_requirement_id = assignment.parent_requirement_id;
            requirement.order = assignment.order;
        }
        self.record_write();
        Ok(())
    }

    async fn delete_requirement(&self, id: RequirementId) -> AppResult<bool> {
        let removed = remove_where(&mut self.write().await.requirements, |r| r.id == id);
        if removed > 0 {
            self.record_write();
        }
        Ok(removed > 0)
    }

    async fn delete_requirements_in_scope(&self, scope: &PhaseScope) -> AppResult<u64> {
        let removed = remove_where(&mut self.write().await.requirements, |r| r.in_scope(scope));
        if removed > 0 {
            self.record_write();
        }
        Ok(removed)
    }
}
