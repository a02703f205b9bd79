//! Two-level requirement tree built from a flat scope listing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use sitehub_core::types::RequirementId;

use super::model::Requirement;

/// A root requirement with its sorted sub-requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementNode {
    /// The root requirement.
    pub requirement: Requirement,
    /// Sub-requirements sorted by `(order, created_date)`.
    pub subs: Vec<Requirement>,
}

/// Checklist view of one phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementTree {
    /// Root requirements sorted by `(order, created_date)`.
    pub roots: Vec<RequirementNode>,
    /// Records whose parent is missing or is not a root.
    pub orphans: Vec<Requirement>,
    /// Number of requirements in the scope.
    pub total: usize,
    /// Number of completed requirements.
    pub completed: usize,
    /// Number of mandatory requirements.
    pub mandatory_total: usize,
    /// Number of completed mandatory requirements.
    pub mandatory_completed: usize,
    /// `completed * 100 / total`, rounded down; 0 when empty.
    pub completion_percent: i32,
}

impl RequirementTree {
    /// Partition a flat listing into roots with nested sub-lists.
    pub fn build(mut records: Vec<Requirement>) -> Self {
        records.sort_by_key(Requirement::sort_key);

        let total = records.len();
        let completed = records.iter().filter(|r| r.is_completed()).count();
        let mandatory_total = records.iter().filter(|r| r.is_mandatory).count();
        let mandatory_completed = records
            .iter()
            .filter(|r| r.is_mandatory && r.is_completed())
            .count();

        let (roots, subs): (Vec<_>, Vec<_>) = records.into_iter().partition(Requirement::is_root);

        let index: HashMap<RequirementId, usize> = roots
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, i))
            .collect();

        let mut nodes: Vec<RequirementNode> = roots
            .into_iter()
            .map(|requirement| RequirementNode {
                requirement,
                subs: Vec::new(),
            })
            .collect();

        let mut orphans = Vec::new();
        for sub in subs {
            match sub.parent_requirement_id.and_then(|p| index.get(&p)) {
                Some(&i) => nodes[i].subs.push(sub),
                None => orphans.push(sub),
            }
        }

        Self {
            roots: nodes,
            orphans,
            total,
            completed,
            mandatory_total,
            mandatory_completed,
            completion_percent: completion_percent(completed, total),
        }
    }

    /// Whether every mandatory requirement is checked off.
    pub fn mandatory_satisfied(&self) -> bool {
        self.mandatory_completed == self.mandatory_total
    }
}

/// Integer percentage, rounded down, 0 for an empty list.
pub fn completion_percent(completed: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    ((completed * 100) / total) as i32
}
