//! Pure planning of a drag-and-drop move.
//!
//! A drag picks a requirement from one list (the root list or the
//! sub-list of one root) and drops it at an index of a destination list.
//! The planner renumbers every affected list to `0..len` and returns only
//! the assignments whose stored values differ, so the caller can write
//! them in one batch.

use std::fmt;

use serde::{Deserialize, Serialize};

use sitehub_core::types::RequirementId;
use sitehub_core::{AppError, AppResult};
use sitehub_entity::requirement::{OrderAssignment, Requirement};

/// A sibling list a requirement can be dragged to or from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "list", content = "parent_id", rename_all = "snake_case")]
pub enum DropList {
    /// The root list.
    Root,
    /// The sub-list of one root requirement.
    Sub(RequirementId),
}

impl DropList {
    /// The list a requirement currently sits in.
    pub fn of(requirement: &Requirement) -> Self {
        match requirement.parent_requirement_id {
            None => Self::Root,
            Some(parent) => Self::Sub(parent),
        }
    }

    /// Parent value of items in this list.
    pub fn parent_id(&self) -> Option<RequirementId> {
        match self {
            Self::Root => None,
            Self::Sub(parent) => Some(*parent),
        }
    }
}

impl fmt::Display for DropList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Sub(parent) => write!(f, "sub:{parent}"),
        }
    }
}

/// One drag-and-drop gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragMove {
    /// The dragged requirement.
    pub requirement_id: RequirementId,
    /// Where it was dropped.
    pub destination: DropList,
    /// Drop position within the destination list.
    pub index: usize,
}

/// What a move will write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPlan {
    /// Rows to write, in one batch.
    pub assignments: Vec<OrderAssignment>,
    /// The dragged item changes parent.
    pub reparented: bool,
    /// The dragged item changes between root and sub level.
    pub level_changed: bool,
}

impl ReorderPlan {
    /// Whether the move writes nothing.
    pub fn is_noop(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Plan `mv` against the full requirement listing of one scope.
///
/// Rejects with `Validation` a drop into the item's own sub-list, into the
/// sub-list of anything but a root, and the demotion of a root that still
/// has sub-requirements.
pub fn plan_move(requirements: &[Requirement], mv: DragMove) -> AppResult<ReorderPlan> {
    let moved = requirements
        .iter()
        .find(|r| r.id == mv.requirement_id)
        .ok_or_else(|| AppError::not_found(format!("Requirement {} not found", mv.requirement_id)))?;
    let source = DropList::of(moved);
    if let DropList::Sub(parent_id) = source {
        if !requirements.iter().any(|r| r.id == parent_id && r.is_root()) {
            return Err(AppError::orphan_reference(format!(
                "Requirement {} refers to missing root {parent_id}",
                moved.id
            )));
        }
    }

    if let DropList::Sub(parent_id) = mv.destination {
        if parent_id == moved.id {
            return Err(AppError::validation(
                "A requirement cannot be dropped into its own sub-list",
            ));
        }
        let parent = requirements.iter().find(|r| r.id == parent_id).ok_or_else(|| {
            AppError::validation(format!("Target requirement {parent_id} is not in this phase"))
        })?;
        if !parent.is_root() {
            return Err(AppError::validation(
                "Requirements can only be nested under a root requirement",
            ));
        }
        if source == DropList::Root && requirements.iter().any(|r| r.parent_requirement_id == Some(moved.id)) {
            return Err(AppError::validation(
                "A requirement with sub-requirements cannot be nested",
            ));
        }
    }

    if source == mv.destination {
        let mut list = sibling_list(requirements, source);
        let from = position(&list, moved.id);
        let to = mv.index.min(list.len() - 1);
        if from == to {
            return Ok(ReorderPlan::default());
        }
        let item = list.remove(from);
        list.insert(to, item);
        return Ok(ReorderPlan {
            assignments: renumber(&list, source.parent_id(), None),
            reparented: false,
            level_changed: false,
        });
    }

    let mut source_list = sibling_list(requirements, source);
    source_list.remove(position(&source_list, moved.id));

    let mut dest_list = sibling_list(requirements, mv.destination);
    let to = mv.index.min(dest_list.len());
    dest_list.insert(to, moved);

    let mut assignments = renumber(&source_list, source.parent_id(), None);
    assignments.extend(renumber(&dest_list, mv.destination.parent_id(), Some(moved.id)));

    Ok(ReorderPlan {
        assignments,
        reparented: true,
        level_changed: (source == DropList::Root) != (mv.destination == DropList::Root),
    })
}

/// Assignments that close the gap `removed` leaves in its sibling list.
pub(crate) fn close_gap(requirements: &[Requirement], removed: RequirementId) -> Vec<OrderAssignment> {
    let Some(item) = requirements.iter().find(|r| r.id == removed) else {
        return Vec::new();
    };
    let list = DropList::of(item);
    let remaining: Vec<&Requirement> = sibling_list(requirements, list)
        .into_iter()
        .filter(|r| r.id != removed)
        .collect();
    renumber(&remaining, list.parent_id(), None)
}

/// Members of one list sorted by `(order, created_date)`.
fn sibling_list(requirements: &[Requirement], list: DropList) -> Vec<&Requirement> {
    let parent = list.parent_id();
    let mut items: Vec<&Requirement> = requirements
        .iter()
        .filter(|r| r.parent_requirement_id == parent)
        .collect();
    items.sort_by_key(|r| r.sort_key());
    items
}

fn position(list: &[&Requirement], id: RequirementId) -> usize {
    list.iter().position(|r| r.id == id).unwrap_or(0)
}

/// Assignments that bring `list` to `0..len` under `parent`. `always`
/// names an item written even if its order already matches (the moved
/// item, whose parent changes).
fn renumber(
    list: &[&Requirement],
    parent: Option<RequirementId>,
    always: Option<RequirementId>,
) -> Vec<OrderAssignment> {
    list.iter()
        .enumerate()
        .filter_map(|(index, r)| {
            let order = index as i32;
            let changed = r.order != order || r.parent_requirement_id != parent || always == Some(r.id);
            changed.then_some(OrderAssignment {
                requirement_id: r.id,
                parent_requirement_id: parent,
                order,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sitehub_core::ErrorKind;
    use sitehub_core::types::ProjectId;
    use sitehub_entity::requirement::RequirementStatus;
    use std::collections::HashMap;

    struct Board {
        items: Vec<Requirement>,
        project_id: ProjectId,
    }

    impl Board {
        fn new() -> Self {
            Self {
                items: Vec::new(),
                project_id: ProjectId::new(),
            }
        }

        fn add(&mut self, text: &str, parent: Option<RequirementId>) -> RequirementId {
            let order = self
                .items
                .iter()
                .filter(|r| r.parent_requirement_id == parent)
                .count() as i32;
            let requirement = Requirement {
                id: RequirementId::new(),
                project_id: self.project_id,
                phase_name: "foundation".into(),
                parent_requirement_id: parent,
                requirement_text: text.into(),
                is_mandatory: false,
                status: RequirementStatus::Pending,
                completed_date: None,
                order,
                created_date: Utc::now() + Duration::milliseconds(self.items.len() as i64),
            };
            let id = requirement.id;
            self.items.push(requirement);
            id
        }

        fn apply(&mut self, plan: &ReorderPlan) {
            let by_id: HashMap<_, _> = plan.assignments.iter().map(|a| (a.requirement_id, a)).collect();
            for r in &mut self.items {
                if let Some(a) = by_id.get(&r.id) {
                    r.parent_requirement_id = a.parent_requirement_id;
                    r.order = a.order;
                }
            }
        }

        fn texts(&self, list: DropList) -> Vec<&str> {
            sibling_list(&self.items, list)
                .into_iter()
                .map(|r| r.requirement_text.as_str())
                .collect()
        }

        fn orders(&self, list: DropList) -> Vec<i32> {
            sibling_list(&self.items, list).into_iter().map(|r| r.order).collect()
        }
    }

    fn drag(id: RequirementId, destination: DropList, index: usize) -> DragMove {
        DragMove {
            requirement_id: id,
            destination,
            index,
        }
    }

    #[test]
    fn test_same_list_reorder_is_contiguous() {
        let mut board = Board::new();
        let a = board.add("A", None);
        board.add("B", None);
        board.add("C", None);
        board.add("D", None);

        let plan = plan_move(&board.items, drag(a, DropList::Root, 2)).unwrap();
        assert!(!plan.reparented);
        assert_eq!(plan.assignments.len(), 3);
        board.apply(&plan);

        assert_eq!(board.texts(DropList::Root), vec!["B", "C", "A", "D"]);
        assert_eq!(board.orders(DropList::Root), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_same_position_is_noop() {
        let mut board = Board::new();
        board.add("A", None);
        let b = board.add("B", None);
        let plan = plan_move(&board.items, drag(b, DropList::Root, 1)).unwrap();
        assert!(plan.is_noop());
        let plan = plan_move(&board.items, drag(b, DropList::Root, 9)).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn test_reorder_closes_existing_gaps() {
        let mut board = Board::new();
        let a = board.add("A", None);
        board.add("B", None);
        board.add("C", None);
        board.items[1].order = 5;
        board.items[2].order = 9;

        let plan = plan_move(&board.items, drag(a, DropList::Root, 1)).unwrap();
        board.apply(&plan);
        assert_eq!(board.texts(DropList::Root), vec!["B", "A", "C"]);
        assert_eq!(board.orders(DropList::Root), vec![0, 1, 2]);
    }

    #[test]
    fn test_promotion_to_root() {
        let mut board = Board::new();
        let pour = board.add("Pour Foundation", None);
        board.add("Excavate", None);
        let rebar = board.add("Inspect rebar", Some(pour));
        board.add("Order concrete", Some(pour));

        let plan = plan_move(&board.items, drag(rebar, DropList::Root, 0)).unwrap();
        assert!(plan.reparented);
        assert!(plan.level_changed);
        board.apply(&plan);

        let moved = board.items.iter().find(|r| r.id == rebar).unwrap();
        assert_eq!(moved.parent_requirement_id, None);
        assert_eq!(moved.order, 0);
        assert_eq!(
            board.texts(DropList::Root),
            vec!["Inspect rebar", "Pour Foundation", "Excavate"]
        );
        assert_eq!(board.orders(DropList::Root), vec![0, 1, 2]);
        assert_eq!(board.texts(DropList::Sub(pour)), vec!["Order concrete"]);
        assert_eq!(board.orders(DropList::Sub(pour)), vec![0]);
    }

    #[test]
    fn test_demotion_of_childless_root() {
        let mut board = Board::new();
        let pour = board.add("Pour Foundation", None);
        let excavate = board.add("Excavate", None);
        board.add("Inspect rebar", Some(pour));

        let plan = plan_move(&board.items, drag(excavate, DropList::Sub(pour), 0)).unwrap();
        assert!(plan.level_changed);
        board.apply(&plan);

        assert_eq!(board.texts(DropList::Root), vec!["Pour Foundation"]);
        assert_eq!(
            board.texts(DropList::Sub(pour)),
            vec!["Excavate", "Inspect rebar"]
        );
        assert_eq!(board.orders(DropList::Sub(pour)), vec![0, 1]);
    }

    #[test]
    fn test_sub_moves_between_parents() {
        let mut board = Board::new();
        let a = board.add("A", None);
        let b = board.add("B", None);
        let a1 = board.add("A1", Some(a));
        board.add("B1", Some(b));

        let plan = plan_move(&board.items, drag(a1, DropList::Sub(b), 1)).unwrap();
        assert!(plan.reparented);
        assert!(!plan.level_changed);
        board.apply(&plan);
        assert_eq!(board.texts(DropList::Sub(b)), vec!["B1", "A1"]);
        assert!(board.texts(DropList::Sub(a)).is_empty());
    }

    #[test]
    fn test_invalid_drops_are_rejected() {
        let mut board = Board::new();
        let a = board.add("A", None);
        let b = board.add("B", None);
        let a1 = board.add("A1", Some(a));

        let own = plan_move(&board.items, drag(a, DropList::Sub(a), 0)).unwrap_err();
        assert_eq!(own.kind, ErrorKind::Validation);

        let with_children = plan_move(&board.items, drag(a, DropList::Sub(b), 0)).unwrap_err();
        assert_eq!(with_children.kind, ErrorKind::Validation);

        let under_sub = plan_move(&board.items, drag(b, DropList::Sub(a1), 0)).unwrap_err();
        assert_eq!(under_sub.kind, ErrorKind::Validation);

        let orphan = board.add("Stray", Some(RequirementId::new()));
        let err = plan_move(&board.items, drag(orphan, DropList::Root, 0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::OrphanReference);

        let foreign = plan_move(&board.items, drag(b, DropList::Sub(RequirementId::new()), 0))
            .unwrap_err();
        assert_eq!(foreign.kind, ErrorKind::Validation);

        let missing = plan_move(&board.items, drag(RequirementId::new(), DropList::Root, 0))
            .unwrap_err();
        assert_eq!(missing.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_close_gap_renumbers_remaining_siblings() {
        let mut board = Board::new();
        let a = board.add("A", None);
        board.add("B", None);
        board.add("C", None);
        let a1 = board.add("A1", Some(a));

        let assignments = close_gap(&board.items, a);
        assert_eq!(assignments.len(), 2);
        assert!(assignments.iter().all(|x| x.parent_requirement_id.is_none()));
        board.items.retain(|r| r.id != a && r.id != a1);
        board.apply(&ReorderPlan {
            assignments,
            ..ReorderPlan::default()
        });
        assert_eq!(board.texts(DropList::Root), vec!["B", "C"]);
        assert_eq!(board.orders(DropList::Root), vec![0, 1]);

        let last = board.items[1].id;
        assert!(close_gap(&board.items, last).is_empty());
    }
}
