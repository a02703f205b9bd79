//! Drag-and-drop reordering of requirements.

pub mod plan;
pub mod service;

pub(crate) use plan::close_gap;
pub use plan::{DragMove, DropList, ReorderPlan, plan_move};
pub use service::ReorderService;
