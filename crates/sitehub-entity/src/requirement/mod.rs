//! Requirement checklist entities.

pub mod model;
pub mod status;
pub mod tree;

pub use model::{CreateRequirement, OrderAssignment, Requirement, RequirementLevel};
pub use status::RequirementStatus;
pub use tree::{RequirementNode, RequirementTree};
