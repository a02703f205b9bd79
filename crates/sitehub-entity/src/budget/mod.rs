//! Phase budget entities.

pub mod model;

pub use model::{BudgetItem, BudgetSummary, BudgetUpdate, CreateBudgetItem};
