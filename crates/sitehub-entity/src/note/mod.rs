//! Phase note entities.

pub mod model;

pub use model::{CreateNote, PhaseNote};
