//! Phase entities.

pub mod builtin;
pub mod model;
pub mod status;

pub use builtin::{BUILTIN_PHASES, BuiltinPhase};
pub use model::Phase;
pub use status::PhaseStatus;
