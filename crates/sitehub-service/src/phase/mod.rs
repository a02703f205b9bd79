//! Phase lifecycle: pure transitions and the service that persists them.

pub mod service;
pub mod state;

pub use service::{PhaseDeletion, PhaseService};
pub use state::{PhaseCommand, PhaseTransition};
