//! Domain events emitted by SiteHub phase operations.
//!
//! Events are published on the service event bus after every successful
//! mutation. Subscribers treat them as invalidation signals: whatever
//! view they hold for the event's scope should be re-read.

pub mod folder;
pub mod phase;
pub mod requirement;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use folder::FolderEvent;
pub use phase::PhaseEvent;
pub use requirement::RequirementEvent;

use crate::types::PhaseScope;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The phase the event belongs to.
    pub scope: PhaseScope,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A requirement-related event.
    Requirement(RequirementEvent),
    /// A folder- or file-related event.
    Folder(FolderEvent),
    /// A phase lifecycle, note, or budget event.
    Phase(PhaseEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(scope: PhaseScope, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            scope,
            payload,
        }
    }

    /// Short machine name of the event, e.g. `requirement.created`.
    pub fn name(&self) -> String {
        match &self.payload {
            EventPayload::Requirement(e) => format!("requirement.{}", e.name()),
            EventPayload::Folder(e) => format!("folder.{}", e.name()),
            EventPayload::Phase(e) => format!("phase.{}", e.name()),
        }
    }
}

impl From<RequirementEvent> for EventPayload {
    fn from(event: RequirementEvent) -> Self {
        Self::Requirement(event)
    }
}

impl From<FolderEvent> for EventPayload {
    fn from(event: FolderEvent) -> Self {
        Self::Folder(event)
    }
}

impl From<PhaseEvent> for EventPayload {
    fn from(event: PhaseEvent) -> Self {
        Self::Phase(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProjectId, RequirementId};

    #[test]
    fn test_event_serializes_with_domain_tag() {
        let scope = PhaseScope::new(ProjectId::new(), "framing").unwrap();
        let event = DomainEvent::new(
            scope,
            RequirementEvent::Completed {
                requirement_id: RequirementId::new(),
                completed: true,
            }
            .into(),
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["payload"]["domain"], "Requirement");
        assert_eq!(json["payload"]["event"]["type"], "Completed");
        assert_eq!(json["scope"]["phase_name"], "framing");
        assert_eq!(event.name(), "requirement.completed");
    }
}
