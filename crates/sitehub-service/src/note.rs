//! Phase notes.

use std::sync::Arc;

use tracing::info;

use sitehub_core::events::PhaseEvent;
use sitehub_core::types::NoteId;
use sitehub_core::{AppError, AppResult, PhaseScope};
use sitehub_database::NoteStore;
use sitehub_entity::note::{CreateNote, PhaseNote};

use crate::events::EventBus;
use crate::gate::LockGate;

/// Free-text notes of a phase. Writes are gated by the phase lock.
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteStore>,
    gate: LockGate,
    bus: EventBus,
}

impl NoteService {
    /// Creates a new note service.
    pub fn new(notes: Arc<dyn NoteStore>, gate: LockGate, bus: EventBus) -> Self {
        Self { notes, gate, bus }
    }

    /// Notes of a scope, oldest first.
    pub async fn list(&self, scope: &PhaseScope) -> AppResult<Vec<PhaseNote>> {
        self.notes.list_notes(scope).await
    }

    /// Add a note.
    pub async fn add_note(
        &self,
        scope: &PhaseScope,
        content: &str,
        author: Option<String>,
    ) -> AppResult<PhaseNote> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("Note cannot be empty"));
        }
        self.gate.ensure_unlocked(scope).await?;

        let note = self
            .notes
            .create_note(&CreateNote {
                project_id: scope.project_id,
                phase_name: scope.phase_name.clone(),
                content: content.to_string(),
                author: author.filter(|a| !a.trim().is_empty()),
            })
            .await?;

        info!(scope = %scope, note_id = %note.id, "Note added");
        self.bus.publish(scope, PhaseEvent::NoteAdded { note_id: note.id });
        Ok(note)
    }

    /// Delete a note of this scope.
    pub async fn delete_note(&self, scope: &PhaseScope, note_id: NoteId) -> AppResult<()> {
        self.notes
            .find_note(note_id)
            .await?
            .filter(|n| scope.contains(n.project_id, &n.phase_name))
            .ok_or_else(|| AppError::not_found(format!("Note {note_id} not found")))?;
        self.gate.ensure_unlocked(scope).await?;

        self.notes.delete_note(note_id).await?;
        info!(scope = %scope, note_id = %note_id, "Note deleted");
        self.bus.publish(scope, PhaseEvent::NoteDeleted { note_id });
        Ok(())
    }
}

impl std::fmt::Debug for NoteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteService").finish_non_exhaustive()
    }
}
