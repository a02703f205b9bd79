//! Phase state machine.
//!
//! Status moves `not_started -> in_progress -> completed`; `is_locked` is
//! an orthogonal flag. Every function here is pure: it inspects a
//! [`Phase`] and returns the patched record, or [`PhaseTransition::Unchanged`]
//! when the transition does not apply. Persisting is the caller's job.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sitehub_core::AppError;
use sitehub_entity::phase::{Phase, PhaseStatus};

/// Result of applying a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseTransition {
    /// The phase record after the transition.
    Changed(Phase),
    /// The transition did not apply; nothing to write.
    Unchanged,
}

impl PhaseTransition {
    /// Whether there is something to persist.
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }

    /// The record to persist, if any.
    pub fn changed(self) -> Option<Phase> {
        match self {
            Self::Changed(phase) => Some(phase),
            Self::Unchanged => None,
        }
    }
}

/// Set `is_locked` and stamp `locked_date`.
pub fn lock(phase: &Phase, today: NaiveDate) -> PhaseTransition {
    if phase.is_locked {
        return PhaseTransition::Unchanged;
    }
    let mut next = phase.clone();
    next.is_locked = true;
    next.locked_date = Some(today);
    PhaseTransition::Changed(next)
}

/// Clear the lock. Status and progress are left as they are.
pub fn unlock(phase: &Phase) -> PhaseTransition {
    if !phase.is_locked {
        return PhaseTransition::Unchanged;
    }
    let mut next = phase.clone();
    next.is_locked = false;
    next.locked_date = None;
    PhaseTransition::Changed(next)
}

/// Complete and lock an unlocked phase. No-op while locked.
pub fn close(phase: &Phase, today: NaiveDate) -> PhaseTransition {
    if phase.is_locked {
        return PhaseTransition::Unchanged;
    }
    let mut next = phase.clone();
    next.status = PhaseStatus::Completed;
    next.progress_percent = 100;
    next.completed_date = Some(today);
    next.is_locked = true;
    next.locked_date = Some(today);
    PhaseTransition::Changed(next)
}

/// Undo a close: unlock and return to `in_progress`.
///
/// Only applies to completed phases; progress is recomputed by the caller.
pub fn reopen(phase: &Phase) -> PhaseTransition {
    if phase.status != PhaseStatus::Completed {
        return PhaseTransition::Unchanged;
    }
    let mut next = phase.clone();
    next.status = PhaseStatus::InProgress;
    next.completed_date = None;
    next.is_locked = false;
    next.locked_date = None;
    PhaseTransition::Changed(next)
}

/// Mark an unlocked, not yet started phase as in progress.
pub fn start(phase: &Phase) -> PhaseTransition {
    if phase.is_locked || phase.status != PhaseStatus::NotStarted {
        return PhaseTransition::Unchanged;
    }
    let mut next = phase.clone();
    next.status = PhaseStatus::InProgress;
    PhaseTransition::Changed(next)
}

/// Store a recomputed checklist percentage.
///
/// A positive percentage starts a `not_started` phase. Locked and
/// completed phases keep their numbers; this never completes a phase.
pub fn record_progress(phase: &Phase, percent: i32) -> PhaseTransition {
    if phase.is_locked || phase.status == PhaseStatus::Completed {
        return PhaseTransition::Unchanged;
    }
    let percent = percent.clamp(0, 100);
    let status = if percent > 0 && phase.status == PhaseStatus::NotStarted {
        PhaseStatus::InProgress
    } else {
        phase.status
    };
    if percent == phase.progress_percent && status == phase.status {
        return PhaseTransition::Unchanged;
    }
    let mut next = phase.clone();
    next.progress_percent = percent;
    next.status = status;
    PhaseTransition::Changed(next)
}

/// User-triggered phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseCommand {
    /// Freeze the phase.
    Lock,
    /// Unfreeze the phase.
    Unlock,
    /// Complete and freeze the phase.
    Close,
    /// Reverse a close.
    Reopen,
    /// Begin work.
    Start,
}

impl PhaseCommand {
    /// Apply the command to `phase`.
    pub fn apply(self, phase: &Phase, today: NaiveDate) -> PhaseTransition {
        match self {
            Self::Lock => lock(phase, today),
            Self::Unlock => unlock(phase),
            Self::Close => close(phase, today),
            Self::Reopen => reopen(phase),
            Self::Start => start(phase),
        }
    }

    /// Return the command as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::Close => "close",
            Self::Reopen => "reopen",
            Self::Start => "start",
        }
    }
}

impl fmt::Display for PhaseCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PhaseCommand {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lock" => Ok(Self::Lock),
            "unlock" => Ok(Self::Unlock),
            "close" => Ok(Self::Close),
            "reopen" => Ok(Self::Reopen),
            "start" => Ok(Self::Start),
            _ => Err(AppError::validation(format!(
                "Invalid phase command: '{s}'. Expected one of: lock, unlock, close, reopen, start"
            ))),
        }
    }
}
