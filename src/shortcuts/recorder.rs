//! Accelerator recording state machine.
//!
//! `RecordingSession` is owned by the caller (one per shortcut editor) and
//! consumes raw key events in delivery order:
//!
//! ```text
//! Idle --start_recording--> Recording --key--> Pending | Captured
//!   ^                                             |
//!   +---------------- stop_recording -------------+
//! ```
//!
//! A capture is only probed for conflicts when it is complete (at least one
//! modifier and exactly one main key). Probing is the host's job: a complete
//! capture returns a `ProbeRequest`, and the host later feeds the
//! `ProbeOutcome` back through `apply_probe_outcome`.

use serde::Serialize;

use crate::error::LauncherError;
use crate::logging;

use super::normalizer::{self, RawKeyEvent};
use super::probe::{ProbeOutcome, ProbeRequest};
use super::types::{Accelerator, CaptureStatus, CapturedAccelerator, Platform};

/// Recorder phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecorderPhase {
    Idle,
    /// Recording, nothing captured yet
    Recording,
    /// Recording, capture incomplete
    Pending,
    /// Recording, capture complete
    Captured,
}

/// Result of feeding one key event to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No session active, event dropped
    Ignored,
    /// The event carried neither a modifier nor a known main key
    Unchanged,
    /// The capture is incomplete; keep recording
    Pending(CaptureStatus),
    /// Complete capture that needs a conflict probe
    Captured(ProbeRequest),
    /// Complete capture equal to the accelerator being edited; not probed
    Unmodified(Accelerator),
}

/// What the accelerator consumer reads after each event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderSnapshot {
    pub recording: bool,
    pub phase: RecorderPhase,
    pub captured_accelerator: String,
    pub is_valid: bool,
    pub is_pending: bool,
    pub needs_main_key: bool,
    pub conflict: bool,
    pub display_string: String,
}

/// Explicit recording session.
#[derive(Clone, Debug, Default)]
pub struct RecordingSession {
    active: bool,
    keys: CapturedAccelerator,
    conflict: bool,
    /// Bumped on every new session and every capture
    generation: u64,
    /// Accelerator currently bound to the binding being edited
    editing: Option<Accelerator>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session, clearing any previous capture and conflict flag.
    pub fn start_recording(&mut self) {
        self.start_recording_for(None);
    }

    /// Start a session for a binding that currently uses `current`.
    ///
    /// Re-capturing exactly `current` is reported as not conflicting.
    pub fn start_recording_for(&mut self, current: Option<Accelerator>) {
        self.active = true;
        self.keys = CapturedAccelerator::default();
        self.conflict = false;
        self.generation += 1;
        self.editing = current;
        tracing::info!(
            category = "SHORTCUT",
            generation = self.generation,
            editing = ?current.map(|a| a.to_canonical_string()),
            "Recording started"
        );
    }

    /// Stop recording. The last capture stays readable.
    pub fn stop_recording(&mut self) {
        if self.active {
            tracing::info!(
                category = "SHORTCUT",
                captured = %self.keys.to_canonical_string(),
                valid = self.keys.is_valid(),
                "Recording stopped"
            );
        }
        self.active = false;
    }

    /// Feed one raw key-down event.
    pub fn record_key(&mut self, event: &RawKeyEvent) -> KeyOutcome {
        if !self.active {
            return KeyOutcome::Ignored;
        }

        logging::log_key_event(&event.code, &event.modifier_summary(), "down");

        let modifiers = event.modifiers();
        let main_key = normalizer::main_key(event);

        if modifiers.is_empty() && main_key.is_none() {
            return KeyOutcome::Unchanged;
        }

        let keys = CapturedAccelerator::new(modifiers, main_key);
        if keys != self.keys {
            // The old flag described the old keys
            self.conflict = false;
        }
        self.keys = keys;
        // Supersedes any probe still in flight for the previous capture
        self.generation += 1;

        let Some(accelerator) = self.keys.accelerator() else {
            let status = self.keys.status();
            tracing::debug!(
                category = "SHORTCUT",
                captured = %self.keys.to_canonical_string(),
                status = ?status,
                "Capture incomplete"
            );
            return KeyOutcome::Pending(status);
        };

        if self.editing == Some(accelerator) {
            self.conflict = false;
            tracing::info!(
                category = "SHORTCUT",
                accelerator = %accelerator,
                "Captured the accelerator already bound to this binding"
            );
            return KeyOutcome::Unmodified(accelerator);
        }

        tracing::info!(
            category = "SHORTCUT",
            accelerator = %accelerator,
            generation = self.generation,
            "Captured accelerator"
        );

        KeyOutcome::Captured(ProbeRequest {
            generation: self.generation,
            accelerator: accelerator.to_canonical_string(),
        })
    }

    /// Apply a conflict probe result.
    ///
    /// Outcomes for superseded captures are discarded. Failures leave the
    /// conflict flag untouched. Returns true if the flag was updated.
    pub fn apply_probe_outcome(&mut self, outcome: ProbeOutcome) -> bool {
        if outcome.request.generation != self.generation {
            tracing::debug!(
                category = "SHORTCUT",
                accelerator = %outcome.request.accelerator,
                probe_generation = outcome.request.generation,
                current_generation = self.generation,
                "Discarding stale conflict probe"
            );
            return false;
        }

        match outcome.result {
            Ok(conflict) => {
                self.conflict = conflict;
                tracing::info!(
                    category = "SHORTCUT",
                    accelerator = %outcome.request.accelerator,
                    conflict,
                    "Conflict probe finished"
                );
                true
            }
            Err(error) => {
                let error = LauncherError::from(error);
                tracing::warn!(
                    category = "SHORTCUT",
                    accelerator = %outcome.request.accelerator,
                    error = %error,
                    severity = ?error.severity(),
                    "Conflict probe failed, keeping previous conflict state"
                );
                false
            }
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active
    }

    pub fn captured(&self) -> CapturedAccelerator {
        self.keys
    }

    /// The captured accelerator, if complete.
    pub fn accelerator(&self) -> Option<Accelerator> {
        self.keys.accelerator()
    }

    pub fn conflict(&self) -> bool {
        self.conflict
    }

    pub fn needs_main_key(&self) -> bool {
        self.keys.status() == CaptureStatus::MissingMainKey
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> RecorderPhase {
        if !self.active {
            return RecorderPhase::Idle;
        }
        match self.keys.status() {
            CaptureStatus::Empty => RecorderPhase::Recording,
            CaptureStatus::Complete => RecorderPhase::Captured,
            CaptureStatus::MissingMainKey | CaptureStatus::MissingModifier => {
                RecorderPhase::Pending
            }
        }
    }

    pub fn snapshot(&self, platform: Platform) -> RecorderSnapshot {
        RecorderSnapshot {
            recording: self.active,
            phase: self.phase(),
            captured_accelerator: self.keys.to_canonical_string(),
            is_valid: self.keys.is_valid(),
            is_pending: self.keys.is_pending(),
            needs_main_key: self.needs_main_key(),
            conflict: self.conflict,
            display_string: self.keys.display_for_platform(platform),
        }
    }
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
