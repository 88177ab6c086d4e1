//! Keyboard accelerator capture and validation.
//!
//! This module provides:
//! - Physical key code normalization (layout and platform independent)
//! - An explicit recording session that enforces the modifier + main key grammar
//! - Asynchronous conflict probing against already-bound accelerators
//! - Platform-aware display formatting
//!
//! # Example
//!
//! ```ignore
//! use launcher_core::shortcuts::{RawKeyEvent, RecordingSession, KeyOutcome, Platform};
//!
//! let mut session = RecordingSession::new();
//! session.start_recording();
//! session.record_key(&RawKeyEvent::new("ControlLeft").with_ctrl());
//! if let KeyOutcome::Captured(request) = session.record_key(&RawKeyEvent::new("KeyA").with_ctrl()) {
//!     dispatcher.dispatch(request); // CommandOrControl+A
//! }
//! println!("{}", session.snapshot(Platform::Linux).display_string); // Ctrl + A
//! ```

mod normalizer;
mod probe;
mod recorder;
mod registry;
mod types;


pub use types::{
    Accelerator, AcceleratorParseError, CaptureStatus, CapturedAccelerator, MainKey, ModifierSet,
    Platform,
};

pub use normalizer::{is_modifier_code, main_key, normalize_code, NormalizedKey, RawKeyEvent};

pub use probe::{ConflictProber, ProbeDispatcher, ProbeError, ProbeOutcome, ProbeRequest};

pub use recorder::{KeyOutcome, RecorderPhase, RecorderSnapshot, RecordingSession};

pub use registry::{AcceleratorRegistry, RegistryError, GLOBAL_OWNER};
