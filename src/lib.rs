//! Launcher core - project search and shortcut recording for a desktop
//! project launcher.
//!
//! This library provides the interaction layer behind the launcher UI: fuzzy
//! project ranking over a debounced index, and keyboard accelerator capture
//! with conflict checking. A JSONL driver binary exposes both for automation.

pub mod config;
pub mod debounce;
pub mod driver;
pub mod error;
pub mod logging;
pub mod projects;
pub mod shortcuts;
pub mod stdin_commands;
