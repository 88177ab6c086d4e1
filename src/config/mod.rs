//! Configuration module - Launcher core settings
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.project-launcher/config.json
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (Config, SearchConfig, etc.)
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::{
    DEFAULT_GLOBAL_SHORTCUT, DEFAULT_MIN_MATCH_CHAR_LENGTH, DEFAULT_SEARCH_DEBOUNCE_MS,
    DEFAULT_SEARCH_THRESHOLD,
};

pub use types::{Config, RecorderConfig, SearchConfig};

pub use loader::{config_path, load_config, load_config_from};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
