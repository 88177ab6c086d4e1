//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Config file location (tilde-expanded at load time)
pub const DEFAULT_CONFIG_PATH: &str = "~/.project-launcher/config.json";

/// Quiet period before a changed project list is re-indexed
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Queries shorter than this only use prefix matching
pub const DEFAULT_MIN_MATCH_CHAR_LENGTH: usize = 2;

/// Fuzzy strictness: a field matches when similarity >= 1 - threshold
pub const DEFAULT_SEARCH_THRESHOLD: f64 = 0.2;

/// Field weights for ranking
pub const DEFAULT_NAME_WEIGHT: f64 = 2.0;
pub const DEFAULT_ALIAS_WEIGHT: f64 = 2.0;
pub const DEFAULT_PATH_WEIGHT: f64 = 1.0;

/// Launcher show/hide shortcut
pub const DEFAULT_GLOBAL_SHORTCUT: &str = "CommandOrControl+Shift+P";
