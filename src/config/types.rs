//! Configuration type definitions
//!
//! This module contains all the struct and enum definitions for configuration.

use serde::{Deserialize, Serialize};

use crate::projects::ProjectSortBy;
use crate::shortcuts::{Accelerator, Platform};

use super::defaults::*;

// ============================================
// SEARCH CONFIG
// ============================================

/// Tuning for the project ranking engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Rebuild debounce window in milliseconds (default: 300)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum query length for fuzzy matching (default: 2)
    #[serde(default = "default_min_match_char_length")]
    pub min_match_char_length: usize,
    /// 0.0 = exact only, 1.0 = anything goes (default: 0.2)
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_name_weight")]
    pub name_weight: f64,
    #[serde(default = "default_alias_weight")]
    pub alias_weight: f64,
    #[serde(default = "default_path_weight")]
    pub path_weight: f64,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}
fn default_min_match_char_length() -> usize {
    DEFAULT_MIN_MATCH_CHAR_LENGTH
}
fn default_threshold() -> f64 {
    DEFAULT_SEARCH_THRESHOLD
}
fn default_name_weight() -> f64 {
    DEFAULT_NAME_WEIGHT
}
fn default_alias_weight() -> f64 {
    DEFAULT_ALIAS_WEIGHT
}
fn default_path_weight() -> f64 {
    DEFAULT_PATH_WEIGHT
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            min_match_char_length: DEFAULT_MIN_MATCH_CHAR_LENGTH,
            threshold: DEFAULT_SEARCH_THRESHOLD,
            name_weight: DEFAULT_NAME_WEIGHT,
            alias_weight: DEFAULT_ALIAS_WEIGHT,
            path_weight: DEFAULT_PATH_WEIGHT,
        }
    }
}

impl SearchConfig {
    /// Index rebuild debounce window as a `Duration`
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

// ============================================
// RECORDER CONFIG
// ============================================

/// Shortcut recorder settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderConfig {
    /// Display platform override; detected from the build target when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

impl RecorderConfig {
    pub fn display_platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}

// ============================================
// MAIN CONFIG
// ============================================

/// Launcher core configuration, loaded from ~/.project-launcher/config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub recorder: RecorderConfig,
    /// Default project list order: "hits" | "last_opened" | "name"
    #[serde(default)]
    pub project_sort_by: ProjectSortBy,
    /// Launcher show/hide shortcut; `null` disables it
    #[serde(default = "default_global_shortcut")]
    pub global_shortcut: Option<Accelerator>,
}

fn default_global_shortcut() -> Option<Accelerator> {
    Accelerator::parse(DEFAULT_GLOBAL_SHORTCUT).ok()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search: SearchConfig::default(),
            recorder: RecorderConfig::default(),
            project_sort_by: ProjectSortBy::default(),
            global_shortcut: default_global_shortcut(),
        }
    }
}
