//! Configuration loading from file system
//!
//! Reads the JSON config file. Any failure falls back to defaults.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::error::{LauncherError, ResultExt};

use super::defaults::DEFAULT_CONFIG_PATH;
use super::types::Config;

/// Resolved path of the config file.
pub fn config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref())
}

/// Load configuration from ~/.project-launcher/config.json
///
/// Returns Config::default() if the file is missing or invalid.
#[instrument(name = "load_config")]
pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// Load configuration from an explicit path, falling back to defaults.
pub fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    let Some(content) = std::fs::read_to_string(config_path)
        .map_err(|source| LauncherError::Io {
            path: config_path.display().to_string(),
            source,
        })
        .warn_on_err()
    else {
        return Config::default();
    };

    match serde_json::from_str::<Config>(&content) {
        Ok(config) => {
            let config = sanitize(config);
            info!(path = %config_path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            let hint = if e.to_string().contains("globalShortcut")
                || e.to_string().contains("accelerator")
            {
                "\n\nHint: 'globalShortcut' needs at least one modifier and one key, e.g. \"CommandOrControl+Shift+P\""
            } else {
                ""
            };
            warn!(
                path = %config_path.display(),
                error = %e,
                hint = %hint,
                "Failed to parse config JSON, using defaults"
            );
            Config::default()
        }
    }
}

/// Clamp values that would break search into their valid ranges.
fn sanitize(mut config: Config) -> Config {
    let search = &mut config.search;
    if !(0.0..=1.0).contains(&search.threshold) {
        warn!(
            threshold = search.threshold,
            "search.threshold out of range, clamping to 0.0..=1.0"
        );
        search.threshold = search.threshold.clamp(0.0, 1.0);
    }
    if search.min_match_char_length == 0 {
        warn!("search.minMatchCharLength must be at least 1");
        search.min_match_char_length = 1;
    }
    for (field, weight) in [
        ("nameWeight", &mut search.name_weight),
        ("aliasWeight", &mut search.alias_weight),
        ("pathWeight", &mut search.path_weight),
    ] {
        if !weight.is_finite() || *weight < 0.0 {
            warn!(field, weight = *weight, "Invalid search weight, using 0");
            *weight = 0.0;
        }
    }
    config
}
