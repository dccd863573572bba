//! Run and presentation settings
//!
//! Loaded from a JSON file; the game rules themselves are fixed constants and
//! are not configurable here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "BLADE_BALLS_SETTINGS";
/// Used when the environment variable is unset
pub const DEFAULT_SETTINGS_FILE: &str = "blade_balls.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; random when absent
    pub seed: Option<u64>,
    /// Simulate as fast as possible without a terminal display
    pub headless: bool,
    /// Quit after this many frames even without a winner
    pub max_frames: Option<u64>,
    /// Health readouts in the corner
    pub show_hud: bool,

    // === Terminal ===
    pub terminal_columns: u16,
    pub terminal_rows: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            headless: false,
            max_frames: None,
            show_hud: true,
            terminal_columns: 80,
            terminal_rows: 30,
        }
    }
}

impl Settings {
    /// Settings file location from the environment, or the default name
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    /// Load settings from the configured file
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
