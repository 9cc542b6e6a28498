//! Where `settings.toml` lives.
//!
//! The directory comes from `dirs::config_dir()`, e.g. `~/.config` on Linux,
//! `%APPDATA%` on Windows and `~/Library/Application Support` on macOS, with
//! an `audio-led-sync` subdirectory.  The working directory is used when the
//! platform reports none.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "audio-led-sync";
const SETTINGS_FILE: &str = "settings.toml";

/// Resolved location of the settings file.
#[derive(Debug, Clone, PartialEq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::under(&base)
    }

    /// Layout rooted at `base` instead of the platform config directory.
    pub fn under(base: &Path) -> Self {
        let config_dir = base.join(APP_DIR);
        let settings_file = config_dir.join(SETTINGS_FILE);
        Self {
            config_dir,
            settings_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
