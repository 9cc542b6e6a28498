//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`.
//! Every table is `#[serde(default)]`, so a settings file only needs the keys
//! it wants to change.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// SerialConfig
// ---------------------------------------------------------------------------

/// Settings for the serial link to the LED controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device identifier (e.g. `"COM3"`, `"/dev/ttyUSB0"`).
    pub port: String,
    /// Line speed in baud.
    pub baud_rate: u32,
    /// Write timeout in milliseconds.
    pub timeout_ms: u64,
    /// Wait after opening the port before the first token is sent.  Many
    /// boards reset when the host opens the port.
    pub settle_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port().into(),
            baud_rate: 115_200,
            timeout_ms: 1_000,
            settle_ms: 2_000,
        }
    }
}

#[cfg(windows)]
fn default_port() -> &'static str {
    "COM3"
}

#[cfg(not(windows))]
fn default_port() -> &'static str {
    "/dev/ttyUSB0"
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for the WAV source and chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// 16-bit PCM WAV file to stream.  `None` means it must come from the
    /// command line.
    pub wav_path: Option<PathBuf>,
    /// Chunk length in milliseconds.
    pub chunk_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            wav_path: None,
            chunk_ms: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// LevelConfig
// ---------------------------------------------------------------------------

/// Linear RMS → level quantisation constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// RMS units per level step.
    pub divisor: f64,
    /// Highest level ever emitted.
    pub max_level: u8,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            divisor: 2_000.0,
            max_level: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// PlaybackConfig
// ---------------------------------------------------------------------------

/// Pacing of the send loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Fixed sleep after every successful send, in milliseconds.
    ///
    /// Processing time is not subtracted, so the LEDs drift behind the
    /// audio on long files.
    pub pace_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { pace_ms: 50 }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use audio_led_sync::config::AppConfig;
///
/// // Load (returns Default when the file is missing)
/// let config = AppConfig::load().unwrap();
/// assert_eq!(config.serial.baud_rate, 115_200);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Serial link settings.
    pub serial: SerialConfig,
    /// WAV source settings.
    pub audio: AudioConfig,
    /// Level quantisation.
    pub level: LevelConfig,
    /// Send-loop pacing.
    pub playback: PlaybackConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no settings at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
