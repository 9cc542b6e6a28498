//! Configuration module for audio-led-sync.
//!
//! Provides `AppConfig` (top-level settings), one sub-config per pipeline
//! stage, `AppPaths` for the platform settings location, and TOML
//! persistence via `AppConfig::load_from` / `AppConfig::save_to`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AudioConfig, LevelConfig, PlaybackConfig, SerialConfig};
