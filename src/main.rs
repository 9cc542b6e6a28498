//! Application entry point for audio-led-sync.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (defaults when missing), apply CLI flags.
//! 3. Build the [`LevelEncoder`] from the level settings.
//! 4. Open the serial port and wait for the device to settle.
//! 5. Open the WAV file.
//! 6. Run the [`LevelStreamer`] until the file is exhausted.
//!
//! Any failure in steps 2–5 is fatal: the error is reported and the process
//! exits non-zero.  Failures during step 6 only skip the affected chunk.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use audio_led_sync::{
    audio::{ChunkReader, LevelEncoder},
    config::{AppConfig, AppPaths},
    pipeline::{LevelStreamer, ThreadPacer},
    serial::{open_port, settle, TokenWriter},
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "audio-led-sync")]
#[command(about = "Stream WAV loudness levels to an LED controller over serial")]
#[command(version)]
struct Args {
    /// 16-bit PCM WAV file to stream
    wav: Option<PathBuf>,

    /// Serial device (e.g. COM3, /dev/ttyUSB0)
    #[arg(short, long, env = "AUDIO_LED_SYNC_PORT")]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long, env = "AUDIO_LED_SYNC_BAUD")]
    baud: Option<u32>,

    /// Settings file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RMS units per level step
    #[arg(long)]
    divisor: Option<f64>,

    /// Highest level sent to the device
    #[arg(long)]
    max_level: Option<u8>,

    /// Chunk length in milliseconds
    #[arg(long)]
    chunk_ms: Option<u64>,

    /// Pause after each send in milliseconds
    #[arg(long)]
    pace_ms: Option<u64>,

    /// Wait after opening the port in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Write the effective settings to the settings file and exit
    #[arg(long)]
    write_config: bool,
}

impl Args {
    fn settings_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| AppPaths::new().settings_file)
    }

    /// Layer command-line values over the loaded settings.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(wav) = &self.wav {
            config.audio.wav_path = Some(wav.clone());
        }
        if let Some(port) = &self.port {
            config.serial.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(divisor) = self.divisor {
            config.level.divisor = divisor;
        }
        if let Some(max_level) = self.max_level {
            config.level.max_level = max_level;
        }
        if let Some(chunk_ms) = self.chunk_ms {
            config.audio.chunk_ms = chunk_ms;
        }
        if let Some(pace_ms) = self.pace_ms {
            config.playback.pace_ms = pace_ms;
        }
        if let Some(settle_ms) = self.settle_ms {
            config.serial.settle_ms = settle_ms;
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Configuration
    let args = Args::parse();
    let settings_path = args.settings_path();
    let mut config = AppConfig::load_from(&settings_path)?;
    args.apply(&mut config);

    if args.write_config {
        config.save_to(&settings_path)?;
        log::info!("settings written to {}", settings_path.display());
        return Ok(());
    }

    let wav_path = config
        .audio
        .wav_path
        .clone()
        .context("no WAV file given; pass a path or set [audio] wav_path")?;

    // 3. Level encoder
    let encoder = LevelEncoder::from_config(&config.level)?;
    log::info!(
        "levels 0..={} at {} RMS per step",
        encoder.max_level(),
        encoder.divisor()
    );

    // 4. Serial port
    let port = open_port(&config.serial)?;
    log::info!(
        "connected to {} at {} baud",
        config.serial.port,
        config.serial.baud_rate
    );
    settle(&config.serial);

    // 5. WAV file
    let reader = ChunkReader::open(&wav_path, config.audio.chunk_ms)
        .with_context(|| format!("failed to load WAV file {}", wav_path.display()))?;
    log::info!(
        "opened {}: {} Hz, {} ch, {:.1} s, {} chunks of {} frames",
        wav_path.display(),
        reader.sample_rate(),
        reader.channels(),
        reader.duration().as_secs_f64(),
        reader.expected_chunks(),
        reader.chunk_size()
    );

    // 6. Stream
    log::info!("starting LED sync playback");
    let mut streamer = LevelStreamer::new(
        reader,
        encoder,
        TokenWriter::new(port),
        ThreadPacer,
        Duration::from_millis(config.playback.pace_ms),
    );
    let summary = streamer.run();
    // closes the WAV file and the serial port
    drop(streamer);

    log::info!("playback finished: {summary}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let args = Args::try_parse_from([
            "audio-led-sync",
            "song.wav",
            "--port",
            "COM9",
            "--baud",
            "57600",
            "--divisor",
            "1500",
            "--max-level",
            "8",
            "--pace-ms",
            "25",
        ])
        .expect("parse");

        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.audio.wav_path, Some(PathBuf::from("song.wav")));
        assert_eq!(config.serial.port, "COM9");
        assert_eq!(config.serial.baud_rate, 57_600);
        assert_eq!(config.level.divisor, 1_500.0);
        assert_eq!(config.level.max_level, 8);
        assert_eq!(config.playback.pace_ms, 25);
        assert_eq!(config.audio.chunk_ms, 50);
    }

    fn bare_args(config: Option<&str>) -> Args {
        Args {
            wav: None,
            port: None,
            baud: None,
            config: config.map(PathBuf::from),
            divisor: None,
            max_level: None,
            chunk_ms: None,
            pace_ms: None,
            settle_ms: None,
            write_config: false,
        }
    }

    #[test]
    fn no_flags_leave_settings_untouched() {
        let args = bare_args(Some("custom.toml"));

        let mut config = AppConfig::default();
        config.audio.wav_path = Some(PathBuf::from("from-file.wav"));
        config.serial.port = "COM4".into();
        let before = config.clone();
        args.apply(&mut config);

        assert_eq!(config, before);
        assert_eq!(args.settings_path(), PathBuf::from("custom.toml"));
    }

    #[test]
    fn settings_path_defaults_to_platform_location() {
        assert_eq!(bare_args(None).settings_path(), AppPaths::new().settings_file);
    }
}
