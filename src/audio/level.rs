//! Loudness quantisation: one chunk of 16-bit PCM in, one [`Level`] out.
//!
//! [`LevelEncoder`] maps a chunk to a discrete level with a fixed linear
//! scale:
//!
//! | Step | Description |
//! |------|-------------|
//! | Channel select | Stereo keeps the even-indexed (first) channel only |
//! | Silence | Empty or all-zero input is level 0 |
//! | RMS | `sqrt(mean(sample²))`, accumulated in `f64` |
//! | Quantise | `floor(rms / divisor)`, capped at `max_level` |
//!
//! # Example
//!
//! ```rust
//! use audio_led_sync::audio::{Level, LevelEncoder};
//!
//! let encoder = LevelEncoder::default(); // divisor 2000, cap 5
//!
//! assert_eq!(encoder.encode(&[0; 400], 1), Level::ZERO);
//! assert_eq!(encoder.encode(&[2_000; 400], 1).value(), 1);
//! assert_eq!(encoder.encode(&[12_000; 400], 1).value(), 5);
//! ```

use std::fmt;

use thiserror::Error;

use crate::config::LevelConfig;

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Discrete loudness value sent to the LED controller for one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    /// Silence.
    pub const ZERO: Level = Level(0);

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Wire form: ASCII decimal followed by `\n`.
    pub fn token(self) -> String {
        format!("{}\n", self.0)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

// ---------------------------------------------------------------------------
// LevelConfigError
// ---------------------------------------------------------------------------

/// Rejected quantisation settings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LevelConfigError {
    /// The divisor must be a finite number greater than zero.
    #[error("level divisor must be finite and > 0, got {0}")]
    InvalidDivisor(f64),
}

// ---------------------------------------------------------------------------
// LevelEncoder
// ---------------------------------------------------------------------------

/// Converts PCM chunks into [`Level`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelEncoder {
    divisor: f64,
    max_level: u8,
}

impl Default for LevelEncoder {
    fn default() -> Self {
        Self {
            divisor: 2_000.0,
            max_level: 5,
        }
    }
}

impl LevelEncoder {
    pub fn new(divisor: f64, max_level: u8) -> Result<Self, LevelConfigError> {
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(LevelConfigError::InvalidDivisor(divisor));
        }
        Ok(Self { divisor, max_level })
    }

    pub fn from_config(config: &LevelConfig) -> Result<Self, LevelConfigError> {
        Self::new(config.divisor, config.max_level)
    }

    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Quantise one chunk of interleaved samples.
    ///
    /// `channels` is the interleave width reported by the decoder.  With two
    /// channels only the first one is measured; the second is dropped, not
    /// mixed.  Any other width is measured as-is.
    pub fn encode(&self, samples: &[i16], channels: u16) -> Level {
        match rms(channel_samples(samples, channels)) {
            None => Level::ZERO,
            Some(rms) => {
                let steps = (rms / self.divisor).floor();
                Level(steps.min(f64::from(self.max_level)) as u8)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Samples that take part in the level measurement.
pub fn channel_samples(samples: &[i16], channels: u16) -> impl Iterator<Item = i16> + '_ {
    let step = if channels == 2 { 2 } else { 1 };
    samples.iter().step_by(step).copied()
}

/// Root-mean-square of `samples`, or `None` for empty or all-zero input.
pub fn rms(samples: impl Iterator<Item = i16>) -> Option<f64> {
    let (count, sum_sq) = samples.fold((0_usize, 0.0_f64), |(n, acc), s| {
        let s = f64::from(s);
        (n + 1, acc + s * s)
    });

    // sum_sq is zero exactly when every sample is zero
    if count == 0 || sum_sq == 0.0 {
        return None;
    }
    Some((sum_sq / count as f64).sqrt())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
