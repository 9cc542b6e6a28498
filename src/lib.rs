//! Stream per-chunk loudness levels from a 16-bit PCM WAV file to an LED
//! controller over a serial port.
//!
//! ```text
//! WAV file → ChunkReader → LevelEncoder → TokenWriter → serial device
//! ```

pub mod audio;
pub mod config;
pub mod pipeline;
pub mod serial;
