//! Audio side of the pipeline: WAV file → chunks → levels.
//!
//! # Pipeline
//!
//! ```text
//! WAV file → ChunkReader (hound) → AudioChunk → LevelEncoder → Level
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use audio_led_sync::audio::{ChunkReader, ChunkSource, LevelEncoder};
//!
//! let mut reader = ChunkReader::open("song.wav", 50).unwrap();
//! let encoder = LevelEncoder::default();
//!
//! while let Ok(Some(chunk)) = reader.next_chunk() {
//!     let level = encoder.encode(&chunk.samples, chunk.channels);
//!     println!("chunk {} → level {level}", chunk.index);
//! }
//! ```

pub mod level;
pub mod reader;

pub use level::{Level, LevelConfigError, LevelEncoder};
pub use reader::{chunk_frames, AudioChunk, ChunkReader, ChunkSource, ReaderError};

#[cfg(test)]
pub(crate) use reader::wav_bytes;
