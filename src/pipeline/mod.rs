//! Streaming pipeline: audio chunks in, paced level tokens out.
//!
//! # Architecture
//!
//! ```text
//! ChunkSource (ChunkReader)
//!        │  AudioChunk
//!        ▼
//! LevelEncoder ──Level──▶ LevelSink (TokenWriter<SerialPort>)
//!                               │
//!                               ▼
//!                         Pacer::pause(pace)
//! ```
//!
//! Single-threaded and blocking; the pacing pause is the only suspension
//! point per chunk.

pub mod pacing;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use pacing::{Pacer, ThreadPacer};
pub use runner::{ChunkError, LevelStreamer, StreamSummary};
