//! Streaming loop: drives chunk → level → serial token until the source is
//! exhausted.
//!
//! # Flow
//!
//! ```text
//! ChunkSource::next_chunk
//!   ├─ Ok(None)        → finish sink, return summary
//!   ├─ Err(decode)     → warn, skip chunk, continue
//!   └─ Ok(Some(chunk)) → LevelEncoder::encode → LevelSink::send
//!                          ├─ Ok  → Pacer::pause(pace)
//!                          └─ Err → warn, skip chunk, continue
//! ```
//!
//! Per-chunk failures never stop the loop: there is no retry, no backoff and
//! no failure threshold.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::audio::{ChunkSource, Level, LevelEncoder, ReaderError};
use crate::serial::LevelSink;

use super::pacing::Pacer;

// ---------------------------------------------------------------------------
// ChunkError
// ---------------------------------------------------------------------------

/// A failure confined to a single chunk.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// The chunk's samples could not be decoded.
    #[error(transparent)]
    Decode(#[from] ReaderError),

    /// The level was computed but could not be written to the device.
    #[error("failed to send level {level} for chunk {index}: {source}")]
    Send {
        index: usize,
        level: Level,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// StreamSummary
// ---------------------------------------------------------------------------

/// Counters collected over one complete stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamSummary {
    /// Levels written to the sink, in send order.
    pub sent: Vec<Level>,
    /// Chunks dropped because their samples could not be decoded.
    pub decode_failures: usize,
    /// Chunks dropped because the write to the sink failed.
    pub send_failures: usize,
}

impl StreamSummary {
    pub fn levels_sent(&self) -> usize {
        self.sent.len()
    }

    pub fn failures(&self) -> usize {
        self.decode_failures + self.send_failures
    }

    /// Loudest level sent, if any.
    pub fn peak(&self) -> Option<Level> {
        self.sent.iter().copied().max()
    }

    fn record_failure(&mut self, err: &ChunkError) {
        match err {
            ChunkError::Decode(_) => self.decode_failures += 1,
            ChunkError::Send { .. } => self.send_failures += 1,
        }
    }
}

impl fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} levels sent", self.levels_sent())?;
        if let Some(peak) = self.peak() {
            write!(f, " (peak {peak})")?;
        }
        if self.failures() > 0 {
            write!(
                f,
                ", {} chunks skipped ({} decode, {} send)",
                self.failures(),
                self.decode_failures,
                self.send_failures
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LevelStreamer
// ---------------------------------------------------------------------------

/// Owns the audio source and the device sink for the duration of a stream.
///
/// Both are released when the streamer is dropped.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use audio_led_sync::audio::{ChunkReader, LevelEncoder};
/// use audio_led_sync::config::SerialConfig;
/// use audio_led_sync::pipeline::{LevelStreamer, ThreadPacer};
/// use audio_led_sync::serial::{open_port, TokenWriter};
///
/// let reader = ChunkReader::open("song.wav", 50).unwrap();
/// let port = open_port(&SerialConfig::default()).unwrap();
///
/// let mut streamer = LevelStreamer::new(
///     reader,
///     LevelEncoder::default(),
///     TokenWriter::new(port),
///     ThreadPacer,
///     Duration::from_millis(50),
/// );
/// let summary = streamer.run();
/// println!("{summary}");
/// ```
pub struct LevelStreamer<S, K, P> {
    source: S,
    encoder: LevelEncoder,
    sink: K,
    pacer: P,
    pace: Duration,
}

impl<S, K, P> LevelStreamer<S, K, P>
where
    S: ChunkSource,
    K: LevelSink,
    P: Pacer,
{
    /// Create a streamer.
    ///
    /// # Arguments
    ///
    /// * `source` : chunk producer, normally a [`crate::audio::ChunkReader`].
    /// * `encoder`: RMS → level quantiser.
    /// * `sink`   : device writer, normally a [`crate::serial::TokenWriter`].
    /// * `pacer`  : sleeps `pace` after every successful send.
    pub fn new(source: S, encoder: LevelEncoder, sink: K, pacer: P, pace: Duration) -> Self {
        Self {
            source,
            encoder,
            sink,
            pacer,
            pace,
        }
    }

    /// Stream until the source reports end of stream.
    pub fn run(&mut self) -> StreamSummary {
        let mut summary = StreamSummary::default();

        loop {
            match self.step() {
                Ok(Some(level)) => summary.sent.push(level),
                Ok(None) => break,
                Err(err) => {
                    log::warn!("skipping chunk: {err}");
                    summary.record_failure(&err);
                }
            }
        }

        if let Err(err) = self.sink.finish() {
            log::warn!("failed to flush device at end of stream: {err}");
        }

        log::debug!("stream finished: {summary}");
        summary
    }

    /// Process one chunk.  `Ok(None)` means the source is exhausted.
    pub fn step(&mut self) -> Result<Option<Level>, ChunkError> {
        let Some(chunk) = self.source.next_chunk()? else {
            return Ok(None);
        };

        let level = self.encoder.encode(&chunk.samples, chunk.channels);
        log::info!("chunk {}: level {level}", chunk.index);

        self.sink.send(level).map_err(|source| ChunkError::Send {
            index: chunk.index,
            level,
            source,
        })?;

        self.pacer.pause(self.pace);
        Ok(Some(level))
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Release the source and hand back the sink.
    pub fn into_sink(self) -> K {
        self.sink
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
