//! WAV chunk reader built on `hound`.
//!
//! [`ChunkReader`] pulls fixed-size windows of interleaved 16-bit samples
//! from a WAV stream until it is exhausted.  The window length is
//! `trunc(sample_rate × chunk_ms / 1000)` frames, computed once when the
//! reader is opened.  The final chunk may be shorter; it is passed through
//! unpadded.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

use hound::{SampleFormat, WavReader};
use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One window of audio as read from the file.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    /// Zero-based position of this chunk in the stream.
    pub index: usize,
    /// Interleaved signed 16-bit samples.
    pub samples: Vec<i16>,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl AudioChunk {
    /// Number of complete frames in this chunk.
    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            n => self.samples.len() / n as usize,
        }
    }
}

// ---------------------------------------------------------------------------
// ReaderError
// ---------------------------------------------------------------------------

/// Errors surfaced while opening or decoding a WAV stream.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The file could not be opened or its header is not valid WAV.
    #[error("cannot open WAV stream: {0}")]
    Open(#[from] hound::Error),

    /// The stream is valid WAV but not 16-bit integer PCM.
    #[error("unsupported WAV format: {bits}-bit {format:?} (16-bit integer PCM required)")]
    UnsupportedFormat { bits: u16, format: SampleFormat },

    /// Sample data inside a chunk could not be decoded (truncated or
    /// corrupt payload).
    #[error("failed to decode chunk {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: hound::Error,
    },
}

// ---------------------------------------------------------------------------
// ChunkSource
// ---------------------------------------------------------------------------

/// Anything that yields audio chunks in order.
///
/// `Ok(None)` marks the end of the stream.  An `Err` concerns a single chunk;
/// callers may keep pulling afterwards.
pub trait ChunkSource {
    fn next_chunk(&mut self) -> Result<Option<AudioChunk>, ReaderError>;
}

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

/// Reads a 16-bit PCM WAV stream in fixed-duration chunks.
///
/// ```rust,no_run
/// use audio_led_sync::audio::{ChunkReader, ChunkSource};
///
/// let mut reader = ChunkReader::open("song.wav", 50).unwrap();
/// while let Ok(Some(chunk)) = reader.next_chunk() {
///     println!("chunk {}: {} frames", chunk.index, chunk.frames());
/// }
/// ```
pub struct ChunkReader<R: Read> {
    wav: WavReader<R>,
    chunk_size: usize,
    next_index: usize,
    finished: bool,
}

impl<R: Read> std::fmt::Debug for ChunkReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkReader")
            .field("spec", &self.wav.spec())
            .field("chunk_size", &self.chunk_size)
            .field("next_index", &self.next_index)
            .field("finished", &self.finished)
            .finish()
    }
}

impl ChunkReader<BufReader<File>> {
    /// Open a WAV file from disk.
    pub fn open(path: impl AsRef<Path>, chunk_ms: u64) -> Result<Self, ReaderError> {
        let wav = WavReader::open(path)?;
        Self::from_wav(wav, chunk_ms)
    }
}

impl<R: Read> ChunkReader<R> {
    /// Wrap any byte stream containing a WAV file.
    pub fn new(reader: R, chunk_ms: u64) -> Result<Self, ReaderError> {
        let wav = WavReader::new(reader)?;
        Self::from_wav(wav, chunk_ms)
    }

    fn from_wav(wav: WavReader<R>, chunk_ms: u64) -> Result<Self, ReaderError> {
        let spec = wav.spec();
        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(ReaderError::UnsupportedFormat {
                bits: spec.bits_per_sample,
                format: spec.sample_format,
            });
        }

        let chunk_size = chunk_frames(spec.sample_rate, chunk_ms);
        log::debug!(
            "wav: {} Hz, {} ch, {} frames per chunk",
            spec.sample_rate,
            spec.channels,
            chunk_size
        );

        Ok(Self {
            wav,
            chunk_size,
            next_index: 0,
            finished: false,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.wav.spec().sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.wav.spec().channels
    }

    /// Frames per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Total frames declared by the WAV header.
    pub fn total_frames(&self) -> u32 {
        self.wav.duration()
    }

    /// Playback length declared by the WAV header.
    pub fn duration(&self) -> Duration {
        let rate = self.sample_rate().max(1);
        Duration::from_secs_f64(f64::from(self.total_frames()) / f64::from(rate))
    }

    /// Number of chunks a complete read will produce.
    pub fn expected_chunks(&self) -> usize {
        (self.total_frames() as usize).div_ceil(self.chunk_size)
    }
}

impl<R: Read> ChunkSource for ChunkReader<R> {
    fn next_chunk(&mut self) -> Result<Option<AudioChunk>, ReaderError> {
        if self.finished {
            return Ok(None);
        }

        let channels = self.channels();
        let wanted = self.chunk_size.saturating_mul(usize::from(channels));
        let index = self.next_index;
        let mut samples = Vec::with_capacity(wanted.min(self.wav.len() as usize));

        for sample in self.wav.samples::<i16>().take(wanted) {
            match sample {
                Ok(s) => samples.push(s),
                // hound cannot resynchronise after a bad read, so whatever
                // was decoded becomes the last chunk
                Err(source) => {
                    self.finished = true;
                    self.next_index += 1;
                    if samples.is_empty() {
                        return Err(ReaderError::Decode { index, source });
                    }
                    log::warn!(
                        "wav: payload ends early ({source}); keeping {} samples",
                        samples.len()
                    );
                    return Ok(Some(AudioChunk {
                        index,
                        samples,
                        channels,
                    }));
                }
            }
        }

        if samples.is_empty() {
            self.finished = true;
            return Ok(None);
        }

        self.next_index += 1;
        Ok(Some(AudioChunk {
            index,
            samples,
            channels,
        }))
    }
}

/// Frames in one chunk of `chunk_ms` at `sample_rate`, truncated, at least 1.
///
/// Absurd lengths saturate instead of overflowing.
pub fn chunk_frames(sample_rate: u32, chunk_ms: u64) -> usize {
    let frames = u64::from(sample_rate).saturating_mul(chunk_ms) / 1_000;
    usize::try_from(frames.max(1)).unwrap_or(usize::MAX)
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

/// Encode interleaved 16-bit samples as an in-memory WAV file.
#[cfg(test)]
pub(crate) fn wav_bytes(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut buf = Vec::new();
    {
        let mut writer =
            hound::WavWriter::new(std::io::Cursor::new(&mut buf), spec).expect("wav writer");
        for &s in samples {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize");
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn reader_for(sample_rate: u32, channels: u16, samples: &[i16]) -> ChunkReader<Cursor<Vec<u8>>> {
        let bytes = wav_bytes(sample_rate, channels, samples);
        ChunkReader::new(Cursor::new(bytes), 50).expect("open")
    }

    fn drain(reader: &mut impl ChunkSource) -> Vec<AudioChunk> {
        let mut chunks = Vec::new();
        while let Some(chunk) = reader.next_chunk().expect("chunk") {
            chunks.push(chunk);
        }
        chunks
    }

    #[test]
    fn chunk_size_is_fifty_ms_truncated() {
        assert_eq!(chunk_frames(8_000, 50), 400);
        assert_eq!(chunk_frames(44_100, 50), 2_205);
        assert_eq!(chunk_frames(48_000, 50), 2_400);
        assert_eq!(chunk_frames(11_025, 50), 551); // 551.25
        assert_eq!(chunk_frames(22_050, 50), 1_102); // 1102.5
    }

    #[test]
    fn chunk_size_never_zero() {
        assert_eq!(chunk_frames(10, 50), 1);
        assert_eq!(chunk_frames(8_000, 0), 1);
    }

    #[test]
    fn one_second_mono_8k_yields_25_chunks_of_400() {
        let mut reader = reader_for(8_000, 1, &vec![100_i16; 8_000]);
        assert_eq!(reader.chunk_size(), 400);
        assert_eq!(reader.expected_chunks(), 25);

        let chunks = drain(&mut reader);
        assert_eq!(chunks.len(), 25);
        assert!(chunks.iter().all(|c| c.samples.len() == 400));
        assert!(chunks.iter().enumerate().all(|(i, c)| c.index == i));
    }

    #[test]
    fn stereo_chunk_holds_both_channels() {
        let samples: Vec<i16> = (0..1_600).map(|i| i as i16).collect(); // 800 frames
        let mut reader = reader_for(8_000, 2, &samples);

        let chunks = drain(&mut reader);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].samples.len(), 800);
        assert_eq!(chunks[0].frames(), 400);
        assert_eq!(chunks[0].channels, 2);
        assert_eq!(&chunks[1].samples[..2], &[800, 801]);
    }

    #[test]
    fn short_final_chunk_is_not_padded() {
        let mut reader = reader_for(8_000, 1, &vec![1_i16; 1_000]);
        assert_eq!(reader.expected_chunks(), 3);

        let lens: Vec<usize> = drain(&mut reader).iter().map(|c| c.samples.len()).collect();
        assert_eq!(lens, vec![400, 400, 200]);
    }

    #[test]
    fn samples_arrive_in_file_order() {
        let samples: Vec<i16> = (0..900).map(|i| (i % 300) as i16).collect();
        let mut reader = reader_for(8_000, 1, &samples);

        let flat: Vec<i16> = drain(&mut reader).into_iter().flat_map(|c| c.samples).collect();
        assert_eq!(flat, samples);
    }

    #[test]
    fn empty_file_yields_no_chunks() {
        let mut reader = reader_for(8_000, 1, &[]);
        assert_eq!(reader.expected_chunks(), 0);
        assert!(reader.next_chunk().expect("read").is_none());
        assert!(reader.next_chunk().expect("read").is_none());
    }

    #[test]
    fn metadata_reflects_header() {
        let reader = reader_for(16_000, 2, &vec![0_i16; 16_000 * 2 * 3]);
        assert_eq!(reader.sample_rate(), 16_000);
        assert_eq!(reader.channels(), 2);
        assert_eq!(reader.total_frames(), 48_000);
        assert_eq!(reader.duration(), Duration::from_secs(3));
        assert_eq!(reader.chunk_size(), 800);
    }

    #[test]
    fn truncated_payload_keeps_readable_tail() {
        let mut bytes = wav_bytes(8_000, 1, &vec![10_000_i16; 800]);
        bytes.truncate(bytes.len() - 100); // header still declares 800 samples
        let mut reader = ChunkReader::new(Cursor::new(bytes), 50).expect("open");

        let first = reader.next_chunk().expect("first chunk intact");
        assert_eq!(first.map(|c| c.samples.len()), Some(400));

        let tail = reader.next_chunk().expect("tail").expect("short chunk");
        assert_eq!(tail.index, 1);
        assert_eq!(tail.samples.len(), 350);
        assert!(tail.samples.iter().all(|&s| s == 10_000));

        assert!(reader.next_chunk().expect("end").is_none());
    }

    #[test]
    fn half_sample_at_cut_is_dropped_from_tail() {
        let mut bytes = wav_bytes(8_000, 1, &vec![500_i16; 800]);
        bytes.truncate(bytes.len() - 101);
        let mut reader = ChunkReader::new(Cursor::new(bytes), 50).expect("open");

        reader.next_chunk().expect("first").expect("chunk");
        let tail = reader.next_chunk().expect("tail").expect("short chunk");
        assert_eq!(tail.samples.len(), 349);
        assert!(reader.next_chunk().expect("end").is_none());
    }

    #[test]
    fn cut_on_chunk_boundary_is_a_chunk_error_then_end() {
        let mut bytes = wav_bytes(8_000, 1, &vec![500_i16; 800]);
        bytes.truncate(bytes.len() - 800); // exactly the second chunk missing
        let mut reader = ChunkReader::new(Cursor::new(bytes), 50).expect("open");

        reader.next_chunk().expect("first").expect("chunk");
        let err = reader.next_chunk().unwrap_err();
        assert!(matches!(err, ReaderError::Decode { index: 1, .. }), "{err}");
        assert!(reader.next_chunk().expect("end").is_none());
    }

    #[test]
    fn huge_chunk_length_reads_whole_file_in_one_chunk() {
        assert_eq!(chunk_frames(44_100, u64::MAX) as u64, u64::MAX / 1_000);

        let bytes = wav_bytes(44_100, 2, &vec![7_i16; 2_000]);
        let mut reader = ChunkReader::new(Cursor::new(bytes), 100_000_000).expect("open");
        assert_eq!(reader.chunk_size() as u64, 4_410_000_000);
        assert_eq!(reader.expected_chunks(), 1);

        let chunks = drain(&mut reader);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].samples.len(), 2_000);
    }

    #[test]
    fn float_wav_rejected() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut buf = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut buf), spec).expect("writer");
            writer.write_sample(0.5_f32).expect("sample");
            writer.finalize().expect("finalize");
        }

        let err = ChunkReader::new(Cursor::new(buf), 50).unwrap_err();
        assert!(
            matches!(err, ReaderError::UnsupportedFormat { bits: 32, format: SampleFormat::Float }),
            "{err}"
        );
    }

    #[test]
    fn garbage_header_rejected() {
        let err = ChunkReader::new(Cursor::new(b"not a wav file".to_vec()), 50).unwrap_err();
        assert!(matches!(err, ReaderError::Open(_)), "{err}");
    }

    #[test]
    fn missing_file_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = ChunkReader::open(dir.path().join("missing.wav"), 50).unwrap_err();
        assert!(matches!(err, ReaderError::Open(_)), "{err}");
    }

    #[test]
    fn open_reads_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("tone.wav");
        std::fs::write(&path, wav_bytes(8_000, 1, &vec![3_000_i16; 400])).expect("write");

        let mut reader = ChunkReader::open(&path, 50).expect("open");
        assert_eq!(drain(&mut reader).len(), 1);
    }
}
