//! Level sinks: where encoded levels go.
//!
//! [`LevelSink`] is the seam between the streaming loop and the device.
//! [`TokenWriter`] is the production implementation over any
//! [`std::io::Write`], normally a `Box<dyn serialport::SerialPort>`.

use std::io::{self, Write};

use crate::audio::Level;

/// Receives one [`Level`] per chunk.
pub trait LevelSink {
    /// Deliver `level` to the device.
    fn send(&mut self, level: Level) -> io::Result<()>;

    /// Push out anything still buffered.  Called once when the stream ends.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes levels as newline-terminated ASCII tokens.
#[derive(Debug)]
pub struct TokenWriter<W: Write> {
    inner: W,
    tokens_written: usize,
}

impl<W: Write> TokenWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            tokens_written: 0,
        }
    }

    /// Tokens successfully written so far.
    pub fn tokens_written(&self) -> usize {
        self.tokens_written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> LevelSink for TokenWriter<W> {
    fn send(&mut self, level: Level) -> io::Result<()> {
        self.inner.write_all(level.token().as_bytes())?;
        self.inner.flush()?;
        self.tokens_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
