//! Send-loop pacing.
//!
//! The streamer pauses for a fixed duration after every successful send.
//! Time spent decoding, encoding and writing is not subtracted, so on long
//! files the LEDs slowly fall behind real playback.

use std::time::Duration;

/// Suspends the streaming loop between sends.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

/// Blocks the calling thread with [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
