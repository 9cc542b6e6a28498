//! Serial sender: writes one ASCII level token per chunk to the LED
//! controller.
//!
//! # Wire protocol
//!
//! ```text
//! <level>\n      e.g. "0\n" … "5\n"
//! ```
//!
//! One line per chunk, no framing beyond the newline, nothing is read back.
//!
//! # Usage
//!
//! ```no_run
//! use audio_led_sync::audio::Level;
//! use audio_led_sync::config::SerialConfig;
//! use audio_led_sync::serial::{open_port, LevelSink, TokenWriter};
//!
//! let port = open_port(&SerialConfig::default()).expect("serial port");
//! let mut sink = TokenWriter::new(port);
//! sink.send(Level::new(3)).expect("write");
//! ```

pub mod port;
pub mod sink;

pub use port::{open_port, settle, SerialError};
pub use sink::{LevelSink, TokenWriter};
