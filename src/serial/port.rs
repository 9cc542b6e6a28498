//! Opening the serial device via the `serialport` crate.

use std::time::Duration;

use serialport::SerialPort;
use thiserror::Error;

use crate::config::SerialConfig;

/// Errors raised while acquiring the serial device.
#[derive(Debug, Error)]
pub enum SerialError {
    #[error("failed to open serial port {port} at {baud} baud: {source}")]
    Open {
        port: String,
        baud: u32,
        #[source]
        source: serialport::Error,
    },
}

/// Open the configured serial device for writing.
///
/// # Errors
///
/// Returns [`SerialError::Open`] when the device does not exist, is busy, or
/// rejects the line settings.
pub fn open_port(config: &SerialConfig) -> Result<Box<dyn SerialPort>, SerialError> {
    let port = serialport::new(config.port.as_str(), config.baud_rate)
        .timeout(Duration::from_millis(config.timeout_ms))
        .open()
        .map_err(|source| SerialError::Open {
            port: config.port.clone(),
            baud: config.baud_rate,
            source,
        })?;

    log::debug!("serial: opened {} at {} baud", config.port, config.baud_rate);
    Ok(port)
}

/// Block for the configured settle delay so a board that resets on connect
/// is listening before the first token arrives.
pub fn settle(config: &SerialConfig) {
    if config.settle_ms > 0 {
        log::debug!("serial: waiting {} ms for the device to settle", config.settle_ms);
        std::thread::sleep(Duration::from_millis(config.settle_ms));
    }
}
