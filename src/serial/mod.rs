//! # Serial Communication Module
//!
//! Opens the three bridge serial endpoints with their fixed settings:
//! 8 data bits, no parity, one stop bit, no flow control. The avionics and
//! payload downlinks run at 9600 baud, the HYI judging uplink at 19200.

pub mod uplink;

use crate::error::{BridgeError, Result};
use tokio_serial::SerialPortBuilderExt;
use tracing::debug;

/// Avionics downlink baud rate
pub const AVIONICS_BAUD_RATE: u32 = 9600;

/// Payload downlink baud rate
pub const PAYLOAD_BAUD_RATE: u32 = 9600;

/// HYI judging uplink baud rate
pub const JUDGING_BAUD_RATE: u32 = 19200;

/// Open a serial port with the bridge's fixed 8N1 settings
///
/// # Arguments
///
/// * `path` - Device path (e.g., "/dev/ttyUSB0")
/// * `baud_rate` - Channel baud rate
///
/// # Returns
///
/// * `Result<SerialStream>` - Opened port
///
/// # Errors
///
/// Returns `BridgeError::PortOpen` if the device is unavailable or access
/// is denied.
pub fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
    debug!("opening serial port {} at {} baud", path, baud_rate);

    tokio_serial::new(path, baud_rate)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(tokio_serial::Parity::None)
        .stop_bits(tokio_serial::StopBits::One)
        .flow_control(tokio_serial::FlowControl::None)
        .open_native_async()
        .map_err(|e| BridgeError::PortOpen(format!("{}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baud_rate_constants() {
        assert_eq!(AVIONICS_BAUD_RATE, 9600);
        assert_eq!(PAYLOAD_BAUD_RATE, 9600);
        assert_eq!(JUDGING_BAUD_RATE, 19200);
    }

    #[test]
    fn test_open_invalid_path_returns_port_open_error() {
        let result = open_port("/dev/nonexistent_serial_device_12345", AVIONICS_BAUD_RATE);

        assert!(result.is_err());
        match result.unwrap_err() {
            BridgeError::PortOpen(message) => {
                assert!(message.contains("/dev/nonexistent_serial_device_12345"));
            }
            other => panic!("expected PortOpen error, got: {:?}", other),
        }
    }
}
