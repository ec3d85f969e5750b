//! # Payload Codec
//!
//! Decoder for the secondary payload downlink: header `0xAA`, 27 bytes
//! total, footer `0x55`. The payload region carries six consecutive
//! little-endian f32 fields.

use super::{read_f32_le, FrameLayout};
use crate::error::{BridgeError, Result};
use serde::Serialize;

/// Payload frame header byte
pub const PAYLOAD_HEADER: u8 = 0xAA;

/// Payload frame footer byte
pub const PAYLOAD_FOOTER: u8 = 0x55;

/// Total payload frame length: 6 f32 + checksum + header/footer
pub const PAYLOAD_FRAME_LEN: usize = 27;

/// Frame geometry for the payload channel reassembler
pub const fn frame_layout() -> FrameLayout {
    FrameLayout {
        header: PAYLOAD_HEADER,
        footer: PAYLOAD_FOOTER,
        length: PAYLOAD_FRAME_LEN,
    }
}

/// One decoded payload frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PayloadSample {
    /// Payload GPS latitude in degrees
    pub payload_latitude: f32,

    /// Payload GPS longitude in degrees
    pub payload_longitude: f32,

    /// Payload GPS altitude in meters
    pub payload_altitude: f32,

    /// Barometric pressure in hPa
    pub pressure: f32,

    /// Computed air density in kg/m³
    pub air_density: f32,

    /// Ambient temperature in °C
    pub temperature: f32,
}

/// Decode a checksum-validated payload frame
///
/// # Arguments
///
/// * `frame` - Complete 27-byte frame (header through footer)
///
/// # Returns
///
/// * `Result<PayloadSample>` - All 6 fields, or error on wrong length
///
/// # Errors
///
/// Returns `BridgeError::Protocol` if the slice is not exactly 27 bytes.
pub fn decode_payload(frame: &[u8]) -> Result<PayloadSample> {
    if frame.len() != PAYLOAD_FRAME_LEN {
        return Err(BridgeError::Protocol(format!(
            "payload frame must be {} bytes, got {}",
            PAYLOAD_FRAME_LEN,
            frame.len()
        )));
    }

    let payload = &frame[1..PAYLOAD_FRAME_LEN - 2];

    Ok(PayloadSample {
        payload_latitude: read_f32_le(payload, 0),
        payload_longitude: read_f32_le(payload, 4),
        payload_altitude: read_f32_le(payload, 8),
        pressure: read_f32_le(payload, 12),
        air_density: read_f32_le(payload, 16),
        temperature: read_f32_le(payload, 20),
    })
}
