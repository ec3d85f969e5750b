//! # Avionics Codec
//!
//! Decoder for the rocket-body avionics downlink: header `0xAB`, 52 bytes
//! total, footer `0x56`. The payload region (bytes 1..=49) carries twelve
//! consecutive little-endian f32 fields followed by a single parachute
//! status byte at payload offset 48.

use super::{read_f32_le, FrameLayout};
use crate::error::{BridgeError, Result};
use serde::Serialize;

/// Avionics frame header byte
pub const AVIONICS_HEADER: u8 = 0xAB;

/// Avionics frame footer byte
pub const AVIONICS_FOOTER: u8 = 0x56;

/// Total avionics frame length: 12 f32 + 1 u8 + checksum + header/footer
pub const AVIONICS_FRAME_LEN: usize = 52;

/// Payload offset of the parachute status byte
const PARACHUTE_OFFSET: usize = 48;

/// Frame geometry for the avionics channel reassembler
pub const fn frame_layout() -> FrameLayout {
    FrameLayout {
        header: AVIONICS_HEADER,
        footer: AVIONICS_FOOTER,
        length: AVIONICS_FRAME_LEN,
    }
}

/// One decoded avionics frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AvionicsSample {
    /// Rocket GPS latitude in degrees
    pub rocket_latitude: f32,

    /// Rocket GPS longitude in degrees
    pub rocket_longitude: f32,

    /// Rocket GPS altitude in meters
    pub rocket_altitude: f32,

    /// Barometric pressure in hPa
    pub pressure: f32,

    /// Barometric altitude in meters
    pub pressure_altitude: f32,

    /// Acceleration X axis in g
    pub accel_x: f32,

    /// Acceleration Y axis in g
    pub accel_y: f32,

    /// Acceleration Z axis in g
    pub accel_z: f32,

    /// Gyroscope X axis in deg/s
    pub gyro_x: f32,

    /// Gyroscope Y axis in deg/s
    pub gyro_y: f32,

    /// Gyroscope Z axis in deg/s
    pub gyro_z: f32,

    /// Tilt angle from vertical in degrees
    pub tilt_angle: f32,

    /// Parachute deployment flag (0 = stowed)
    pub parachute_deployed: u8,
}

/// Decode a checksum-validated avionics frame
///
/// # Arguments
///
/// * `frame` - Complete 52-byte frame (header through footer)
///
/// # Returns
///
/// * `Result<AvionicsSample>` - All 13 fields, or error on wrong length
///
/// # Errors
///
/// Returns `BridgeError::Protocol` if the slice is not exactly 52 bytes.
pub fn decode_avionics(frame: &[u8]) -> Result<AvionicsSample> {
    if frame.len() != AVIONICS_FRAME_LEN {
        return Err(BridgeError::Protocol(format!(
            "avionics frame must be {} bytes, got {}",
            AVIONICS_FRAME_LEN,
            frame.len()
        )));
    }

    // Payload region sits between the header and the checksum byte
    let payload = &frame[1..AVIONICS_FRAME_LEN - 2];

    Ok(AvionicsSample {
        rocket_latitude: read_f32_le(payload, 0),
        rocket_longitude: read_f32_le(payload, 4),
        rocket_altitude: read_f32_le(payload, 8),
        pressure: read_f32_le(payload, 12),
        pressure_altitude: read_f32_le(payload, 16),
        accel_x: read_f32_le(payload, 20),
        accel_y: read_f32_le(payload, 24),
        accel_z: read_f32_le(payload, 28),
        gyro_x: read_f32_le(payload, 32),
        gyro_y: read_f32_le(payload, 36),
        gyro_z: read_f32_le(payload, 40),
        tilt_angle: read_f32_le(payload, 44),
        parachute_deployed: payload[PARACHUTE_OFFSET],
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::protocol::checksum::sum_mod_256;

    /// Build a valid avionics frame from the 12 floats and parachute flag
    pub(crate) fn encode_test_frame(floats: &[f32; 12], parachute: u8) -> Vec<u8> {
        let mut frame = Vec::with_capacity(AVIONICS_FRAME_LEN);
        frame.push(AVIONICS_HEADER);
        for value in floats {
            frame.extend_from_slice(&value.to_le_bytes());
        }
        frame.push(parachute);
        frame.push(sum_mod_256(&frame));
        frame.push(AVIONICS_FOOTER);
        frame
    }

    #[test]
    fn test_decode_wrong_length_rejected() {
        assert!(decode_avionics(&[0u8; 51]).is_err());
        assert!(decode_avionics(&[0u8; 53]).is_err());
    }

    #[test]
    fn test_decode_all_fields() {
        let floats = [
            39.925_018, // rocket_latitude
            32.836_956, // rocket_longitude
            1523.4,     // rocket_altitude
            898.2,      // pressure
            1519.8,     // pressure_altitude
            0.02,       // accel_x
            -0.11,      // accel_y
            3.92,       // accel_z
            1.5,        // gyro_x
            -2.25,      // gyro_y
            0.75,       // gyro_z
            12.5,       // tilt_angle
        ];
        let frame = encode_test_frame(&floats, 1);

        let sample = decode_avionics(&frame).unwrap();
        assert_eq!(sample.rocket_latitude, floats[0]);
        assert_eq!(sample.rocket_longitude, floats[1]);
        assert_eq!(sample.rocket_altitude, floats[2]);
        assert_eq!(sample.pressure, floats[3]);
        assert_eq!(sample.pressure_altitude, floats[4]);
        assert_eq!(sample.accel_x, floats[5]);
        assert_eq!(sample.accel_y, floats[6]);
        assert_eq!(sample.accel_z, floats[7]);
        assert_eq!(sample.gyro_x, floats[8]);
        assert_eq!(sample.gyro_y, floats[9]);
        assert_eq!(sample.gyro_z, floats[10]);
        assert_eq!(sample.tilt_angle, floats[11]);
        assert_eq!(sample.parachute_deployed, 1);
    }

    #[test]
    fn test_decode_all_zero_frame() {
        let frame = encode_test_frame(&[0.0; 12], 0);
        let sample = decode_avionics(&frame).unwrap();
        assert_eq!(sample, AvionicsSample::default());
    }

    #[test]
    fn test_frame_layout_geometry() {
        let layout = frame_layout();
        assert_eq!(layout.header, 0xAB);
        assert_eq!(layout.footer, 0x56);
        assert_eq!(layout.length, 52);
    }

    #[test]
    fn test_fields_are_little_endian() {
        let mut floats = [0.0f32; 12];
        floats[0] = 1.0; // 0x3F800000 -> LE bytes 00 00 80 3F
        let frame = encode_test_frame(&floats, 0);
        assert_eq!(&frame[1..5], &[0x00, 0x00, 0x80, 0x3F]);
    }
}
