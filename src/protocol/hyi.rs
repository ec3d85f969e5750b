//! # HYI Frame Encoder
//!
//! Builds the fixed 78-byte frame the competition judging ground station
//! ("HYI") expects on its serial uplink.
//!
//! Layout:
//!
//! | Offset | Size | Content                                   |
//! |--------|------|-------------------------------------------|
//! | 0      | 4    | Sync `FF FF 54 52`                        |
//! | 4      | 1    | Team identifier                           |
//! | 5      | 1    | Sequence counter (wraps mod 256)          |
//! | 6      | 68   | 17 × f32 little-endian telemetry fields   |
//! | 74     | 1    | Parachute flag                            |
//! | 75     | 1    | Checksum: sum of bytes 4..=74 mod 256     |
//! | 76     | 2    | Terminator `0D 0A`                        |

use super::checksum::sum_mod_256;
use crate::telemetry::{TelemetryField, TelemetrySnapshot};

/// Total HYI frame length
pub const HYI_FRAME_LEN: usize = 78;

/// Fixed sync header
pub const HYI_SYNC: [u8; 4] = [0xFF, 0xFF, 0x54, 0x52];

/// Fixed CR/LF terminator
pub const HYI_TERMINATOR: [u8; 2] = [0x0D, 0x0A];

/// Number of f32 fields carried by the frame
pub const HYI_FLOAT_COUNT: usize = 17;

/// Byte offset of the first f32 field
const FLOATS_OFFSET: usize = 6;

/// Byte offset of the parachute flag
const PARACHUTE_OFFSET: usize = 74;

/// Byte offset of the checksum
const CHECKSUM_OFFSET: usize = 75;

/// The float slots of the frame, in wire order
///
/// The three stage fields are reserved slots that remain at the table
/// default; they are transmitted regardless.
pub const HYI_FIELD_ORDER: [TelemetryField; HYI_FLOAT_COUNT] = [
    TelemetryField::PressureAltitude,
    TelemetryField::RocketAltitude,
    TelemetryField::RocketLatitude,
    TelemetryField::RocketLongitude,
    TelemetryField::PayloadAltitude,
    TelemetryField::PayloadLatitude,
    TelemetryField::PayloadLongitude,
    TelemetryField::StageAltitude,
    TelemetryField::StageLatitude,
    TelemetryField::StageLongitude,
    TelemetryField::GyroX,
    TelemetryField::GyroY,
    TelemetryField::GyroZ,
    TelemetryField::AccelX,
    TelemetryField::AccelY,
    TelemetryField::AccelZ,
    TelemetryField::TiltAngle,
];

/// The 17 floats in the exact order [`HYI_FIELD_ORDER`] enumerates
///
/// Every table field is f32-backed, so the narrowing cast is lossless.
pub fn hyi_floats(snapshot: &TelemetrySnapshot) -> [f32; HYI_FLOAT_COUNT] {
    HYI_FIELD_ORDER.map(|field| snapshot.get(field) as f32)
}

/// Encode a telemetry snapshot into a complete HYI frame
///
/// # Arguments
///
/// * `snapshot` - Current telemetry table contents
/// * `team_id` - Competition team identifier (byte 4)
/// * `sequence` - Current sequence counter value (byte 5)
///
/// # Returns
///
/// * `[u8; 78]` - Wire-ready frame
pub fn encode_hyi_frame(
    snapshot: &TelemetrySnapshot,
    team_id: u8,
    sequence: u8,
) -> [u8; HYI_FRAME_LEN] {
    let mut frame = [0u8; HYI_FRAME_LEN];
    frame[..4].copy_from_slice(&HYI_SYNC);
    frame[4] = team_id;
    frame[5] = sequence;

    let mut offset = FLOATS_OFFSET;
    for value in hyi_floats(snapshot) {
        frame[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        offset += 4;
    }

    frame[PARACHUTE_OFFSET] = snapshot.parachute_deployed;
    frame[CHECKSUM_OFFSET] = sum_mod_256(&frame[4..=PARACHUTE_OFFSET]);
    frame[76..].copy_from_slice(&HYI_TERMINATOR);
    frame
}

/// Extract the 17 f32 fields back out of an encoded frame
///
/// Used by self-checks and tests; the judging station is the real consumer.
pub fn decode_hyi_floats(frame: &[u8; HYI_FRAME_LEN]) -> [f32; HYI_FLOAT_COUNT] {
    let mut floats = [0.0f32; HYI_FLOAT_COUNT];
    for (index, value) in floats.iter_mut().enumerate() {
        let offset = FLOATS_OFFSET + index * 4;
        *value = f32::from_le_bytes([
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]);
    }
    floats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_snapshot() -> TelemetrySnapshot {
        TelemetrySnapshot {
            rocket_latitude: 39.9,
            rocket_longitude: 32.8,
            rocket_altitude: 1500.0,
            pressure: 898.0,
            pressure_altitude: 1496.5,
            accel_x: 0.1,
            accel_y: -0.2,
            accel_z: 3.9,
            gyro_x: 1.0,
            gyro_y: -1.0,
            gyro_z: 0.5,
            tilt_angle: 14.0,
            parachute_deployed: 1,
            payload_latitude: 39.89,
            payload_longitude: 32.81,
            payload_altitude: 820.0,
            air_density: 1.18,
            temperature: 16.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_frame_structure() {
        let frame = encode_hyi_frame(&populated_snapshot(), 22, 7);

        assert_eq!(frame.len(), 78);
        assert_eq!(&frame[..4], &[0xFF, 0xFF, 0x54, 0x52]);
        assert_eq!(frame[4], 22);
        assert_eq!(frame[5], 7);
        assert_eq!(frame[74], 1);
        assert_eq!(&frame[76..], &[0x0D, 0x0A]);
    }

    #[test]
    fn test_float_order_round_trip() {
        let snapshot = populated_snapshot();
        let frame = encode_hyi_frame(&snapshot, 22, 0);
        let floats = decode_hyi_floats(&frame);

        // Bit-identical round trip in the enumerated order
        assert_eq!(floats, hyi_floats(&snapshot));
        assert_eq!(floats[0], snapshot.pressure_altitude);
        assert_eq!(floats[1], snapshot.rocket_altitude);
        assert_eq!(floats[4], snapshot.payload_altitude);
        assert_eq!(floats[7], 0.0); // reserved stage slot
        assert_eq!(floats[10], snapshot.gyro_x);
        assert_eq!(floats[13], snapshot.accel_x);
        assert_eq!(floats[16], snapshot.tilt_angle);
    }

    #[test]
    fn test_field_order_drives_the_encoded_slots() {
        assert_eq!(HYI_FIELD_ORDER[0], TelemetryField::PressureAltitude);
        assert_eq!(HYI_FIELD_ORDER[7], TelemetryField::StageAltitude);
        assert_eq!(HYI_FIELD_ORDER[16], TelemetryField::TiltAngle);

        let snapshot = populated_snapshot();
        let frame = encode_hyi_frame(&snapshot, 22, 0);
        let floats = decode_hyi_floats(&frame);
        for (slot, field) in HYI_FIELD_ORDER.iter().enumerate() {
            assert_eq!(floats[slot], snapshot.get(*field) as f32, "slot {}", slot);
        }
    }

    #[test]
    fn test_checksum_covers_team_id_through_parachute() {
        let frame = encode_hyi_frame(&populated_snapshot(), 22, 41);
        assert_eq!(frame[75], sum_mod_256(&frame[4..75]));
    }

    #[test]
    fn test_all_zero_snapshot_checksum_is_team_plus_sequence() {
        // With every field zero the only nonzero covered bytes are the
        // team id and the sequence counter
        let snapshot = TelemetrySnapshot::default();

        let frame = encode_hyi_frame(&snapshot, 22, 5);
        assert_eq!(frame[75], 27);

        // 200 + 100 = 300, wraps to 44
        let frame = encode_hyi_frame(&snapshot, 200, 100);
        assert_eq!(frame[75], 44);
    }

    #[test]
    fn test_air_density_and_temperature_are_not_transmitted() {
        let mut snapshot = TelemetrySnapshot::default();
        snapshot.air_density = 55.0;
        snapshot.temperature = 99.0;
        snapshot.pressure = 42.0;

        let frame = encode_hyi_frame(&snapshot, 0, 0);
        assert_eq!(decode_hyi_floats(&frame), [0.0; HYI_FLOAT_COUNT]);
    }

    #[test]
    fn test_negative_and_subnormal_floats_survive() {
        let mut snapshot = TelemetrySnapshot::default();
        snapshot.rocket_latitude = -122.4194;
        snapshot.gyro_y = f32::MIN_POSITIVE / 2.0; // subnormal
        snapshot.accel_z = -0.0;

        let frame = encode_hyi_frame(&snapshot, 1, 1);
        let floats = decode_hyi_floats(&frame);
        assert_eq!(floats[2].to_bits(), (-122.4194f32).to_bits());
        assert_eq!(floats[11].to_bits(), (f32::MIN_POSITIVE / 2.0).to_bits());
        assert_eq!(floats[15].to_bits(), (-0.0f32).to_bits());
    }
}
