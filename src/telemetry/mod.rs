//! # Telemetry Module
//!
//! The shared latest-value telemetry table and the append-only sample
//! logger built on top of it.
//!
//! The table is the rendezvous point between the two inbound decoders and
//! the outbound HYI transmitter: decoders overwrite the fields their
//! protocol carries, the transmitter snapshots whatever is current. There
//! is no history and no cross-field snapshot consistency between a decode
//! and a concurrent transmit tick; the bridge is a most-recent-value relay.

pub mod logger;

use crate::protocol::avionics::AvionicsSample;
use crate::protocol::payload::PayloadSample;
use serde::Serialize;
use std::sync::Mutex;

/// Every field the bridge tracks
///
/// The stage fields are reserved: they appear in the outbound HYI frame but
/// neither inbound protocol ever populates them, so they stay at their
/// zero defaults for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryField {
    RocketLatitude,
    RocketLongitude,
    RocketAltitude,
    Pressure,
    PressureAltitude,
    AccelX,
    AccelY,
    AccelZ,
    GyroX,
    GyroY,
    GyroZ,
    TiltAngle,
    ParachuteDeployed,
    PayloadLatitude,
    PayloadLongitude,
    PayloadAltitude,
    AirDensity,
    Temperature,
    StageAltitude,
    StageLatitude,
    StageLongitude,
}

/// A full copy of the table at one instant
///
/// All fields default to zero; the table is fully populated from the moment
/// it is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TelemetrySnapshot {
    pub rocket_latitude: f32,
    pub rocket_longitude: f32,
    pub rocket_altitude: f32,
    pub pressure: f32,
    pub pressure_altitude: f32,
    pub accel_x: f32,
    pub accel_y: f32,
    pub accel_z: f32,
    pub gyro_x: f32,
    pub gyro_y: f32,
    pub gyro_z: f32,
    pub tilt_angle: f32,
    pub parachute_deployed: u8,
    pub payload_latitude: f32,
    pub payload_longitude: f32,
    pub payload_altitude: f32,
    pub air_density: f32,
    pub temperature: f32,
    /// Reserved, never written by either decoder
    pub stage_altitude: f32,
    /// Reserved, never written by either decoder
    pub stage_latitude: f32,
    /// Reserved, never written by either decoder
    pub stage_longitude: f32,
}

impl TelemetrySnapshot {
    /// Read one field as f64 (the parachute flag is widened)
    ///
    /// The HYI encoder walks its float slots through this accessor.
    pub fn get(&self, field: TelemetryField) -> f64 {
        match field {
            TelemetryField::RocketLatitude => self.rocket_latitude as f64,
            TelemetryField::RocketLongitude => self.rocket_longitude as f64,
            TelemetryField::RocketAltitude => self.rocket_altitude as f64,
            TelemetryField::Pressure => self.pressure as f64,
            TelemetryField::PressureAltitude => self.pressure_altitude as f64,
            TelemetryField::AccelX => self.accel_x as f64,
            TelemetryField::AccelY => self.accel_y as f64,
            TelemetryField::AccelZ => self.accel_z as f64,
            TelemetryField::GyroX => self.gyro_x as f64,
            TelemetryField::GyroY => self.gyro_y as f64,
            TelemetryField::GyroZ => self.gyro_z as f64,
            TelemetryField::TiltAngle => self.tilt_angle as f64,
            TelemetryField::ParachuteDeployed => self.parachute_deployed as f64,
            TelemetryField::PayloadLatitude => self.payload_latitude as f64,
            TelemetryField::PayloadLongitude => self.payload_longitude as f64,
            TelemetryField::PayloadAltitude => self.payload_altitude as f64,
            TelemetryField::AirDensity => self.air_density as f64,
            TelemetryField::Temperature => self.temperature as f64,
            TelemetryField::StageAltitude => self.stage_altitude as f64,
            TelemetryField::StageLatitude => self.stage_latitude as f64,
            TelemetryField::StageLongitude => self.stage_longitude as f64,
        }
    }
}

/// Shared latest-value store, one live instance per process
///
/// Writers apply a whole decoded frame under a single lock acquisition, so
/// a reader can never observe half of one frame's fields mixed with the
/// previous frame's values for the same field. Readers clone the record and
/// never block a writer for longer than the copy.
#[derive(Debug, Default)]
pub struct TelemetryTable {
    inner: Mutex<TelemetrySnapshot>,
}

impl TelemetryTable {
    /// Create a table with every field at its zero default
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the 13 avionics-carried fields from one decoded frame
    pub fn apply_avionics(&self, sample: &AvionicsSample) {
        let mut state = self.inner.lock().expect("telemetry table lock poisoned");
        state.rocket_latitude = sample.rocket_latitude;
        state.rocket_longitude = sample.rocket_longitude;
        state.rocket_altitude = sample.rocket_altitude;
        state.pressure = sample.pressure;
        state.pressure_altitude = sample.pressure_altitude;
        state.accel_x = sample.accel_x;
        state.accel_y = sample.accel_y;
        state.accel_z = sample.accel_z;
        state.gyro_x = sample.gyro_x;
        state.gyro_y = sample.gyro_y;
        state.gyro_z = sample.gyro_z;
        state.tilt_angle = sample.tilt_angle;
        state.parachute_deployed = sample.parachute_deployed;
    }

    /// Overwrite the 6 payload-carried fields from one decoded frame
    pub fn apply_payload(&self, sample: &PayloadSample) {
        let mut state = self.inner.lock().expect("telemetry table lock poisoned");
        state.payload_latitude = sample.payload_latitude;
        state.payload_longitude = sample.payload_longitude;
        state.payload_altitude = sample.payload_altitude;
        state.pressure = sample.pressure;
        state.air_density = sample.air_density;
        state.temperature = sample.temperature;
    }

    /// Copy the current state of every field
    pub fn snapshot(&self) -> TelemetrySnapshot {
        *self.inner.lock().expect("telemetry table lock poisoned")
    }
}
