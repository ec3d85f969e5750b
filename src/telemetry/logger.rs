//! # Sample Logger
//!
//! Append-only file logging of decoded telemetry.
//!
//! Two files are maintained:
//! - the payload sample log: one space-separated line of the six payload
//!   floats per successful payload decode
//! - the merged raw log: one line of the thirteen avionics values followed
//!   by the five payload-only values, appended after every successful
//!   decode on either channel
//!
//! Write failures are logged and swallowed; losing a log line never stalls
//! the decode path.

use crate::protocol::payload::PayloadSample;
use crate::telemetry::TelemetrySnapshot;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Append-only writer for decoded sample files
#[derive(Debug, Clone)]
pub struct SampleLogger {
    payload_log_path: PathBuf,
    merged_log_path: PathBuf,
}

impl SampleLogger {
    /// Create a logger appending to the two given files
    ///
    /// Files are created on first append; nothing is touched up front.
    pub fn new(payload_log_path: impl Into<PathBuf>, merged_log_path: impl Into<PathBuf>) -> Self {
        Self {
            payload_log_path: payload_log_path.into(),
            merged_log_path: merged_log_path.into(),
        }
    }

    /// Append one payload sample line
    pub async fn log_payload(&self, sample: &PayloadSample) {
        let line = format!(
            "{} {} {} {} {} {}\n",
            sample.payload_latitude,
            sample.payload_longitude,
            sample.payload_altitude,
            sample.pressure,
            sample.air_density,
            sample.temperature
        );
        self.append(&self.payload_log_path, &line).await;
    }

    /// Append one merged avionics + payload line from a table snapshot
    pub async fn log_merged(&self, snapshot: &TelemetrySnapshot) {
        let line = format!(
            "{} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {}\n",
            snapshot.rocket_latitude,
            snapshot.rocket_longitude,
            snapshot.rocket_altitude,
            snapshot.pressure,
            snapshot.pressure_altitude,
            snapshot.accel_x,
            snapshot.accel_y,
            snapshot.accel_z,
            snapshot.gyro_x,
            snapshot.gyro_y,
            snapshot.gyro_z,
            snapshot.tilt_angle,
            snapshot.parachute_deployed,
            snapshot.payload_latitude,
            snapshot.payload_longitude,
            snapshot.payload_altitude,
            snapshot.air_density,
            snapshot.temperature
        );
        self.append(&self.merged_log_path, &line).await;
    }

    async fn append(&self, path: &Path, line: &str) {
        let result = async {
            let mut file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .await?;
            file.write_all(line.as_bytes()).await
        }
        .await;

        if let Err(error) = result {
            warn!("failed to append to {}: {}", path.display(), error);
        }
    }
}
