use crate::types::RawImuSample;
use glam::Vec3;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read IMU recording: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed IMU recording: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("IMU recording contains no samples")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RecordedSample {
    gyro: [f32; 3],
    accel: [f32; 3],
}

#[derive(Debug, Deserialize)]
struct RecordingFile {
    samples: Vec<RecordedSample>,
}

/// Raw gyro/accel samples captured from a device, replayed in a loop.
///
/// Stored as TOML:
///
/// ```toml
/// [[samples]]
/// gyro = [0.0, 0.01, 0.0]
/// accel = [0.0, 0.0, 9.81]
/// ```
#[derive(Debug, Clone)]
pub struct ImuRecording {
    samples: Vec<RawImuSample>,
}

impl ImuRecording {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let contents = std::fs::read_to_string(path)?;
        let recording = Self::parse(&contents)?;
        tracing::info!(?path, samples = recording.len(), "Loaded IMU recording");
        Ok(recording)
    }

    pub fn parse(contents: &str) -> Result<Self, ReplayError> {
        let file: RecordingFile = toml::from_str(contents)?;
        if file.samples.is_empty() {
            return Err(ReplayError::Empty);
        }
        let samples = file
            .samples
            .into_iter()
            .map(|s| RawImuSample {
                gyro: Vec3::from_array(s.gyro),
                accel: Vec3::from_array(s.accel),
            })
            .collect();
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[RawImuSample] {
        &self.samples
    }
}

/// Push recorded samples into `feed` at the sensor cadence, wrapping around
/// at the end. Returns once the receiving side goes away.
pub(crate) async fn replay_loop(
    recording: ImuRecording,
    feed: mpsc::Sender<RawImuSample>,
    update_interval: Duration,
) {
    let mut ticker = tokio::time::interval(update_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    for sample in recording.samples.iter().cycle() {
        ticker.tick().await;
        if feed.send(*sample).await.is_err() {
            tracing::debug!("Replay feed closed");
            return;
        }
    }
}
