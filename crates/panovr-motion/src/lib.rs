pub mod fusion;
pub mod orientation;
pub mod replay;
pub mod types;

use fusion::SensorFusion;
use glam::Quat;
use replay::ImuRecording;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use types::{Attitude, RawImuSample};

pub use orientation::{FrameUpdate, OrientationEngine};
pub use types::ScreenOrientation;

/// Commands sent to the sampling task.
enum MotionCommand {
    SetZero,
    Recalibrate(u32),
}

/// Latest-attitude slot fed by a background sampling task.
///
/// The sampling task is the only writer; the frame loop is the only reader
/// and pulls whatever sample is newest when it ticks. `latest` returns `None`
/// until the first sample has been published.
pub struct MotionManager {
    attitude_rx: watch::Receiver<Option<Attitude>>,
    command_tx: mpsc::UnboundedSender<MotionCommand>,
    task: tokio::task::JoinHandle<()>,
}

impl MotionManager {
    /// Fuse raw IMU samples from `feed` into attitudes.
    pub fn from_feed(
        feed: mpsc::Receiver<RawImuSample>,
        update_interval: Duration,
        madgwick_beta: f32,
        calibration_samples: u32,
    ) -> Self {
        let (attitude_tx, attitude_rx) = watch::channel(None);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let fusion = SensorFusion::new(
            update_interval.as_secs_f64(),
            madgwick_beta,
            calibration_samples,
        );
        tracing::info!(?update_interval, "Starting device motion updates");

        let task = tokio::spawn(fusion_loop(feed, attitude_tx, command_rx, fusion));
        Self {
            attitude_rx,
            command_tx,
            task,
        }
    }

    /// Replay a recorded raw IMU stream through the fusion filter, looping at
    /// the end of the recording.
    pub fn replay(
        recording: ImuRecording,
        update_interval: Duration,
        madgwick_beta: f32,
        calibration_samples: u32,
    ) -> Self {
        let (feed_tx, feed_rx) = mpsc::channel(64);
        // Ends on its own once the fusion task drops the receiver.
        tokio::spawn(replay::replay_loop(recording, feed_tx, update_interval));
        Self::from_feed(feed_rx, update_interval, madgwick_beta, calibration_samples)
    }

    /// Synthetic slow head sweep published at `update_interval`, for running
    /// without motion hardware.
    pub fn simulated(update_interval: Duration) -> Self {
        let (attitude_tx, attitude_rx) = watch::channel(None);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        tracing::info!(?update_interval, "Starting simulated motion updates");

        let task = tokio::spawn(simulated_loop(attitude_tx, command_rx, update_interval));
        Self {
            attitude_rx,
            command_tx,
            task,
        }
    }

    /// A source that never produces a sample.
    pub fn stationary() -> Self {
        let (attitude_tx, attitude_rx) = watch::channel(None);
        let (command_tx, _) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            // Keep the sender alive.
            let _tx = attitude_tx;
            std::future::pending::<()>().await;
        });
        Self {
            attitude_rx,
            command_tx,
            task,
        }
    }

    /// Latest attitude sample (non-blocking).
    pub fn latest(&self) -> Option<Attitude> {
        *self.attitude_rx.borrow()
    }

    /// Set the current head position as the zero reference.
    pub fn set_zero(&self) {
        let _ = self.command_tx.send(MotionCommand::SetZero);
    }

    /// Restart gyro bias calibration.
    pub fn recalibrate(&self, samples: u32) {
        let _ = self.command_tx.send(MotionCommand::Recalibrate(samples));
    }

    /// Stop sampling. The last published attitude stays readable.
    pub fn stop(&self) {
        self.task.abort();
        tracing::info!("Motion updates stopped");
    }
}

impl Drop for MotionManager {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Background task: fuse raw samples and publish attitudes.
async fn fusion_loop(
    mut feed: mpsc::Receiver<RawImuSample>,
    attitude_tx: watch::Sender<Option<Attitude>>,
    mut command_rx: mpsc::UnboundedReceiver<MotionCommand>,
    mut fusion: SensorFusion,
) {
    let mut sample_count: u64 = 0;

    loop {
        tokio::select! {
            sample = feed.recv() => {
                let Some(sample) = sample else {
                    tracing::warn!("Motion sample feed closed");
                    break;
                };
                if let Some(attitude) = fusion.update(&sample) {
                    let _ = attitude_tx.send(Some(attitude));
                }
                sample_count += 1;
                if sample_count % 600 == 0 {
                    tracing::debug!(sample_count, "Motion samples processed");
                }
            }
            Some(cmd) = command_rx.recv() => {
                match cmd {
                    MotionCommand::SetZero => fusion.set_zero(),
                    MotionCommand::Recalibrate(n) => fusion.recalibrate(n),
                }
            }
        }
    }
}

/// Background task: publish a slow yaw sweep with a gentle pitch bob.
async fn simulated_loop(
    attitude_tx: watch::Sender<Option<Attitude>>,
    mut command_rx: mpsc::UnboundedReceiver<MotionCommand>,
    update_interval: Duration,
) {
    let mut ticker = tokio::time::interval(update_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut elapsed = 0.0_f32;
    let mut zero_ref = Quat::IDENTITY;
    let mut current = Quat::IDENTITY;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                elapsed += update_interval.as_secs_f32();
                current = simulated_pose(elapsed);
                let relative = (zero_ref.conjugate() * current).normalize();
                let _ = attitude_tx.send(Some(Attitude::from_quaternion(relative)));
            }
            Some(cmd) = command_rx.recv() => {
                match cmd {
                    MotionCommand::SetZero => {
                        zero_ref = current;
                        tracing::info!("Zero reference set");
                    }
                    MotionCommand::Recalibrate(_) => {
                        tracing::debug!("Simulated source needs no calibration");
                    }
                }
            }
        }
    }
}

fn simulated_pose(t: f32) -> Quat {
    let yaw = 0.4 * (t * 0.25).sin();
    let pitch = 0.15 * (t * 0.4).sin();
    Quat::from_rotation_z(yaw) * Quat::from_rotation_x(pitch)
}
