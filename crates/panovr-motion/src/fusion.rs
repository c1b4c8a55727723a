use crate::types::{Attitude, RawImuSample};
use ahrs::{Ahrs, Madgwick};
use glam::{Quat, Vec3};
use nalgebra::Vector3;

/// Sensor fusion using the Madgwick AHRS filter.
///
/// Turns raw gyro + accelerometer readings into attitude samples relative to
/// a zero reference.
pub struct SensorFusion {
    filter: Madgwick<f64>,
    /// Gyroscope bias (average of calibration samples).
    gyro_bias: Vec3,
    calibration: CalibrationState,
    /// Reference quaternion for "set zero".
    zero_ref: Quat,
}

enum CalibrationState {
    Collecting { samples: Vec<Vec3>, target: usize },
    Calibrated,
}

impl SensorFusion {
    /// `sample_period` is the sensor update interval in seconds.
    pub fn new(sample_period: f64, beta: f32, calibration_samples: u32) -> Self {
        Self {
            filter: Madgwick::new(sample_period, beta as f64),
            gyro_bias: Vec3::ZERO,
            calibration: CalibrationState::Collecting {
                samples: Vec::with_capacity(calibration_samples as usize),
                target: calibration_samples as usize,
            },
            zero_ref: Quat::IDENTITY,
        }
    }

    /// Process a raw IMU sample and return the current attitude (if calibrated).
    pub fn update(&mut self, sample: &RawImuSample) -> Option<Attitude> {
        match &mut self.calibration {
            CalibrationState::Collecting { samples, target } => {
                samples.push(sample.gyro);
                if samples.len() >= *target {
                    let sum: Vec3 = samples.iter().copied().sum();
                    self.gyro_bias = sum / samples.len().max(1) as f32;
                    self.calibration = CalibrationState::Calibrated;
                    tracing::info!(
                        bias_x = self.gyro_bias.x,
                        bias_y = self.gyro_bias.y,
                        bias_z = self.gyro_bias.z,
                        "Gyro calibration complete"
                    );
                }
                None
            }
            CalibrationState::Calibrated => {
                let corrected_gyro = sample.gyro - self.gyro_bias;
                let gyro = Vector3::new(
                    corrected_gyro.x as f64,
                    corrected_gyro.y as f64,
                    corrected_gyro.z as f64,
                );
                let accel = Vector3::new(
                    sample.accel.x as f64,
                    sample.accel.y as f64,
                    sample.accel.z as f64,
                );

                // Zero-norm accelerometer readings are rejected by the filter.
                if self.filter.update_imu(&gyro, &accel).is_err() {
                    return None;
                }

                let relative = self.zero_ref.conjugate() * self.absolute();
                Some(Attitude::from_quaternion(relative.normalize()))
            }
        }
    }

    fn absolute(&self) -> Quat {
        let q = self.filter.quat;
        Quat::from_xyzw(
            q.coords[0] as f32,
            q.coords[1] as f32,
            q.coords[2] as f32,
            q.coords[3] as f32, // w component
        )
    }

    /// Set the current orientation as the zero reference.
    pub fn set_zero(&mut self) {
        self.zero_ref = self.absolute();
        tracing::info!("Zero reference set");
    }

    /// Restart gyro bias calibration.
    pub fn recalibrate(&mut self, samples: u32) {
        self.calibration = CalibrationState::Collecting {
            samples: Vec::with_capacity(samples as usize),
            target: samples as usize,
        };
        self.gyro_bias = Vec3::ZERO;
        tracing::info!(samples, "Recalibration started");
    }

    pub fn is_calibrated(&self) -> bool {
        matches!(self.calibration, CalibrationState::Calibrated)
    }
}
