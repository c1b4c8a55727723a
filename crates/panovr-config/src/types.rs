use panovr_motion::ScreenOrientation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Sensor rates outside this range either round the interval to zero or
/// overflow it.
pub const MIN_UPDATE_RATE_HZ: f32 = 1.0;
pub const MAX_UPDATE_RATE_HZ: f32 = 1000.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("motion update rate must be within {min}..={max} Hz, got {0} Hz", min = MIN_UPDATE_RATE_HZ, max = MAX_UPDATE_RATE_HZ)]
    UpdateRate(f32),
    #[error("{axis} field of view must be within (0, 180) degrees, got {degrees}")]
    FieldOfView { axis: &'static str, degrees: f32 },
    #[error("panorama sphere radius must be positive, got {0}")]
    SphereRadius(f32),
    #[error("panorama sphere needs at least 3 segments, got {0}")]
    SegmentCount(u32),
    #[error("{view} far clip plane must be positive, got {z_far}")]
    ClipPlane { view: &'static str, z_far: f32 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Screen orientation assumed at startup, until the platform reports one.
    pub screen_orientation: ScreenOrientation,
    pub motion: MotionConfig,
    pub gesture: GestureConfig,
    pub panorama: PanoramaConfig,
    pub scene: SceneConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.motion.update_rate_hz;
        if !(MIN_UPDATE_RATE_HZ..=MAX_UPDATE_RATE_HZ).contains(&rate) {
            return Err(ConfigError::UpdateRate(rate));
        }
        for (axis, degrees) in [
            ("horizontal", self.gesture.horizontal_fov_degrees),
            ("vertical", self.gesture.vertical_fov_degrees),
        ] {
            if !(degrees > 0.0 && degrees < 180.0) {
                return Err(ConfigError::FieldOfView { axis, degrees });
            }
        }
        if !(self.panorama.sphere_radius > 0.0) {
            return Err(ConfigError::SphereRadius(self.panorama.sphere_radius));
        }
        if self.panorama.segment_count < 3 {
            return Err(ConfigError::SegmentCount(self.panorama.segment_count));
        }
        for (view, z_far) in [("panorama", self.panorama.z_far), ("scene", self.scene.z_far)] {
            if !(z_far > 0.0) {
                return Err(ConfigError::ClipPlane { view, z_far });
            }
        }
        Ok(())
    }
}

/// Reference frame the motion sensor reports attitude against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferenceFrame {
    /// Z axis vertical, X axis in an arbitrary horizontal direction.
    #[default]
    XArbitraryZVertical,
    /// Z axis vertical, X axis corrected with the magnetometer.
    XArbitraryCorrectedZVertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionSource {
    /// Synthetic head sweep, for running without sensors.
    #[default]
    Simulated,
    /// Raw gyro/accel samples from a TOML recording, fused like a live IMU.
    Replay { path: PathBuf },
    /// No samples at all; cameras stay where gestures leave them.
    Stationary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Attitude sampling rate.
    pub update_rate_hz: f32,
    pub reference_frame: ReferenceFrame,
    pub source: MotionSource,
    /// Madgwick filter beta parameter (convergence speed). Higher = more responsive, less smooth.
    pub madgwick_beta: f32,
    /// Number of stationary samples for gyro bias calibration.
    pub calibration_samples: u32,
}

impl MotionConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.update_rate_hz)
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            update_rate_hz: 60.0,
            reference_frame: ReferenceFrame::default(),
            source: MotionSource::default(),
            madgwick_beta: 0.1,
            calibration_samples: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub horizontal_fov_degrees: f32,
    pub vertical_fov_degrees: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            horizontal_fov_degrees: 60.0,
            vertical_fov_degrees: 60.0,
        }
    }
}

/// Which input writes the panorama camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PanoramaControl {
    /// Device attitude, corrected for screen orientation.
    #[default]
    Motion,
    /// Pan gestures.
    Drag,
}

impl PanoramaControl {
    pub fn toggled(self) -> Self {
        match self {
            Self::Motion => Self::Drag,
            Self::Drag => Self::Motion,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanoramaConfig {
    /// Equirectangular image wrapped onto the sphere.
    pub image: Option<PathBuf>,
    pub sphere_radius: f32,
    pub segment_count: u32,
    /// Far clip plane of the panorama camera.
    pub z_far: f32,
    pub control: PanoramaControl,
}

impl Default for PanoramaConfig {
    fn default() -> Self {
        Self {
            image: None,
            sphere_radius: 999.0,
            segment_count: 96,
            z_far: 999.0,
            control: PanoramaControl::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Far clip plane of the rig camera.
    pub z_far: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self { z_far: 30.0 }
    }
}
