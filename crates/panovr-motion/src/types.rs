use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Raw sensor reading from the device IMU.
#[derive(Debug, Clone, Copy)]
pub struct RawImuSample {
    /// Gyroscope angular velocity (rad/s).
    pub gyro: Vec3,
    /// Accelerometer linear acceleration (m/s^2).
    pub accel: Vec3,
}

/// Device attitude sample: orientation quaternion plus derived Euler angles.
///
/// Snapshots are immutable once published; the consumer only ever reads the
/// latest one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    /// Absolute orientation as a unit quaternion.
    pub quaternion: Quat,
    /// Rotation about the device Y axis (radians).
    pub roll: f32,
    /// Rotation about the device X axis (radians).
    pub pitch: f32,
    /// Rotation about the device Z axis (radians).
    pub yaw: f32,
}

impl Attitude {
    /// Build an attitude from a quaternion, deriving roll/pitch/yaw with the
    /// device-motion convention.
    pub fn from_quaternion(quaternion: Quat) -> Self {
        let [x, y, z, w] = quaternion.to_array();
        let roll = (2.0 * (y * w - x * z)).atan2(1.0 - 2.0 * y * y - 2.0 * z * z);
        let pitch = (2.0 * (x * w + y * z)).atan2(1.0 - 2.0 * x * x - 2.0 * z * z);
        // Clamp so rounding just past +/-1 doesn't produce NaN.
        let yaw = (2.0 * x * y + 2.0 * w * z).clamp(-1.0, 1.0).asin();
        Self {
            quaternion,
            roll,
            pitch,
            yaw,
        }
    }
}

impl Default for Attitude {
    fn default() -> Self {
        Self::from_quaternion(Quat::IDENTITY)
    }
}

/// How the device is currently held, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenOrientation {
    Portrait,
    PortraitUpsideDown,
    #[default]
    LandscapeLeft,
    LandscapeRight,
}

/// Euler angles for the static camera-rig mount, applied about x, y, z in
/// that component order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MountAngles {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

/// Per-frame angles for the three rig joints.
///
/// The roll joint turns about X, the pitch joint about Z and the yaw joint
/// about Y. This matches the rig hierarchy the mount angles were tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigJointAngles {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}
