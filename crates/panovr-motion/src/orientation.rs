//! Device attitude to camera rotation mapping.
//!
//! Two outputs are produced from each attitude sample: joint angles for the
//! roll/pitch/yaw camera rig of the scene view, and a corrected quaternion
//! for the panorama view. A static mount rotation for the rig is derived from
//! the screen orientation alone.

use crate::types::{Attitude, MountAngles, RigJointAngles, ScreenOrientation};
use glam::Quat;
use std::f32::consts::{FRAC_PI_2, PI};

/// Euler angles that mount the camera rig so "forward" follows the device
/// regardless of how it is held.
pub fn rig_mount_angles(screen: ScreenOrientation) -> MountAngles {
    let (pitch, yaw) = match screen {
        ScreenOrientation::LandscapeLeft => (-FRAC_PI_2, 0.0),
        ScreenOrientation::LandscapeRight => (FRAC_PI_2, 0.0),
        ScreenOrientation::PortraitUpsideDown => (0.0, PI),
        ScreenOrientation::Portrait => (0.0, 0.0),
    };
    MountAngles {
        roll: -FRAC_PI_2,
        pitch,
        yaw,
    }
}

/// Correct a raw sensor quaternion so looking straight ahead maps to the
/// same camera orientation for every way the device can be held.
pub fn adjust_attitude_for_orientation(raw: Quat, screen: ScreenOrientation) -> Quat {
    match screen {
        ScreenOrientation::Portrait => Quat::from_rotation_x(-FRAC_PI_2) * raw,
        ScreenOrientation::LandscapeRight => {
            let q = Quat::from_rotation_y(FRAC_PI_2) * raw;
            Quat::from_xyzw(-q.y, q.x, q.z, q.w)
        }
        ScreenOrientation::LandscapeLeft => {
            let q = Quat::from_rotation_y(-FRAC_PI_2) * raw;
            Quat::from_xyzw(q.y, -q.x, q.z, q.w)
        }
        ScreenOrientation::PortraitUpsideDown => raw,
    }
}

/// Rig joint angles for one attitude sample.
///
/// In landscape-right the sensor reports roll with a flipped reference, so it
/// is remapped as `-(-PI - roll)` before being assigned.
pub fn rig_joint_angles(attitude: &Attitude, screen: ScreenOrientation) -> RigJointAngles {
    let roll = if screen == ScreenOrientation::LandscapeRight {
        -1.0 * (-PI - attitude.roll)
    } else {
        attitude.roll
    };
    RigJointAngles {
        roll,
        pitch: attitude.pitch,
        yaw: attitude.yaw,
    }
}

/// Everything one frame tick writes into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// Joint angles for the sensor-driven rig.
    pub rig_joints: RigJointAngles,
    /// Camera orientation for the quaternion-driven panorama view.
    pub panorama_orientation: Quat,
}

/// Tracks the current screen orientation and turns attitude samples into
/// per-frame camera updates.
#[derive(Debug, Clone)]
pub struct OrientationEngine {
    screen: ScreenOrientation,
    mount: MountAngles,
}

impl OrientationEngine {
    pub fn new(screen: ScreenOrientation) -> Self {
        Self {
            screen,
            mount: rig_mount_angles(screen),
        }
    }

    pub fn screen_orientation(&self) -> ScreenOrientation {
        self.screen
    }

    /// Mount angles for the current screen orientation.
    pub fn mount_angles(&self) -> MountAngles {
        self.mount
    }

    /// Handle an orientation-change event. Returns the mount angles to apply;
    /// repeated calls with the same orientation return the same angles.
    pub fn set_screen_orientation(&mut self, screen: ScreenOrientation) -> MountAngles {
        if screen != self.screen {
            tracing::info!(from = ?self.screen, to = ?screen, "Screen orientation changed");
        }
        self.screen = screen;
        self.mount = rig_mount_angles(screen);
        self.mount
    }

    /// Map the latest attitude into this frame's camera update.
    ///
    /// Returns `None` when no sample has arrived yet; the caller leaves the
    /// cameras where they are for this tick.
    pub fn update(&self, attitude: Option<&Attitude>) -> Option<FrameUpdate> {
        let attitude = attitude?;
        Some(FrameUpdate {
            rig_joints: rig_joint_angles(attitude, self.screen),
            panorama_orientation: adjust_attitude_for_orientation(
                attitude.quaternion,
                self.screen,
            ),
        })
    }
}

impl Default for OrientationEngine {
    fn default() -> Self {
        Self::new(ScreenOrientation::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ScreenOrientation; 4] = [
        ScreenOrientation::Portrait,
        ScreenOrientation::PortraitUpsideDown,
        ScreenOrientation::LandscapeLeft,
        ScreenOrientation::LandscapeRight,
    ];

    fn sample_quats() -> Vec<Quat> {
        vec![
            Quat::IDENTITY,
            Quat::from_rotation_x(0.4),
            Quat::from_rotation_y(-1.1),
            Quat::from_euler(glam::EulerRot::YXZ, 0.7, -0.2, 1.3),
            Quat::from_axis_angle(glam::Vec3::new(1.0, 2.0, -0.5).normalize(), 2.5),
        ]
    }

    #[test]
    fn mount_angles_match_policy() {
        let m = rig_mount_angles(ScreenOrientation::LandscapeLeft);
        assert_eq!((m.roll, m.pitch, m.yaw), (-FRAC_PI_2, -FRAC_PI_2, 0.0));

        let m = rig_mount_angles(ScreenOrientation::LandscapeRight);
        assert_eq!((m.roll, m.pitch, m.yaw), (-FRAC_PI_2, FRAC_PI_2, 0.0));

        let m = rig_mount_angles(ScreenOrientation::PortraitUpsideDown);
        assert_eq!((m.roll, m.pitch, m.yaw), (-FRAC_PI_2, 0.0, PI));

        let m = rig_mount_angles(ScreenOrientation::Portrait);
        assert_eq!((m.roll, m.pitch, m.yaw), (-FRAC_PI_2, 0.0, 0.0));
    }

    #[test]
    fn mount_angles_are_pure() {
        for screen in ALL {
            assert_eq!(rig_mount_angles(screen), rig_mount_angles(screen));
        }
    }

    #[test]
    fn portrait_pre_multiplies_minus_ninety_about_x() {
        let fixed = Quat::from_rotation_x(-FRAC_PI_2);
        for q in sample_quats() {
            let adjusted = adjust_attitude_for_orientation(q, ScreenOrientation::Portrait);
            // Undo the raw sample: what remains is the fixed correction.
            let residual = adjusted * q.inverse();
            assert!(residual.abs_diff_eq(fixed, 1e-6), "{residual:?}");
        }
    }

    #[test]
    fn landscape_right_swaps_and_negates() {
        let raw = Quat::from_rotation_x(0.3);
        let q = Quat::from_rotation_y(FRAC_PI_2) * raw;
        let adjusted = adjust_attitude_for_orientation(raw, ScreenOrientation::LandscapeRight);
        assert_eq!(adjusted, Quat::from_xyzw(-q.y, q.x, q.z, q.w));
    }

    #[test]
    fn landscape_left_swaps_and_negates() {
        let raw = Quat::from_rotation_z(-0.8);
        let q = Quat::from_rotation_y(-FRAC_PI_2) * raw;
        let adjusted = adjust_attitude_for_orientation(raw, ScreenOrientation::LandscapeLeft);
        assert_eq!(adjusted, Quat::from_xyzw(q.y, -q.x, q.z, q.w));
    }

    #[test]
    fn upside_down_passes_through() {
        for q in sample_quats() {
            assert_eq!(
                adjust_attitude_for_orientation(q, ScreenOrientation::PortraitUpsideDown),
                q
            );
        }
    }

    #[test]
    fn adjusted_quaternions_stay_normalized() {
        for screen in ALL {
            for q in sample_quats() {
                let adjusted = adjust_attitude_for_orientation(q, screen);
                assert!((adjusted.length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn landscape_right_remaps_roll() {
        let attitude = Attitude::from_quaternion(Quat::from_rotation_y(0.25));
        let joints = rig_joint_angles(&attitude, ScreenOrientation::LandscapeRight);
        assert!((joints.roll - (PI + 0.25)).abs() < 1e-5);
        assert_eq!(joints.pitch, attitude.pitch);
        assert_eq!(joints.yaw, attitude.yaw);

        let joints = rig_joint_angles(&attitude, ScreenOrientation::LandscapeLeft);
        assert_eq!(joints.roll, attitude.roll);
    }

    #[test]
    fn update_without_sample_is_skipped() {
        let engine = OrientationEngine::new(ScreenOrientation::Portrait);
        assert!(engine.update(None).is_none());
    }

    #[test]
    fn update_produces_both_views() {
        let engine = OrientationEngine::new(ScreenOrientation::LandscapeLeft);
        let attitude = Attitude::from_quaternion(Quat::from_rotation_x(0.1));
        let frame = engine.update(Some(&attitude)).unwrap();
        assert_eq!(
            frame.panorama_orientation,
            adjust_attitude_for_orientation(attitude.quaternion, ScreenOrientation::LandscapeLeft)
        );
        assert_eq!(
            frame.rig_joints,
            rig_joint_angles(&attitude, ScreenOrientation::LandscapeLeft)
        );
    }

    #[test]
    fn orientation_change_recomputes_mount() {
        let mut engine = OrientationEngine::new(ScreenOrientation::Portrait);
        let first = engine.set_screen_orientation(ScreenOrientation::LandscapeRight);
        let second = engine.set_screen_orientation(ScreenOrientation::LandscapeRight);
        assert_eq!(first, second);
        assert_eq!(engine.mount_angles().pitch, FRAC_PI_2);
        assert_eq!(engine.screen_orientation(), ScreenOrientation::LandscapeRight);
    }
}
