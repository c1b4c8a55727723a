use glam::{EulerRot, Quat};
use panovr_motion::types::{MountAngles, RigJointAngles};

/// Camera rig for the sensor-driven view.
///
/// The joints nest yaw → pitch → roll → mount → camera. The rig owns every
/// joint; callers can only set angles and read the resulting orientation.
#[derive(Debug, Clone, Default)]
pub struct CameraRig {
    mount: MountAngles,
    joints: RigJointAngles,
}

impl CameraRig {
    pub fn new(mount: MountAngles) -> Self {
        Self {
            mount,
            joints: RigJointAngles::default(),
        }
    }

    pub fn set_mount(&mut self, mount: MountAngles) {
        self.mount = mount;
    }

    pub fn set_joints(&mut self, joints: RigJointAngles) {
        self.joints = joints;
    }

    pub fn mount(&self) -> MountAngles {
        self.mount
    }

    pub fn joints(&self) -> RigJointAngles {
        self.joints
    }

    /// Mount rotation. Euler components are applied as the scene graph does:
    /// z first, then y, then x.
    pub fn mount_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.mount.roll, self.mount.pitch, self.mount.yaw)
    }

    /// World orientation of the camera at the end of the rig.
    pub fn orientation(&self) -> Quat {
        let yaw = Quat::from_rotation_y(self.joints.yaw);
        let pitch = Quat::from_rotation_z(self.joints.pitch);
        let roll = Quat::from_rotation_x(self.joints.roll);
        (yaw * pitch * roll * self.mount_rotation()).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use panovr_motion::orientation::rig_mount_angles;
    use panovr_motion::ScreenOrientation;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn zero_joints_give_mount_rotation() {
        let rig = CameraRig::new(rig_mount_angles(ScreenOrientation::Portrait));
        let expected = Quat::from_rotation_x(-FRAC_PI_2);
        assert!(rig.orientation().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn joints_turn_about_their_own_axes() {
        let mut rig = CameraRig::default();

        rig.set_joints(RigJointAngles { roll: 0.3, pitch: 0.0, yaw: 0.0 });
        assert!(rig.orientation().abs_diff_eq(Quat::from_rotation_x(0.3), 1e-6));

        rig.set_joints(RigJointAngles { roll: 0.0, pitch: 0.3, yaw: 0.0 });
        assert!(rig.orientation().abs_diff_eq(Quat::from_rotation_z(0.3), 1e-6));

        rig.set_joints(RigJointAngles { roll: 0.0, pitch: 0.0, yaw: 0.3 });
        assert!(rig.orientation().abs_diff_eq(Quat::from_rotation_y(0.3), 1e-6));
    }

    #[test]
    fn yaw_joint_is_outermost() {
        let mut rig = CameraRig::default();
        rig.set_joints(RigJointAngles { roll: 0.5, pitch: 0.0, yaw: FRAC_PI_2 });
        // The roll joint's X axis is carried around by the yaw joint.
        let roll_axis = rig.orientation() * Vec3::X;
        assert!(roll_axis.abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2) * Vec3::X, 1e-5));
    }

    #[test]
    fn mount_change_is_reflected() {
        let mut rig = CameraRig::new(rig_mount_angles(ScreenOrientation::Portrait));
        let before = rig.orientation();
        rig.set_mount(rig_mount_angles(ScreenOrientation::LandscapeLeft));
        assert!(!rig.orientation().abs_diff_eq(before, 1e-3));
        assert_eq!(rig.mount(), rig_mount_angles(ScreenOrientation::LandscapeLeft));
    }
}
