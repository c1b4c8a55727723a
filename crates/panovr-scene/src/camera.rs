use glam::{Quat, Vec3};

/// Camera for one view.
///
/// Position is fixed at the origin of its node. Only orientation changes.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Current camera orientation. Always a unit quaternion.
    pub orientation: Quat,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Camera {
    pub fn new(fov_y_degrees: f32, far: f32) -> Self {
        Self {
            orientation: Quat::IDENTITY,
            fov_y_degrees,
            aspect_ratio: 1.0,
            far,
        }
    }

    /// Direction the camera looks along (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Update the aspect ratio for a viewport. Zero-sized viewports keep the
    /// previous value.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_looks_down_negative_z() {
        let camera = Camera::new(60.0, 30.0);
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn forward_follows_orientation() {
        let mut camera = Camera::new(60.0, 30.0);
        camera.orientation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_X, 1e-6));
    }

    #[test]
    fn degenerate_viewport_keeps_aspect() {
        let mut camera = Camera::new(60.0, 30.0);
        camera.set_viewport(1920.0, 540.0);
        assert!((camera.aspect_ratio - 1920.0 / 540.0).abs() < 1e-6);
        camera.set_viewport(0.0, 540.0);
        assert!((camera.aspect_ratio - 1920.0 / 540.0).abs() < 1e-6);
    }
}
