use crate::camera::Camera;
use glam::{Quat, Vec2, Vec3};
use panovr_config::PanoramaConfig;
use panovr_input::gesture::{roll_by, FieldOfView, PanGesture};
use panovr_input::GestureEvent;
use std::path::PathBuf;

/// Inside-out sphere the equirectangular image is wrapped onto.
#[derive(Debug, Clone, PartialEq)]
pub struct PanoramaSphere {
    pub image: Option<PathBuf>,
    pub radius: f32,
    pub segment_count: u32,
    /// Node scale. X is mirrored so the texture reads correctly from inside.
    pub scale: Vec3,
}

impl PanoramaSphere {
    pub fn from_config(config: &PanoramaConfig) -> Self {
        Self {
            image: config.image.clone(),
            radius: config.sphere_radius,
            segment_count: config.segment_count,
            scale: Vec3::new(-1.0, 1.0, 1.0),
        }
    }
}

/// Panorama view: a camera at the center of the sphere, turned either by
/// device attitude or by drag gestures.
pub struct PanoramaView {
    pub sphere: PanoramaSphere,
    camera: Camera,
    gesture: PanGesture,
    /// View size in pixels, for scaling drag offsets.
    size: Vec2,
}

impl PanoramaView {
    pub fn new(config: &PanoramaConfig, fov: FieldOfView) -> Self {
        Self {
            sphere: PanoramaSphere::from_config(config),
            camera: Camera::new(fov.vertical_degrees, config.z_far),
            gesture: PanGesture::new(fov),
            size: Vec2::ZERO,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_orientation(&self) -> Quat {
        self.camera.orientation
    }

    pub fn set_camera_orientation(&mut self, orientation: Quat) {
        self.camera.orientation = orientation;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
        self.camera.set_viewport(width, height);
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Apply one pan gesture event to the camera.
    pub fn handle_gesture(&mut self, event: GestureEvent) {
        if let Some(orientation) = self.gesture.handle(event, self.camera.orientation, self.size) {
            self.camera.orientation = orientation;
        }
    }

    /// Tilt the camera about its own view axis.
    pub fn roll(&mut self, radians: f32) {
        self.camera.orientation = roll_by(self.camera.orientation, radians);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> PanoramaView {
        let mut view = PanoramaView::new(&PanoramaConfig::default(), FieldOfView::default());
        view.resize(1000.0, 1000.0);
        view
    }

    #[test]
    fn sphere_is_mirrored() {
        let v = view();
        assert_eq!(v.sphere.radius, 999.0);
        assert_eq!(v.sphere.segment_count, 96);
        assert_eq!(v.sphere.scale.x, -1.0);
        assert_eq!(v.camera().far, 999.0);
    }

    #[test]
    fn drag_rotates_camera_and_keeps_last_value() {
        let mut v = view();
        v.handle_gesture(GestureEvent::Begin(Vec2::ZERO));
        v.handle_gesture(GestureEvent::Change(Vec2::new(100.0, 0.0)));
        let dragged = v.camera_orientation();
        assert!(dragged.abs_diff_eq(Quat::from_rotation_y(60f32.to_radians() / 10.0), 1e-6));

        v.handle_gesture(GestureEvent::End);
        assert!(!v.is_dragging());
        assert_eq!(v.camera_orientation(), dragged);
    }

    #[test]
    fn next_drag_starts_from_last_written_orientation() {
        let mut v = view();
        v.set_camera_orientation(Quat::from_rotation_x(0.2));
        v.handle_gesture(GestureEvent::Begin(Vec2::new(500.0, 500.0)));
        v.handle_gesture(GestureEvent::Change(Vec2::new(500.0, 500.0)));
        assert!(v
            .camera_orientation()
            .abs_diff_eq(Quat::from_rotation_x(0.2), 1e-6));
    }

    #[test]
    fn unsized_view_does_not_move() {
        let mut v = PanoramaView::new(&PanoramaConfig::default(), FieldOfView::default());
        v.handle_gesture(GestureEvent::Begin(Vec2::ZERO));
        v.handle_gesture(GestureEvent::Change(Vec2::new(300.0, 300.0)));
        assert!(v.camera_orientation().abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn roll_changes_orientation() {
        let mut v = view();
        v.roll(0.1);
        assert!(v
            .camera_orientation()
            .abs_diff_eq(Quat::from_rotation_z(0.1), 1e-6));
    }
}
