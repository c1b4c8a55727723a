//! Drag-to-look rotation.
//!
//! Every update is recomputed from the orientation captured when the drag
//! began plus the total pixel offset since then, so a long drag never
//! accumulates drift.

use crate::GestureEvent;
use glam::{Quat, Vec2};

/// Angular extent of a view, used to scale pixel offsets into radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfView {
    pub horizontal_degrees: f32,
    pub vertical_degrees: f32,
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self {
            horizontal_degrees: 60.0,
            vertical_degrees: 60.0,
        }
    }
}

impl FieldOfView {
    pub fn new(horizontal_degrees: f32, vertical_degrees: f32) -> Self {
        Self {
            horizontal_degrees,
            vertical_degrees,
        }
    }

    /// Convert a pixel offset into (x, y) radians for a view of `view_size`
    /// pixels. A zero or non-finite view dimension yields zero on that axis.
    pub fn offset_to_radians(&self, offset: Vec2, view_size: Vec2) -> Vec2 {
        Vec2::new(
            per_pixel(self.horizontal_degrees, view_size.x) * offset.x,
            per_pixel(self.vertical_degrees, view_size.y) * offset.y,
        )
    }
}

fn per_pixel(fov_degrees: f32, pixels: f32) -> f32 {
    if !pixels.is_finite() || pixels <= 0.0 {
        return 0.0;
    }
    fov_degrees.to_radians() / pixels
}

/// Rotate `base` by a vertical offset about its own X axis, then by a
/// horizontal offset about the world Y axis.
///
/// The two steps live in different frames and are composed on opposite
/// sides; collapsing them into one product changes the result.
pub fn rotate_by(base: Quat, x_radians: f32, y_radians: f32) -> Quat {
    // Camera-local pitch: new rotation on the right.
    let pitched = base * Quat::from_rotation_x(y_radians);
    // World yaw: new rotation on the left.
    (Quat::from_rotation_y(x_radians) * pitched).normalize()
}

/// Roll `base` about its own Z axis.
pub fn roll_by(base: Quat, z_radians: f32) -> Quat {
    (base * Quat::from_rotation_z(z_radians)).normalize()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    start: Vec2,
    base: Quat,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Pan gesture state machine driving one view's camera orientation.
#[derive(Debug, Clone, Default)]
pub struct PanGesture {
    fov: FieldOfView,
    state: DragState,
}

impl PanGesture {
    pub fn new(fov: FieldOfView) -> Self {
        Self {
            fov,
            state: DragState::Idle,
        }
    }

    pub fn fov(&self) -> FieldOfView {
        self.fov
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Feed one gesture event.
    ///
    /// `current` is the camera orientation as last written; it becomes the
    /// drag base on `Begin`. Returns the new camera orientation on `Change`,
    /// `None` otherwise. Events that make no sense in the current state are
    /// ignored.
    pub fn handle(&mut self, event: GestureEvent, current: Quat, view_size: Vec2) -> Option<Quat> {
        match event {
            GestureEvent::Begin(point) => {
                // A second Begin restarts from the orientation at that moment.
                self.state = DragState::Dragging(DragSession {
                    start: point,
                    base: current,
                });
                None
            }
            GestureEvent::Change(point) => match self.state {
                DragState::Dragging(session) => {
                    let radians = self.fov.offset_to_radians(point - session.start, view_size);
                    Some(rotate_by(session.base, radians.x, radians.y))
                }
                DragState::Idle => {
                    tracing::trace!("Ignoring gesture change without an active drag");
                    None
                }
            },
            GestureEvent::End => {
                self.state = DragState::Idle;
                None
            }
        }
    }
}
