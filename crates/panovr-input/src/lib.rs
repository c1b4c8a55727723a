pub mod gesture;
pub mod mouse;

use glam::Vec2;

/// One step of a drag gesture, in view-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Drag started at this point.
    Begin(Vec2),
    /// Drag moved to this point.
    Change(Vec2),
    /// Drag finished, was cancelled or failed.
    End,
}
