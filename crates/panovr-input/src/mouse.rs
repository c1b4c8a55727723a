use crate::GestureEvent;
use glam::Vec2;
use winit::event::{ElementState, MouseButton};

/// Turns window mouse events into pan gesture events.
///
/// Holding the left button is one drag: press begins it, cursor motion
/// changes it, and release or the cursor leaving the window ends it.
pub struct MouseDragTracker {
    /// Last known cursor position in view-local pixels.
    cursor: Vec2,
    pressed: bool,
}

impl MouseDragTracker {
    pub fn new() -> Self {
        Self {
            cursor: Vec2::ZERO,
            pressed: false,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Option<GestureEvent> {
        self.cursor = Vec2::new(x as f32, y as f32);
        self.pressed.then_some(GestureEvent::Change(self.cursor))
    }

    pub fn on_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<GestureEvent> {
        if button != MouseButton::Left {
            return None;
        }

        match state {
            ElementState::Pressed => {
                // Presses left of or above the view belong to something else.
                if self.cursor.x < 0.0 || self.cursor.y < 0.0 {
                    return None;
                }
                self.pressed = true;
                Some(GestureEvent::Begin(self.cursor))
            }
            ElementState::Released => {
                if !self.pressed {
                    return None;
                }
                self.pressed = false;
                Some(GestureEvent::End)
            }
        }
    }

    pub fn on_cursor_left(&mut self) -> Option<GestureEvent> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        Some(GestureEvent::End)
    }
}

impl Default for MouseDragTracker {
    fn default() -> Self {
        Self::new()
    }
}
