use glam::Vec2;

use crate::{CameraInput, ZoomStep};

/// Raw pointer events as delivered by the window or canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button (or touch) went down at a screen position.
    Pressed(Vec2),
    /// Pointer moved to a screen position.
    Moved(Vec2),
    /// Primary button (or touch) released.
    Released,
    /// Pointer left the surface; ends any drag.
    Left,
    /// Wheel scrolled by a vertical delta. The last delta per frame wins.
    Wheel(f32),
}

/// Pointer state accumulated between camera updates.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Vec2,
    drag_start: Vec2,
    dragging: bool,
    wheel: f32,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Pressed(pos) => {
                self.position = pos;
                self.drag_start = pos;
                self.dragging = true;
                tracing::trace!(?pos, "drag start");
            }
            PointerEvent::Moved(pos) => self.position = pos,
            PointerEvent::Released | PointerEvent::Left => {
                if self.dragging {
                    tracing::trace!(pos = ?self.position, "drag end");
                }
                self.dragging = false;
            }
            PointerEvent::Wheel(delta) => self.wheel = delta,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

impl CameraInput for PointerState {
    fn take_zoom_step(&mut self) -> Option<ZoomStep> {
        ZoomStep::from_wheel(std::mem::take(&mut self.wheel))
    }

    fn drag_delta(&self) -> Option<Vec2> {
        self.dragging.then(|| self.position - self.drag_start)
    }

    fn reset_drag_start(&mut self) {
        self.drag_start = self.position;
    }
}
