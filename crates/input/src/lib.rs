//! Input: raw pointer and wheel events folded into camera pan/zoom signals.
//!
//! # Invariants
//! - The camera consumes signals through [`CameraInput`], never raw events.
//! - A wheel step is delivered once; a drag delta is relative to the last reset.

pub mod pointer;

pub use pointer::{PointerEvent, PointerState};

use glam::Vec2;

/// One discrete zoom step requested by the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomStep {
    In,
    Out,
}

impl ZoomStep {
    /// Scrolling down (positive delta) zooms out, scrolling up zooms in.
    pub fn from_wheel(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(ZoomStep::Out)
        } else if delta < 0.0 {
            Some(ZoomStep::In)
        } else {
            None
        }
    }

    /// Signed zoom change for a step of the given size.
    pub fn signed(self, step: f32) -> f32 {
        match self {
            ZoomStep::In => step,
            ZoomStep::Out => -step,
        }
    }
}

/// Pan/zoom source polled by the camera once per update.
pub trait CameraInput {
    /// Pending wheel step, consumed by the call.
    fn take_zoom_step(&mut self) -> Option<ZoomStep>;

    /// Screen-space pointer movement since the last drag reset, or `None`
    /// when no pan is in progress.
    fn drag_delta(&self) -> Option<Vec2>;

    /// Make the current pointer position the new drag origin.
    fn reset_drag_start(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_direction_maps_to_zoom() {
        assert_eq!(ZoomStep::from_wheel(120.0), Some(ZoomStep::Out));
        assert_eq!(ZoomStep::from_wheel(-3.0), Some(ZoomStep::In));
        assert_eq!(ZoomStep::from_wheel(0.0), None);
    }

    #[test]
    fn signed_step() {
        assert_eq!(ZoomStep::In.signed(0.1), 0.1);
        assert_eq!(ZoomStep::Out.signed(0.1), -0.1);
    }
}
