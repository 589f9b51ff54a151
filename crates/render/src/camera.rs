use glam::Vec2;
use tileworld_common::Rect;
use tileworld_input::CameraInput;

use crate::surface::DrawSurface;

pub const MIN_ZOOM: f32 = 0.8;
pub const MAX_ZOOM: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.1;
/// Fraction of the remaining distance to the target covered per update.
pub const FOLLOW_FACTOR: f32 = 0.15;
/// Anchor movement (in world units, either axis) that ends a manual pan.
const ANCHOR_MOVE_THRESHOLD: f32 = 1.0;

/// Follow/pan state. A pan offset only exists while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraState {
    /// No update has run yet; the next one snaps onto the anchor.
    Uninitialized,
    Following,
    /// Manually panned by `offset` world units away from the follow target.
    Dragging { offset: Vec2 },
}

/// What the renderer and other consumers need to know about the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    /// Canvas size in screen pixels, not divided by zoom.
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
}

impl Viewport {
    /// World-space rectangle on screen.
    pub fn world_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width / self.zoom, self.height / self.zoom)
    }
}

/// Snapshot for overlays and logs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDebugInfo {
    pub position: Vec2,
    pub target: Vec2,
    pub anchor: Vec2,
    /// Where the anchor is drawn this frame.
    pub anchor_screen: Vec2,
    /// Where a settled camera would draw it.
    pub canvas_center: Vec2,
    pub zoom: f32,
    pub state: CameraState,
}

/// 2D follow camera with smoothed tracking, wheel zoom and drag panning.
///
/// `position` is the world coordinate shown at the canvas top-left. The
/// applied transform is `scale(zoom)` then `translate(-position)`, so a world
/// point lands at `(world - position) * zoom` on screen.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec2,
    target: Vec2,
    zoom: f32,
    canvas: Vec2,
    world_size: Vec2,
    last_anchor: Vec2,
    state: CameraState,
}

impl Camera {
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            target: Vec2::ZERO,
            zoom: 1.0,
            canvas: Vec2::new(canvas_width, canvas_height),
            world_size: Vec2::ZERO,
            last_anchor: Vec2::ZERO,
            state: CameraState::Uninitialized,
        }
    }

    pub fn resize(&mut self, canvas_width: f32, canvas_height: f32) {
        self.canvas = Vec2::new(canvas_width, canvas_height);
    }

    /// Top-left of a view of the current zoom centered on `anchor`.
    fn centered_on(&self, anchor: Vec2, zoom: f32) -> Vec2 {
        anchor - self.canvas / 2.0 / zoom
    }

    fn pan_offset(&self) -> Vec2 {
        match self.state {
            CameraState::Dragging { offset } => offset,
            _ => Vec2::ZERO,
        }
    }

    /// Advance one frame toward the anchor, applying any pending zoom step or
    /// drag from `input`.
    ///
    /// The first call snaps onto the anchor without smoothing. A pan ends as
    /// soon as the anchor moves more than one unit on either axis.
    pub fn update(
        &mut self,
        anchor: Vec2,
        world_size: Vec2,
        input: Option<&mut dyn CameraInput>,
    ) {
        self.world_size = world_size;

        if self.state == CameraState::Uninitialized {
            self.position = self.centered_on(anchor, self.zoom);
            self.target = self.position;
            self.last_anchor = anchor;
            self.state = CameraState::Following;
            tracing::debug!(?anchor, position = ?self.position, "camera snapped to anchor");
            return;
        }

        let moved = (anchor - self.last_anchor).abs();
        let anchor_moved = moved.x > ANCHOR_MOVE_THRESHOLD || moved.y > ANCHOR_MOVE_THRESHOLD;

        if let Some(input) = input {
            if let Some(step) = input.take_zoom_step() {
                let level = (self.zoom * 10.0).round() / 10.0;
                let zoom = (level + step.signed(ZOOM_STEP)).clamp(MIN_ZOOM, MAX_ZOOM);
                if zoom != self.zoom {
                    // Re-center immediately so the zoom pivots on the anchor.
                    self.position = self.centered_on(anchor, zoom) + self.pan_offset();
                    self.zoom = zoom;
                    tracing::debug!(zoom, "zoom changed");
                }
            }

            if let Some(delta) = input.drag_delta() {
                let offset = self.pan_offset() - delta / self.zoom;
                self.state = CameraState::Dragging { offset };
                input.reset_drag_start();
            }
        }

        if anchor_moved && matches!(self.state, CameraState::Dragging { .. }) {
            tracing::trace!("anchor moved, pan released");
            self.state = CameraState::Following;
        }
        self.last_anchor = anchor;

        self.target = self.centered_on(anchor, self.zoom) + self.pan_offset();
        self.position += (self.target - self.position) * FOLLOW_FACTOR;
    }

    /// Push the view transform. Pair with [`Camera::restore_transform`].
    pub fn apply_transform<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.save();
        surface.scale(self.zoom, self.zoom);
        surface.translate(-self.position.x, -self.position.y);
    }

    pub fn restore_transform<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.restore();
    }

    /// Run `draw` with the view transform applied.
    pub fn with_transform<S: DrawSurface + ?Sized, R>(
        &self,
        surface: &mut S,
        draw: impl FnOnce(&mut S) -> R,
    ) -> R {
        self.apply_transform(surface);
        let out = draw(surface);
        self.restore_transform(surface);
        out
    }

    /// `(screen + position) / zoom`. Inverse of [`Camera::world_to_screen`];
    /// agrees with the drawing transform only at zoom 1.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen + self.position) / self.zoom
    }

    /// `world * zoom - position`.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world * self.zoom - self.position
    }

    /// Where a world point is drawn under [`Camera::apply_transform`].
    pub fn project(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.zoom
    }

    /// World point drawn at a screen position under [`Camera::apply_transform`].
    pub fn unproject(&self, screen: Vec2) -> Vec2 {
        screen / self.zoom + self.position
    }

    /// Whether a world rectangle touches the visible area. Edges count.
    pub fn is_visible(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.viewport()
            .world_rect()
            .touches(&Rect::new(x, y, width, height))
    }

    /// Set the zoom directly, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            x: self.position.x,
            y: self.position.y,
            width: self.canvas.x,
            height: self.canvas.y,
            zoom: self.zoom,
        }
    }

    /// Zoom rounded to two decimals, for display.
    pub fn zoom_level(&self) -> f32 {
        (self.zoom * 100.0).round() / 100.0
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    /// World point at the middle of the canvas.
    pub fn center(&self) -> Vec2 {
        self.position + self.canvas / 2.0 / self.zoom
    }

    pub fn debug_info(&self, anchor: Vec2) -> CameraDebugInfo {
        CameraDebugInfo {
            position: self.position,
            target: self.target,
            anchor,
            anchor_screen: self.project(anchor),
            canvas_center: self.canvas / 2.0,
            zoom: self.zoom_level(),
            state: self.state,
        }
    }
}
