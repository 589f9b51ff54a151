use glam::{Affine2, Vec2};
use tileworld_assets::{AssetId, TextureHandle};
use tileworld_common::{Color, Rect};

/// A 2D canvas-style drawing target.
///
/// Transforms compose like a canvas context: each call applies to
/// coordinates before the transforms already in place. `save`/`restore`
/// push and pop the transform and smoothing state.
pub trait DrawSurface {
    /// Size of the target in screen pixels.
    fn size(&self) -> Vec2;

    fn save(&mut self);
    fn restore(&mut self);
    fn scale(&mut self, sx: f32, sy: f32);
    fn translate(&mut self, dx: f32, dy: f32);

    /// Toggle filtering when textures are scaled. Off gives the pixelated look.
    fn set_image_smoothing(&mut self, enabled: bool);

    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);
    fn draw_texture(&mut self, texture: &TextureHandle, rect: Rect);
}

/// One recorded draw call, with the transform in effect when it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        rect: Rect,
        color: Color,
        transform: Affine2,
    },
    Stroke {
        rect: Rect,
        color: Color,
        line_width: f32,
        transform: Affine2,
    },
    Texture {
        id: AssetId,
        rect: Rect,
        smoothing: bool,
        transform: Affine2,
    },
}

impl DrawCommand {
    /// World-space rectangle the command was issued with.
    pub fn rect(&self) -> Rect {
        match self {
            DrawCommand::Fill { rect, .. }
            | DrawCommand::Stroke { rect, .. }
            | DrawCommand::Texture { rect, .. } => *rect,
        }
    }

    /// Where the rectangle lands on screen. Exact for scale + translate.
    pub fn screen_rect(&self) -> Rect {
        let (rect, t) = match self {
            DrawCommand::Fill { rect, transform, .. }
            | DrawCommand::Stroke { rect, transform, .. }
            | DrawCommand::Texture { rect, transform, .. } => (*rect, *transform),
        };
        let min = t.transform_point2(Vec2::new(rect.x, rect.y));
        let max = t.transform_point2(Vec2::new(rect.right(), rect.bottom()));
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

#[derive(Debug, Clone, Copy)]
struct SurfaceState {
    transform: Affine2,
    smoothing: bool,
}

/// Headless surface that records every draw call.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Vec2,
    state: SurfaceState,
    stack: Vec<SurfaceState>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            state: SurfaceState {
                transform: Affine2::IDENTITY,
                smoothing: true,
            },
            stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands, keeping the transform state.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn transform(&self) -> Affine2 {
        self.state.transform
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Commands whose world rectangle starts at the given point.
    pub fn commands_at(&self, x: f32, y: f32) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|c| {
                let r = c.rect();
                r.x == x && r.y == y
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        // Like a canvas, restoring with nothing saved is a no-op.
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform * Affine2::from_scale(Vec2::new(sx, sy));
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.transform = self.state.transform * Affine2::from_translation(Vec2::new(dx, dy));
    }

    fn set_image_smoothing(&mut self, enabled: bool) {
        self.state.smoothing = enabled;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill {
            rect,
            color,
            transform: self.state.transform,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::Stroke {
            rect,
            color,
            line_width,
            transform: self.state.transform,
        });
    }

    fn draw_texture(&mut self, texture: &TextureHandle, rect: Rect) {
        self.commands.push(DrawCommand::Texture {
            id: texture.id,
            rect,
            smoothing: self.state.smoothing,
            transform: self.state.transform,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_then_translate_maps_like_a_canvas() {
        let mut s = RecordingSurface::new(800.0, 600.0);
        s.scale(2.0, 2.0);
        s.translate(-100.0, -50.0);
        s.fill_rect(Rect::square(110.0, 60.0, 16.0), Color::BLACK);

        let screen = s.commands()[0].screen_rect();
        assert_eq!(screen, Rect::new(20.0, 20.0, 32.0, 32.0));
    }

    #[test]
    fn restore_pops_transform_and_smoothing() {
        let mut s = RecordingSurface::new(10.0, 10.0);
        s.save();
        s.scale(3.0, 3.0);
        s.set_image_smoothing(false);
        assert_eq!(s.depth(), 1);
        s.restore();
        assert_eq!(s.transform(), Affine2::IDENTITY);
        assert_eq!(s.depth(), 0);
        s.restore();
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn commands_at_filters_by_origin() {
        let mut s = RecordingSurface::new(10.0, 10.0);
        s.fill_rect(Rect::square(0.0, 0.0, 16.0), Color::BLACK);
        s.stroke_rect(Rect::square(0.0, 0.0, 16.0), Color::BLACK, 1.0);
        s.fill_rect(Rect::square(16.0, 0.0, 16.0), Color::BLACK);
        assert_eq!(s.commands_at(0.0, 0.0).len(), 2);
        s.clear();
        assert!(s.commands().is_empty());
    }
}
