use glam::Vec2;
use tileworld_common::{Rect, TileCoord};

/// Render distances at or above this value select viewport-driven culling.
pub const DYNAMIC_RENDER_DISTANCE: u32 = 128;

/// How the set of candidate tiles is chosen each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// A square of `distance_tiles` around the anchor, plus a fog margin.
    Fixed { distance_tiles: u32 },
    /// Whatever the camera sees, plus a small border.
    Dynamic,
}

impl RenderMode {
    pub fn from_distance(distance_tiles: u32) -> Self {
        if distance_tiles < DYNAMIC_RENDER_DISTANCE {
            RenderMode::Fixed { distance_tiles }
        } else {
            RenderMode::Dynamic
        }
    }

    /// Render distance used for fog math. Dynamic mode behaves as the maximum.
    pub fn distance_tiles(self) -> u32 {
        match self {
            RenderMode::Fixed { distance_tiles } => distance_tiles,
            RenderMode::Dynamic => DYNAMIC_RENDER_DISTANCE,
        }
    }
}

/// Half-open rectangle of tile indices: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    pub start: TileCoord,
    pub end: TileCoord,
}

impl TileWindow {
    pub fn new(start: TileCoord, end: TileCoord) -> Self {
        Self { start, end }
    }

    /// Smallest window covering a world-space rectangle: floor the top-left,
    /// ceil the bottom-right.
    pub fn covering(rect: Rect, tile_size: f32) -> Self {
        Self {
            start: TileCoord::new(
                (rect.x / tile_size).floor() as i32,
                (rect.y / tile_size).floor() as i32,
            ),
            end: TileCoord::new(
                (rect.right() / tile_size).ceil() as i32,
                (rect.bottom() / tile_size).ceil() as i32,
            ),
        }
    }

    /// Fixed-distance window: `distance_tiles` across, centered on the anchor,
    /// grown by `margin_ratio` of the half extent on every side so fog has
    /// tiles to fade into.
    pub fn fixed(anchor: Vec2, distance_tiles: u32, tile_size: f32, margin_ratio: f32) -> Self {
        let half_extent = distance_tiles as f32 * tile_size / 2.0;
        let reach = half_extent + half_extent * margin_ratio;
        Self::covering(
            Rect::new(anchor.x - reach, anchor.y - reach, 2.0 * reach, 2.0 * reach),
            tile_size,
        )
    }

    /// Viewport window: the visible world rectangle plus `padding_tiles` of
    /// border to hide edge artifacts.
    pub fn dynamic(viewport: Rect, tile_size: f32, padding_tiles: u32) -> Self {
        Self::covering(viewport.expand(padding_tiles as f32 * tile_size), tile_size)
    }

    pub fn width(&self) -> u32 {
        (self.end.x - self.start.x).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.end.y - self.start.y).max(0) as u32
    }

    pub fn len(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        (self.start.x..self.end.x).contains(&coord.x) && (self.start.y..self.end.y).contains(&coord.y)
    }

    /// Every coordinate in the window, columns outer, rows inner.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + use<> {
        let (sy, ey) = (self.start.y, self.end.y);
        (self.start.x..self.end.x).flat_map(move |x| (sy..ey).map(move |y| TileCoord::new(x, y)))
    }
}
