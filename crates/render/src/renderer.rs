use glam::Vec2;
use tileworld_assets::TileTextures;
use tileworld_common::{Color, Rect, TileCoord};
use tileworld_kernel::WorldGrid;
use tileworld_stream::{RenderMode, TileWindow};

use crate::camera::Camera;
use crate::settings::{FogBands, FogParams, RenderSettings, TileFog};
use crate::surface::DrawSurface;

pub const GRID_LINE_COLOR: Color = Color::rgb(0x2a, 0x3a, 0x2a);
pub const OPEN_WATER_COLOR: Color = Color::rgb(0x1e, 0x90, 0xff);
const GRID_LINE_WIDTH: f32 = 1.0;

/// What one frame drew, by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Tiles in the candidate window.
    pub candidates: usize,
    pub culled: usize,
    pub pure_fog: usize,
    pub textured: usize,
    pub colored: usize,
    /// Tiles outside the world drawn as open water.
    pub open_water: usize,
    pub fog_overlays: usize,
    pub grid_lines: usize,
}

impl RenderStats {
    /// Tiles whose own texture or color was drawn.
    pub fn drawn_tiles(&self) -> usize {
        self.textured + self.colored + self.open_water
    }
}

/// Draws the tiles around an anchor with distance fog.
///
/// Both culling modes pick a [`TileWindow`] and feed every coordinate in it
/// through the same per-tile fog routine. Drawing happens in world
/// coordinates; the caller applies the camera transform.
pub struct ViewportRenderer {
    settings: RenderSettings,
    fog: FogParams,
    textures: TileTextures,
}

impl Default for ViewportRenderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl ViewportRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self::with_fog(settings, FogParams::default())
    }

    pub fn with_fog(settings: RenderSettings, fog: FogParams) -> Self {
        Self {
            settings,
            fog,
            textures: TileTextures::new(),
        }
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: RenderSettings) {
        tracing::debug!(?settings, "render settings changed");
        self.settings = settings;
    }

    pub fn fog_params(&self) -> &FogParams {
        &self.fog
    }

    pub fn textures(&self) -> &TileTextures {
        &self.textures
    }

    /// For requesting textures and polling their loads.
    pub fn textures_mut(&mut self) -> &mut TileTextures {
        &mut self.textures
    }

    pub fn mode(&self) -> RenderMode {
        self.settings.mode()
    }

    /// Fog distances for the current settings. Dynamic mode uses the
    /// maximum render distance.
    pub fn fog_bands(&self) -> FogBands {
        FogBands::new(
            self.mode().distance_tiles(),
            self.settings.fog_intensity,
            &self.fog,
        )
    }

    /// Point fog is measured from: the given anchor, or the viewport center.
    pub fn fog_anchor(&self, camera: &Camera, anchor: Option<Vec2>) -> Vec2 {
        anchor.unwrap_or_else(|| camera.center())
    }

    /// Candidate tiles for this frame.
    pub fn window(&self, camera: &Camera, anchor: Vec2, tile_size: f32) -> TileWindow {
        match self.mode() {
            RenderMode::Fixed { distance_tiles } => {
                TileWindow::fixed(anchor, distance_tiles, tile_size, self.fog.window_margin)
            }
            RenderMode::Dynamic => TileWindow::dynamic(
                camera.viewport().world_rect(),
                tile_size,
                self.fog.dynamic_padding_tiles,
            ),
        }
    }

    /// Draw one frame of tiles. Never blocks on textures and never touches
    /// the world.
    pub fn render<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        camera: &Camera,
        world: &WorldGrid,
        anchor: Option<Vec2>,
    ) -> RenderStats {
        let _span = tracing::trace_span!("render_tiles").entered();
        let tile_size = world.tile_size() as f32;
        let anchor = self.fog_anchor(camera, anchor);
        let anchor_tile = TileCoord::from_world(anchor, tile_size);
        let bands = self.fog_bands();
        let window = self.window(camera, anchor, tile_size);

        let mut stats = RenderStats {
            candidates: window.len(),
            ..RenderStats::default()
        };
        for coord in window.iter() {
            let fog = bands.classify(anchor_tile.distance(coord));
            self.draw_tile(surface, world, coord, fog, &mut stats);
        }
        tracing::trace!(?stats, "tiles rendered");
        stats
    }

    fn draw_tile<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        world: &WorldGrid,
        coord: TileCoord,
        fog: TileFog,
        stats: &mut RenderStats,
    ) {
        let rect = coord.bounds(world.tile_size() as f32);
        let (overlay, grid) = match fog {
            TileFog::Culled => {
                stats.culled += 1;
                return;
            }
            TileFog::PureFog { opacity } => {
                surface.fill_rect(rect, Color::black(opacity));
                stats.pure_fog += 1;
                return;
            }
            TileFog::Visible { overlay, grid } => (overlay, grid),
        };

        match world.tile(coord) {
            Some(tile) => match self.textures.texture_for(tile.kind) {
                Some(texture) => {
                    draw_pixelated(surface, texture, rect);
                    stats.textured += 1;
                }
                None => {
                    surface.fill_rect(rect, tile.color);
                    stats.colored += 1;
                }
            },
            None => {
                match self.textures.open_water() {
                    Some(texture) => draw_pixelated(surface, texture, rect),
                    None => surface.fill_rect(rect, OPEN_WATER_COLOR),
                }
                stats.open_water += 1;
            }
        }

        if let Some(opacity) = overlay {
            surface.fill_rect(rect, Color::black(opacity));
            stats.fog_overlays += 1;
        }
        if grid {
            surface.stroke_rect(rect, GRID_LINE_COLOR, GRID_LINE_WIDTH);
            stats.grid_lines += 1;
        }
    }
}

fn draw_pixelated<S: DrawSurface + ?Sized>(
    surface: &mut S,
    texture: &tileworld_assets::TextureHandle,
    rect: Rect,
) {
    surface.save();
    surface.set_image_smoothing(false);
    surface.draw_texture(texture, rect);
    surface.restore();
}
