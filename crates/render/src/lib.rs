//! Rendering: camera, fog-of-war tile renderer and the surface it draws on.
//!
//! # Invariants
//! - The renderer reads world state and never mutates it.
//! - A frame never waits on a texture; missing textures draw as color.
//! - Fog math is shared by both culling modes.
//!
//! The [`DrawSurface`] trait is the seam to a real canvas or GPU backend;
//! [`RecordingSurface`] records draw calls for tests and headless runs.

mod camera;
mod renderer;
mod settings;
mod surface;

pub use camera::{
    Camera, CameraDebugInfo, CameraState, FOLLOW_FACTOR, MAX_ZOOM, MIN_ZOOM, Viewport, ZOOM_STEP,
};
pub use renderer::{GRID_LINE_COLOR, OPEN_WATER_COLOR, RenderStats, ViewportRenderer};
pub use settings::{
    FOG_INTENSITY_KEY, FogBands, FogParams, RENDER_DISTANCE_KEY, RenderSettings, TileFog,
};
pub use surface::{DrawCommand, DrawSurface, RecordingSurface};

pub fn crate_info() -> &'static str {
    "tileworld-render v0.1.0"
}
