use tileworld_persist::SettingsStore;
use tileworld_stream::RenderMode;

pub const RENDER_DISTANCE_KEY: &str = "renderDistance";
pub const FOG_INTENSITY_KEY: &str = "fogIntensity";

const RENDER_DISTANCE_RANGE: std::ops::RangeInclusive<u32> = 16..=128;
const FOG_INTENSITY_RANGE: std::ops::RangeInclusive<u32> = 0..=100;

/// User-facing video settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Render distance in tiles, 16..=128. 128 switches to viewport culling.
    pub render_distance: u32,
    /// Fog opacity scale in percent, 0..=100. Zero disables fog drawing.
    pub fog_intensity: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_distance: 32,
            fog_intensity: 75,
        }
    }
}

impl RenderSettings {
    /// Read from a settings store. Missing, unparsable or out-of-range values
    /// fall back to their defaults with a warning.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();
        Self {
            render_distance: read_setting(
                store,
                RENDER_DISTANCE_KEY,
                RENDER_DISTANCE_RANGE,
                defaults.render_distance,
            ),
            fog_intensity: read_setting(
                store,
                FOG_INTENSITY_KEY,
                FOG_INTENSITY_RANGE,
                defaults.fog_intensity,
            ),
        }
    }

    pub fn save(&self, store: &mut dyn SettingsStore) {
        store.set(RENDER_DISTANCE_KEY, self.render_distance.to_string());
        store.set(FOG_INTENSITY_KEY, self.fog_intensity.to_string());
    }

    pub fn mode(&self) -> RenderMode {
        RenderMode::from_distance(self.render_distance)
    }
}

fn read_setting(
    store: &dyn SettingsStore,
    key: &str,
    range: std::ops::RangeInclusive<u32>,
    default: u32,
) -> u32 {
    let Some(raw) = store.get(key) else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(v) if range.contains(&v) => v,
        _ => {
            tracing::warn!(key, value = %raw, default, "invalid setting, using default");
            default
        }
    }
}

/// Tunable fog geometry, as ratios of half the render distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogParams {
    /// Where the overlay on drawn tiles begins.
    pub start_ratio: f32,
    /// Where pure fog ends and tiles are culled.
    pub extend_ratio: f32,
    /// Extra fixed-mode window beyond the render distance.
    pub window_margin: f32,
    /// Border around the viewport in dynamic mode, in tiles.
    pub dynamic_padding_tiles: u32,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            start_ratio: 0.6,
            extend_ratio: 1.2,
            window_margin: 0.2,
            dynamic_padding_tiles: 2,
        }
    }
}

/// How one tile should be drawn given its distance from the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileFog {
    /// Too far away: draw nothing.
    Culled,
    /// Beyond the render distance: a black square of this opacity only.
    PureFog { opacity: f32 },
    /// Draw the tile, then an overlay if any, then the grid line if `grid`.
    Visible { overlay: Option<f32>, grid: bool },
}

/// Fog distances for one frame, in tile units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogBands {
    pub max_distance: f32,
    pub fog_start: f32,
    pub fog_extend: f32,
    /// Intensity as a fraction in `[0, 1]`.
    pub intensity: f32,
}

impl FogBands {
    /// Ratios are bounded so that `fog_start <= max_distance <= fog_extend`;
    /// a start above 1 or an extend below 1 collapses that band.
    pub fn new(distance_tiles: u32, fog_intensity: u32, params: &FogParams) -> Self {
        let defaults = FogParams::default();
        let ratio = |r: f32, fallback: f32| if r.is_finite() { r } else { fallback };
        let start_ratio = ratio(params.start_ratio, defaults.start_ratio).clamp(0.0, 1.0);
        let extend_ratio = ratio(params.extend_ratio, defaults.extend_ratio).max(1.0);

        let max_distance = distance_tiles as f32 / 2.0;
        Self {
            max_distance,
            fog_start: max_distance * start_ratio,
            fog_extend: max_distance * extend_ratio,
            intensity: fog_intensity.min(100) as f32 / 100.0,
        }
    }

    pub fn classify(&self, distance: f32) -> TileFog {
        if distance > self.fog_extend {
            return TileFog::Culled;
        }
        let fogged = self.intensity > 0.0;
        if distance > self.max_distance {
            if fogged {
                let t = (distance - self.max_distance) / (self.fog_extend - self.max_distance);
                return TileFog::PureFog {
                    opacity: t.min(1.0) * self.intensity,
                };
            }
            return TileFog::Visible {
                overlay: None,
                grid: false,
            };
        }
        let overlay = (fogged && distance > self.fog_start).then(|| {
            let t = (distance - self.fog_start) / (self.max_distance - self.fog_start);
            t.min(1.0) * self.intensity
        });
        TileFog::Visible {
            overlay,
            grid: true,
        }
    }
}
