//! World construction inputs: the generation config and the editor's custom
//! world document.

use serde::{Deserialize, Serialize};
use tileworld_common::Color;

use crate::error::{ConfigError, WorldError};
use crate::tile::TileKind;

/// Size preset for generated worlds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl WorldSize {
    /// `(width, height)` in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            WorldSize::Small => (2500, 1500),
            WorldSize::Medium => (3500, 2250),
            WorldSize::Large => (5000, 3500),
        }
    }
}

/// Share of each tile kind, in percent. Expected to total 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePercentages {
    pub grass: f64,
    pub water: f64,
    pub wall: f64,
    pub cave: f64,
}

impl Default for TilePercentages {
    fn default() -> Self {
        Self {
            grass: 85.0,
            water: 10.0,
            wall: 3.0,
            cave: 2.0,
        }
    }
}

impl TilePercentages {
    pub fn get(&self, kind: TileKind) -> f64 {
        match kind {
            TileKind::Grass => self.grass,
            TileKind::Water => self.water,
            TileKind::Wall => self.wall,
            TileKind::Cave => self.cave,
        }
    }

    pub fn total(&self) -> f64 {
        TileKind::ALL.iter().map(|k| self.get(*k)).sum()
    }

    /// Pick a kind for a uniform sample `r` in `[0, 1)`.
    ///
    /// Cumulative thresholds run cave, wall, water; grass takes whatever is
    /// left, including any slack when the percentages do not total 100.
    pub fn classify(&self, r: f64) -> TileKind {
        let cave = self.cave / 100.0;
        let wall = cave + self.wall / 100.0;
        let water = wall + self.water / 100.0;
        if r < cave {
            TileKind::Cave
        } else if r < wall {
            TileKind::Wall
        } else if r < water {
            TileKind::Water
        } else {
            TileKind::Grass
        }
    }
}

/// Generation input from the world-config provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldConfig {
    pub world_size: WorldSize,
    #[serde(default)]
    pub seed: String,
    pub tile_percentages: TilePercentages,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size: WorldSize::Medium,
            seed: "DEFAULT".into(),
            tile_percentages: TilePercentages::default(),
        }
    }
}

/// Longest accepted seed, in characters.
const MAX_SEED_LEN: usize = 50;

impl WorldConfig {
    /// Upstream validation. The generator itself accepts anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let seed_ok = (1..=MAX_SEED_LEN).contains(&self.seed.len())
            && self
                .seed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !seed_ok {
            return Err(ConfigError::InvalidSeed(self.seed.clone()));
        }

        for kind in TileKind::ALL {
            let value = self.tile_percentages.get(kind);
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::PercentageOutOfRange { kind, value });
            }
        }

        let total = self.tile_percentages.total();
        if (total - 100.0).abs() > 0.01 {
            return Err(ConfigError::PercentageTotal(total));
        }
        Ok(())
    }

    /// This config if it validates, otherwise the default one.
    pub fn or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                tracing::warn!(error = %e, "invalid world config, using defaults");
                Self::default()
            }
        }
    }
}

/// Only world document version the loader understands.
pub const CUSTOM_WORLD_VERSION: &str = "1.0";
/// Smallest accepted custom world side, in tiles.
pub const MIN_CUSTOM_SIDE: u32 = 10;
/// Largest accepted custom world side, in tiles.
pub const MAX_CUSTOM_SIDE: u32 = 500;

/// A world authored in the level editor. Positions are in tile units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomWorld {
    pub version: String,
    pub world_width: u32,
    pub world_height: u32,
    pub tiles: Vec<CustomTile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<WorldMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTile {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub kind: TileKind,
    /// Falls back to the kind's default color when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CustomWorld {
    /// An all-grass document of the given size, for editors and tests.
    pub fn blank(world_width: u32, world_height: u32) -> Self {
        Self {
            version: CUSTOM_WORLD_VERSION.into(),
            world_width,
            world_height,
            tiles: Vec::new(),
            metadata: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.name.as_deref())
    }

    /// Structural checks run before a document is turned into a grid.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.version != CUSTOM_WORLD_VERSION {
            return Err(WorldError::UnsupportedVersion(self.version.clone()));
        }

        let side = MIN_CUSTOM_SIDE..=MAX_CUSTOM_SIDE;
        if !side.contains(&self.world_width) || !side.contains(&self.world_height) {
            return Err(WorldError::DimensionsOutOfRange {
                width: self.world_width,
                height: self.world_height,
                min: MIN_CUSTOM_SIDE,
                max: MAX_CUSTOM_SIDE,
            });
        }

        // Allow 10% overhead for duplicate entries.
        let expected = (self.world_width * self.world_height) as usize;
        if self.tiles.len() * 10 > expected * 11 {
            return Err(WorldError::TooManyTiles {
                width: self.world_width,
                height: self.world_height,
                count: self.tiles.len(),
            });
        }

        for tile in &self.tiles {
            let inside = tile.x >= 0
                && tile.y >= 0
                && (tile.x as u32) < self.world_width
                && (tile.y as u32) < self.world_height;
            if !inside {
                return Err(WorldError::TileOutOfBounds {
                    x: tile.x,
                    y: tile.y,
                    width: self.world_width,
                    height: self.world_height,
                });
            }
        }
        Ok(())
    }
}
