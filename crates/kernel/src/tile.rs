use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use tileworld_common::Color;

/// Terrain class of a tile. `Wall` is the only solid kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Grass,
    Water,
    Wall,
    Cave,
}

impl TileKind {
    pub const ALL: [TileKind; 4] = [
        TileKind::Grass,
        TileKind::Water,
        TileKind::Wall,
        TileKind::Cave,
    ];

    /// Whether the tile blocks movement.
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Wall)
    }

    /// Fill color used when the tile has no texture.
    pub fn default_color(self) -> Color {
        match self {
            TileKind::Grass => Color::rgb(0x4a, 0x7c, 0x59),
            TileKind::Water => Color::rgb(0x41, 0x69, 0xe1),
            TileKind::Wall => Color::rgb(0x8b, 0x5a, 0x2b),
            TileKind::Cave => Color::rgb(0x60, 0x30, 0x00),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Water => "water",
            TileKind::Wall => "wall",
            TileKind::Cave => "cave",
        }
    }

    /// Stable discriminant used for hashing.
    pub(crate) fn code(self) -> u8 {
        match self {
            TileKind::Grass => 0,
            TileKind::Water => 1,
            TileKind::Wall => 2,
            TileKind::Cave => 3,
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One grid cell. Immutable once the grid is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub color: Color,
    /// Deterministic value in `[0, 1)` reserved for visual variation.
    pub texture_variant: f64,
    /// World-space top-left corner (tile index * tile size).
    pub origin: Vec2,
}

impl Tile {
    pub fn new(kind: TileKind, origin: Vec2, texture_variant: f64) -> Self {
        Self {
            kind,
            color: kind.default_color(),
            texture_variant,
            origin,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_walls_are_solid() {
        let solid: Vec<_> = TileKind::ALL.iter().filter(|k| k.is_solid()).collect();
        assert_eq!(solid, vec![&TileKind::Wall]);
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TileKind::Cave).unwrap(), "\"cave\"");
        let k: TileKind = serde_json::from_str("\"water\"").unwrap();
        assert_eq!(k, TileKind::Water);
        assert!(serde_json::from_str::<TileKind>("\"mana\"").is_err());
    }

    #[test]
    fn new_tile_uses_kind_color() {
        let t = Tile::new(TileKind::Wall, Vec2::new(16.0, 0.0), 0.5);
        assert_eq!(t.color.to_hex(), "#8b5a2b");
        assert!(t.is_solid());
    }
}
