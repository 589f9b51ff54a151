//! Errors raised at the kernel's outer surfaces (config and world ingestion).
//!
//! Queries on a built grid never fail; these only come from validating input.

use crate::tile::TileKind;

/// A world generation config that would not pass upstream validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid seed {0:?}: expected 1-50 characters of [A-Za-z0-9_-]")]
    InvalidSeed(String),
    #[error("{kind} percentage out of bounds: {value}")]
    PercentageOutOfRange { kind: TileKind, value: f64 },
    #[error("tile percentages must total 100%, got {0}%")]
    PercentageTotal(f64),
}

/// A custom (editor-authored) world document that cannot be ingested.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("unsupported world format version {0:?}")]
    UnsupportedVersion(String),
    #[error("world dimensions {width}x{height} out of bounds ({min}..={max} tiles per side)")]
    DimensionsOutOfRange {
        width: u32,
        height: u32,
        min: u32,
        max: u32,
    },
    #[error("too many tiles for a {width}x{height} world: {count}")]
    TooManyTiles { width: u32, height: u32, count: usize },
    #[error("tile position ({x}, {y}) outside a {width}x{height} world")]
    TileOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}
