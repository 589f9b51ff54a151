//! World Kernel: tile storage, deterministic generation, collision and tile queries.
//!
//! # Invariants
//! - Same seed, percentages and dimensions produce an identical tile array.
//! - Every grid cell holds exactly one tile; `wall` is the only solid kind.
//! - Queries outside the world return `None` or a passable default, never panic.
//! - A grid is built whole (generated or loaded) and never partially regenerated.

pub mod config;
pub mod error;
pub mod rng;
pub mod tile;
pub mod world;

pub use config::{CustomTile, CustomWorld, TilePercentages, WorldConfig, WorldMetadata, WorldSize};
pub use error::{ConfigError, WorldError};
pub use rng::SeededRng;
pub use tile::{Tile, TileKind};
pub use world::{Dimensions, TILE_SIZE, TileCounts, WorldGrid};
