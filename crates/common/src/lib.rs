//! Shared value types used by every tileworld crate.
//!
//! # Invariants
//! - Types here are plain data: no world state, no IO.
//! - World/pixel coordinates are `f32`; tile coordinates are `i32` grid indices.

mod types;

pub use types::{Color, ColorParseError, Rect, TileCoord};

pub use glam::Vec2;
