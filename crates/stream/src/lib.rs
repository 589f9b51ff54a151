//! Streaming: which tiles a frame touches, and when frames and ticks run.
//!
//! # Invariants
//! - A tile window is a half-open range of tile indices; it may extend past
//!   the world edge, and bounds are the grid's concern.
//! - Simulation ticks run at a fixed step regardless of render rate.

mod pacing;
mod window;

pub use pacing::{FixedTimestep, FrameStep};
pub use window::{DYNAMIC_RENDER_DISTANCE, RenderMode, TileWindow};

pub fn crate_info() -> &'static str {
    "tileworld-stream v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("stream"));
    }
}
