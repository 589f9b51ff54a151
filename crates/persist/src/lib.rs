//! Persistence: key/value settings and editor-authored world files.
//!
//! # Invariants
//! - Settings are plain strings; typed interpretation belongs to the reader.
//! - World files are only read from `worlds/<name>/world.json` under a root,
//!   and are validated before they are handed out.

mod settings;
mod world_file;

pub use settings::{JsonSettingsFile, MemorySettings, SettingsStore};
pub use world_file::{load_custom_world, save_custom_world, validate_world_path};

use tileworld_kernel::WorldError;

/// Errors from settings and world file operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid world path {0:?}: expected worlds/<name>/world.json")]
    InvalidWorldPath(String),
    #[error("invalid world data: {0}")]
    InvalidWorld(#[from] WorldError),
}

pub fn crate_info() -> &'static str {
    "tileworld-persist v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("persist"));
    }

    #[test]
    fn invalid_path_error_names_the_layout() {
        let e = StoreError::InvalidWorldPath("maps/a.json".into());
        assert!(e.to_string().contains("worlds/<name>/world.json"));
    }
}
