use std::path::{Path, PathBuf};

use tileworld_kernel::CustomWorld;

use crate::StoreError;

/// Accept only `worlds/<name>/world.json`, with `<name>` made of ASCII
/// letters, digits, `-` and `_`. Blocks traversal out of the worlds folder.
pub fn validate_world_path(relative: &str) -> Result<(), StoreError> {
    let parts: Vec<&str> = relative.split('/').collect();
    let ok = match parts.as_slice() {
        [dir, name, file] => {
            dir.eq_ignore_ascii_case("worlds")
                && !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
                && file.eq_ignore_ascii_case("world.json")
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidWorldPath(relative.to_string()))
    }
}

fn resolve(root: &Path, relative: &str) -> Result<PathBuf, StoreError> {
    validate_world_path(relative)?;
    Ok(relative.split('/').fold(root.to_path_buf(), |p, part| p.join(part)))
}

/// Read and validate an editor world document.
pub fn load_custom_world(root: &Path, relative: &str) -> Result<CustomWorld, StoreError> {
    let path = resolve(root, relative)?;
    let world: CustomWorld = serde_json::from_reader(std::fs::File::open(&path)?)?;
    world.validate()?;
    tracing::info!(
        path = %path.display(),
        name = world.name().unwrap_or("unnamed"),
        tiles = world.tiles.len(),
        "world file loaded"
    );
    Ok(world)
}

/// Validate and write an editor world document, creating its folder.
pub fn save_custom_world(
    root: &Path,
    relative: &str,
    world: &CustomWorld,
) -> Result<(), StoreError> {
    let path = resolve(root, relative)?;
    world.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    serde_json::to_writer_pretty(std::fs::File::create(&path)?, world)?;
    Ok(())
}
