use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::StoreError;

/// String key/value settings, the shape a browser's local storage has.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory settings, for tests and sessions without a settings file.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// Settings persisted as a flat JSON object of strings.
///
/// Changes stay in memory until [`JsonSettingsFile::save`].
#[derive(Debug, Clone)]
pub struct JsonSettingsFile {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonSettingsFile {
    /// Open a settings file. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            serde_json::from_reader(std::fs::File::open(&path)?)?
        } else {
            tracing::debug!(path = %path.display(), "no settings file, starting empty");
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        serde_json::to_writer_pretty(std::fs::File::create(&self.path)?, &self.values)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsFile {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}
