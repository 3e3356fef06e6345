use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Key under which the wizard snapshots its raw collected answers.
pub const FALLBACK_KEY: &str = "metrohost_application";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Local key-value store for the flattened field map. Written before any
/// network delivery so a delivery failure never loses the user's input; the
/// server never reads it back.
pub trait SnapshotStore: Send + Sync {
    fn save(&self, key: &str, fields: &BTreeMap<String, String>) -> Result<(), SnapshotError>;
    fn load(&self, key: &str) -> Result<Option<BTreeMap<String, String>>, SnapshotError>;
}

/// Snapshot store writing one JSON file per key under a directory.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, key: &str, fields: &BTreeMap<String, String>) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.dir)?;
        let serialized = serde_json::to_string_pretty(fields)?;
        fs::write(self.path_for(key), serialized)?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<BTreeMap<String, String>>, SnapshotError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

/// Snapshot store backed by process memory, for tests.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    entries: Mutex<BTreeMap<String, BTreeMap<String, String>>>,
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, key: &str, fields: &BTreeMap<String, String>) -> Result<(), SnapshotError> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), fields.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<BTreeMap<String, String>>, SnapshotError> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }
}
