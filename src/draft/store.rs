//! Key/value backends for drafts

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft storage is unavailable")]
    Unavailable,
    #[error("draft storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("draft could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw string storage keyed by wizard id, enabling fakes in tests
#[cfg_attr(test, mockall::automock)]
pub trait DraftStore: Send + Sync {
    /// Stored contents for `key`, `None` if nothing was saved
    fn read(&self, key: &str) -> Result<Option<String>, DraftError>;

    fn write(&self, key: &str, contents: &str) -> Result<(), DraftError>;

    /// Delete the entry; deleting a missing entry is not an error
    fn remove(&self, key: &str) -> Result<(), DraftError>;
}

/// One JSON file per key in a directory
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data directory, if one can be determined
    pub fn in_data_dir() -> Option<Self> {
        ProjectDirs::from("io", "lead-wizard", "lead-wizard")
            .map(|dirs| Self::new(dirs.data_dir().join("drafts")))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl DraftStore for FileDraftStore {
    fn read(&self, key: &str) -> Result<Option<String>, DraftError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), DraftError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), contents)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DraftError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage; drafts vanish when the process exits
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn read(&self, key: &str) -> Result<Option<String>, DraftError> {
        let entries = self.entries.lock().map_err(|_| DraftError::Unavailable)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), DraftError> {
        let mut entries = self.entries.lock().map_err(|_| DraftError::Unavailable)?;
        entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DraftError> {
        let mut entries = self.entries.lock().map_err(|_| DraftError::Unavailable)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lead-wizard-{name}-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryDraftStore::new();
        assert_eq!(store.read("k").unwrap(), None);
        store.write("k", "v").unwrap();
        assert_eq!(store.read("k").unwrap(), Some("v".to_string()));
        store.remove("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_dir("round-trip");
        let store = FileDraftStore::new(&dir);
        assert_eq!(store.read("partnership").unwrap(), None);

        store.write("partnership", "{}").unwrap();
        assert_eq!(store.read("partnership").unwrap(), Some("{}".to_string()));

        store.remove("partnership").unwrap();
        assert_eq!(store.read("partnership").unwrap(), None);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_store_remove_missing_is_ok() {
        let store = FileDraftStore::new(temp_dir("missing"));
        assert!(store.remove("nothing").is_ok());
    }

    #[test]
    fn test_file_store_sanitizes_key() {
        let store = FileDraftStore::new("/drafts");
        assert_eq!(
            store.path_for("../partnership/v1"),
            PathBuf::from("/drafts/___partnership_v1.json")
        );
    }

    #[test]
    fn test_in_data_dir_does_not_panic() {
        let _store = FileDraftStore::in_data_dir();
    }
}
