//! Best-effort save/load of a wizard's fields

use super::store::DraftStore;
use crate::state::{FieldSnapshot, FieldStore};
use std::sync::Arc;

/// Outcome of a save or clear, so the UI never claims a save that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftStatus {
    Saved,
    Cleared,
    Failed(String),
}

/// Reads and writes one wizard's draft under a fixed key
#[derive(Clone)]
pub struct DraftPersistence {
    store: Arc<dyn DraftStore>,
    key: String,
}

impl std::fmt::Debug for DraftPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl DraftPersistence {
    pub fn new(store: Arc<dyn DraftStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Serialize every field as a flat key/value JSON object
    pub fn save(&self, fields: &FieldStore) -> DraftStatus {
        let result = serde_json::to_string(&fields.snapshot())
            .map_err(Into::into)
            .and_then(|json| self.store.write(&self.key, &json));
        match result {
            Ok(()) => {
                tracing::debug!(key = %self.key, "draft saved");
                DraftStatus::Saved
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "draft save failed, continuing in memory");
                DraftStatus::Failed(e.to_string())
            }
        }
    }

    /// Previously saved values, or `None` when absent, unreadable, or corrupt
    pub fn load(&self) -> Option<FieldSnapshot> {
        let content = match self.store.read(&self.key) {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "draft unreadable, starting fresh");
                return None;
            }
        };
        match serde_json::from_str::<FieldSnapshot>(&content) {
            Ok(snapshot) => {
                tracing::info!(key = %self.key, fields = snapshot.len(), "draft restored");
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "draft corrupt, starting fresh");
                None
            }
        }
    }

    pub fn clear(&self) -> DraftStatus {
        match self.store.remove(&self.key) {
            Ok(()) => DraftStatus::Cleared,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "draft clear failed");
                DraftStatus::Failed(e.to_string())
            }
        }
    }
}
