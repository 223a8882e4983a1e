//! In-memory blob store for tests and ephemeral boards.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::BlobKey,
    ports::{BlobStore, BlobStoreError, BlobStoreResult},
};

/// Thread-safe in-memory blob store.
///
/// Clones share the same underlying map, so a test can keep a handle and
/// inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    state: Arc<RwLock<InMemoryBlobState>>,
}

#[derive(Debug, Default)]
struct InMemoryBlobState {
    blobs: HashMap<BlobKey, String>,
    writes: usize,
}

impl InMemoryBlobStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `contents` under `key`.
    #[must_use]
    pub fn with_blob(key: &BlobKey, contents: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.write() {
            state.blobs.insert(key.clone(), contents.into());
        }
        store
    }

    /// Returns how many writes the store has accepted.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.read().map(|state| state.writes).unwrap_or_default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> BlobStoreError {
    BlobStoreError::Unavailable(err.to_string())
}

impl BlobStore for InMemoryBlobStore {
    fn read(&self, key: &BlobKey) -> BlobStoreResult<Option<String>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.blobs.get(key).cloned())
    }

    fn write(&self, key: &BlobKey, contents: &str) -> BlobStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.blobs.insert(key.clone(), contents.to_owned());
        state.writes = state.writes.saturating_add(1);
        Ok(())
    }
}
