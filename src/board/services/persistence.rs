//! Serialization of the task collection to a single named blob.

use std::collections::HashSet;
use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{debug, warn};

use crate::board::{
    domain::{BlobKey, Task, seed_tasks},
    ports::{BlobStore, BlobStoreError},
};

/// Errors raised while reading or writing the task blob.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The collection could not be encoded.
    #[error("failed to encode task collection: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored blob could not be decoded.
    #[error("failed to decode task collection: {0}")]
    Decode(#[source] serde_json::Error),

    /// The blob store failed.
    #[error(transparent)]
    Storage(#[from] BlobStoreError),
}

/// Reads and writes the full task collection under one blob key.
#[derive(Debug)]
pub struct TaskPersistence<B>
where
    B: BlobStore,
{
    store: Arc<B>,
    key: BlobKey,
}

impl<B> TaskPersistence<B>
where
    B: BlobStore,
{
    /// Creates a persistence adapter scoped to `key`.
    #[must_use]
    pub const fn new(store: Arc<B>, key: BlobKey) -> Self {
        Self { store, key }
    }

    /// Returns the blob key.
    #[must_use]
    pub const fn key(&self) -> &BlobKey {
        &self.key
    }

    /// Loads the saved collection, falling back to the seed collection.
    ///
    /// A missing, unreadable, or undecodable blob yields
    /// [`seed_tasks`]; the cause is logged.
    pub fn load(&self, clock: &impl Clock) -> Vec<Task> {
        match self.try_load() {
            Ok(Some(tasks)) => {
                debug!(key = %self.key, count = tasks.len(), "loaded task collection");
                tasks
            }
            Ok(None) => {
                debug!(key = %self.key, "no saved task collection, using seed");
                seed_tasks(clock)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "saved task collection unusable, using seed");
                seed_tasks(clock)
            }
        }
    }

    /// Loads the saved collection without a fallback.
    ///
    /// Returns `Ok(None)` when nothing has been saved. Duplicate identifiers
    /// keep their first occurrence, and an `updatedAt` earlier than
    /// `createdAt` is raised to match.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] when the blob cannot be read and
    /// [`PersistenceError::Decode`] when it is not a valid task array.
    pub fn try_load(&self) -> Result<Option<Vec<Task>>, PersistenceError> {
        let Some(raw) = self.store.read(&self.key)? else {
            return Ok(None);
        };
        let decoded: Vec<Task> = serde_json::from_str(&raw).map_err(PersistenceError::Decode)?;
        Ok(Some(self.sanitize(decoded)))
    }

    /// Writes the full collection.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Encode`] when encoding fails and
    /// [`PersistenceError::Storage`] when the write is rejected.
    pub fn save(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(tasks).map_err(PersistenceError::Encode)?;
        self.store.write(&self.key, &encoded)?;
        debug!(key = %self.key, count = tasks.len(), "saved task collection");
        Ok(())
    }

    fn sanitize(&self, decoded: Vec<Task>) -> Vec<Task> {
        let mut seen = HashSet::with_capacity(decoded.len());
        let mut tasks = Vec::with_capacity(decoded.len());
        for mut task in decoded {
            if !seen.insert(task.id().clone()) {
                warn!(key = %self.key, task_id = %task.id(), "dropping duplicate task record");
                continue;
            }
            if task.clamp_updated_at() {
                warn!(key = %self.key, task_id = %task.id(), "updatedAt preceded createdAt");
            }
            tasks.push(task);
        }
        tasks
    }
}
