//! Fixtures and test doubles shared by the board unit tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rstest::fixture;

use crate::board::{
    adapters::{clock::ManualClock, memory::InMemoryBlobStore},
    domain::{BlobKey, NewTask, Task, TaskId, TaskStatus},
    ports::{BlobStore, BlobStoreError, BlobStoreResult},
    services::{TaskPersistence, TaskStore},
};

pub(super) type MemoryStore = TaskStore<InMemoryBlobStore, ManualClock>;

pub(super) fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid start instant")
}

/// A store over an in-memory blob, with handles on its blob and clock.
pub(super) struct Harness {
    pub blobs: InMemoryBlobStore,
    pub clock: Arc<ManualClock>,
    pub store: MemoryStore,
}

impl Harness {
    pub fn open(blobs: InMemoryBlobStore) -> Self {
        let clock = Arc::new(ManualClock::new(start_instant()));
        let persistence = TaskPersistence::new(Arc::new(blobs.clone()), BlobKey::default());
        let store = TaskStore::open(persistence, Arc::clone(&clock));
        Self {
            blobs,
            clock,
            store,
        }
    }

    pub fn empty() -> Self {
        let clock = Arc::new(ManualClock::new(start_instant()));
        let blobs = InMemoryBlobStore::new();
        let persistence = TaskPersistence::new(Arc::new(blobs.clone()), BlobKey::default());
        let store = TaskStore::with_tasks(persistence, Arc::clone(&clock), Vec::new());
        Self {
            blobs,
            clock,
            store,
        }
    }

    /// Creates a task titled `title` in `status`, advancing the clock first
    /// so creations get distinct timestamps.
    pub fn add(&mut self, title: &str, status: TaskStatus) -> Task {
        self.clock.advance(chrono::TimeDelta::seconds(1));
        self.store
            .create(NewTask::new(title).with_status(status))
            .expect("valid task")
    }

    /// Titles of `status` in display order.
    pub fn stage_titles(&self, status: TaskStatus) -> Vec<String> {
        crate::board::services::stage_tasks(self.store.tasks(), status)
            .into_iter()
            .map(|task| task.title().to_owned())
            .collect()
    }

    pub fn persisted(&self) -> Option<String> {
        self.blobs
            .read(&BlobKey::default())
            .expect("in-memory read succeeds")
    }
}

#[fixture]
pub(super) fn empty_board() -> Harness {
    Harness::empty()
}

#[fixture]
pub(super) fn seeded_board() -> Harness {
    Harness::open(InMemoryBlobStore::new())
}

/// Blob store whose writes always fail.
#[derive(Debug, Default)]
pub(super) struct FailingBlobStore;

impl BlobStore for FailingBlobStore {
    fn read(&self, _key: &BlobKey) -> BlobStoreResult<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &BlobKey, _contents: &str) -> BlobStoreResult<()> {
        Err(BlobStoreError::Unavailable("quota exceeded".to_owned()))
    }
}

pub(super) fn id(value: &str) -> TaskId {
    TaskId::from(value)
}
