//! Authoritative in-memory task collection with write-through persistence.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{debug, warn};

use super::{
    persistence::{PersistenceError, TaskPersistence},
    projector::stage_tasks,
};
use crate::board::{
    domain::{NewTask, Task, TaskId, TaskPatch, TaskStatus, ValidationError},
    ports::BlobStore,
};

/// Immutable view of the collection handed to subscribers.
pub type TaskSnapshot = Arc<[Task]>;

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&TaskSnapshot) + Send>;

/// Errors returned by task store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input validation failed; nothing was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Result type for task store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Owns the task collection for a session.
///
/// Every successful mutation writes the full collection through the
/// persistence adapter and then notifies subscribers with a fresh snapshot.
/// A failed write is logged and remembered but never undoes the in-memory
/// change.
pub struct TaskStore<B, C>
where
    B: BlobStore,
    C: Clock + Send + Sync,
{
    persistence: TaskPersistence<B>,
    clock: Arc<C>,
    tasks: Vec<Task>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    last_persistence_error: Option<PersistenceError>,
}

impl<B, C> fmt::Debug for TaskStore<B, C>
where
    B: BlobStore,
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("key", self.persistence.key())
            .field("tasks", &self.tasks.len())
            .field("subscribers", &self.subscribers.len())
            .field("last_persistence_error", &self.last_persistence_error)
            .finish_non_exhaustive()
    }
}

impl<B, C> TaskStore<B, C>
where
    B: BlobStore,
    C: Clock + Send + Sync,
{
    /// Opens a store from the persisted collection, or the seed collection
    /// when none is saved.
    #[must_use]
    pub fn open(persistence: TaskPersistence<B>, clock: Arc<C>) -> Self {
        let tasks = persistence.load(&*clock);
        Self::with_tasks(persistence, clock, tasks)
    }

    /// Creates a store holding `tasks` without reading the blob.
    #[must_use]
    pub const fn with_tasks(
        persistence: TaskPersistence<B>,
        clock: Arc<C>,
        tasks: Vec<Task>,
    ) -> Self {
        Self {
            persistence,
            clock,
            tasks,
            subscribers: Vec::new(),
            next_subscription: 0,
            last_persistence_error: None,
        }
    }

    /// Returns the collection in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns an immutable snapshot of the collection.
    #[must_use]
    pub fn snapshot(&self) -> TaskSnapshot {
        Arc::from(self.tasks.as_slice())
    }

    /// Returns the task with `id`, if present.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns the error from the most recent write, if it failed.
    #[must_use]
    pub const fn last_persistence_error(&self) -> Option<&PersistenceError> {
        self.last_persistence_error.as_ref()
    }

    /// Registers a callback invoked after every successful mutation.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&TaskSnapshot) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Creates a task and appends it to the end of its stage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when the title is blank; the
    /// collection is left unchanged.
    pub fn create(&mut self, fields: NewTask) -> StoreResult<Task> {
        let id = self.fresh_id();
        let sequence = self.next_sequence(fields.status, None);
        let task = Task::new(id, fields, sequence, &*self.clock)?;
        debug!(task_id = %task.id(), status = %task.status(), "created task");
        self.tasks.push(task.clone());
        self.commit();
        Ok(task)
    }

    /// Merges `patch` over the task with `id`.
    ///
    /// A stage change places the task last in its new stage and applies the
    /// completion timestamp rule.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no task has `id` and
    /// [`StoreError::Validation`] when the patch carries a blank title.
    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) -> StoreResult<Task> {
        let index = self.index_of(id)?;
        let current_status = self.tasks.get(index).map(Task::status);
        let placement = patch
            .status
            .filter(|status| Some(*status) != current_status)
            .map(|status| self.next_sequence(status, Some(id)));

        let task = self
            .tasks
            .get_mut(index)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        task.apply(patch, &*self.clock)?;
        if let Some(sequence) = placement {
            task.place(sequence);
        }
        let updated = task.clone();
        debug!(task_id = %id, status = %updated.status(), "updated task");
        self.commit();
        Ok(updated)
    }

    /// Moves the task with `id` to `status`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no task has `id`.
    pub fn move_task(&mut self, id: &TaskId, status: TaskStatus) -> StoreResult<Task> {
        self.update(id, TaskPatch::status(status))
    }

    /// Removes the task with `id`.
    ///
    /// Removing an absent task is a no-op that neither writes nor notifies.
    /// Returns the removed task.
    pub fn delete(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id() == id)?;
        let removed = self.tasks.remove(index);
        debug!(task_id = %id, "deleted task");
        self.commit();
        Some(removed)
    }

    /// Rewrites the display order of one stage.
    ///
    /// `ordered_ids` lists the stage's tasks front to back. Identifiers of
    /// tasks outside the stage are ignored; stage members that are not
    /// listed keep their relative order after the listed ones. Only tasks
    /// whose rank changes are touched. Returns `true` when anything changed.
    pub fn resequence(&mut self, status: TaskStatus, ordered_ids: &[TaskId]) -> bool {
        let current: Vec<TaskId> = stage_tasks(&self.tasks, status)
            .into_iter()
            .map(|task| task.id().clone())
            .collect();
        let members: HashSet<&TaskId> = current.iter().collect();
        let mut placed: HashSet<&TaskId> = HashSet::with_capacity(current.len());
        let desired: Vec<&TaskId> = ordered_ids
            .iter()
            .filter(|id| members.contains(id))
            .chain(current.iter())
            .filter(|id| placed.insert(*id))
            .collect();

        let mut changed = false;
        for (rank, id) in desired.into_iter().enumerate() {
            let sequence = u64::try_from(rank).unwrap_or(u64::MAX);
            if let Some(task) = self.tasks.iter_mut().find(|task| task.id() == id)
                && task.sequence() != sequence
            {
                task.reposition(sequence, &*self.clock);
                changed = true;
            }
        }
        if changed {
            debug!(status = %status, "resequenced stage");
            self.commit();
        }
        changed
    }

    /// Replaces the in-memory collection with the persisted one.
    pub fn reload(&mut self) {
        self.tasks = self.persistence.load(&*self.clock);
        self.notify();
    }

    fn index_of(&self, id: &TaskId) -> StoreResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn fresh_id(&self) -> TaskId {
        loop {
            let candidate = TaskId::generate();
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn next_sequence(&self, status: TaskStatus, excluding: Option<&TaskId>) -> u64 {
        self.tasks
            .iter()
            .filter(|task| task.status() == status && Some(task.id()) != excluding)
            .map(Task::sequence)
            .max()
            .map_or(0, |highest| highest.saturating_add(1))
    }

    fn commit(&mut self) {
        match self.persistence.save(&self.tasks) {
            Ok(()) => self.last_persistence_error = None,
            Err(err) => {
                warn!(key = %self.persistence.key(), error = %err, "task collection write failed");
                self.last_persistence_error = Some(err);
            }
        }
        self.notify();
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&snapshot);
        }
    }
}
