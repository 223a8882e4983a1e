//! Drag gesture resolution.
//!
//! A gesture is `start`, any number of `over` events, then `end` or
//! `cancel`. Moving a card over another stage's column commits the stage
//! change immediately so the board shows the card in its new column while
//! the pointer is still down. Reordering within a stage commits only on
//! drop. Cancelling never reverts a stage change already committed.

use mockable::Clock;
use tracing::debug;

use super::{
    projector::stage_tasks,
    store::{StoreError, StoreResult, TaskStore},
};
use crate::board::{
    domain::{TaskId, TaskStatus},
    ports::BlobStore,
};

/// What the pointer is currently over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A stage column.
    Stage(TaskStatus),
    /// Another task card.
    Task(TaskId),
}

/// Gesture state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A task is being dragged.
    Dragging {
        /// The dragged task.
        task_id: TaskId,
        /// Stage the task occupied when the gesture started.
        origin: TaskStatus,
    },
}

/// Result of feeding one event to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// A gesture began.
    Started {
        /// The dragged task.
        task_id: TaskId,
        /// Whether an earlier gesture was cancelled to make room.
        replaced: bool,
    },
    /// The dragged task was moved to another stage during the gesture.
    Previewed {
        /// Stage the task now occupies.
        status: TaskStatus,
    },
    /// The drop moved the task to another stage.
    Moved {
        /// Stage the task now occupies.
        status: TaskStatus,
    },
    /// The drop changed the order within a stage.
    Reordered {
        /// Stage whose order changed.
        status: TaskStatus,
        /// Index the dragged task came from.
        from: usize,
        /// Index the dragged task landed at.
        to: usize,
    },
    /// The event had no effect.
    Ignored,
    /// A gesture was aborted.
    Cancelled,
}

/// Turns drag events into task store mutations.
#[derive(Debug, Clone, Default)]
pub struct ReorderResolver {
    state: GestureState,
}

impl ReorderResolver {
    /// Creates an idle resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current gesture state.
    #[must_use]
    pub const fn state(&self) -> &GestureState {
        &self.state
    }

    /// Returns the dragged task, if a gesture is in progress.
    #[must_use]
    pub const fn dragged(&self) -> Option<&TaskId> {
        match &self.state {
            GestureState::Dragging { task_id, .. } => Some(task_id),
            GestureState::Idle => None,
        }
    }

    /// Begins dragging `task_id`.
    ///
    /// A gesture already in progress is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the task does not exist; the
    /// resolver state is left unchanged.
    pub fn start<B, C>(
        &mut self,
        store: &TaskStore<B, C>,
        task_id: &TaskId,
    ) -> StoreResult<GestureOutcome>
    where
        B: BlobStore,
        C: Clock + Send + Sync,
    {
        let task = store
            .get(task_id)
            .ok_or_else(|| StoreError::NotFound(task_id.clone()))?;
        let replaced = self.cancel() == GestureOutcome::Cancelled;
        self.state = GestureState::Dragging {
            task_id: task_id.clone(),
            origin: task.status(),
        };
        debug!(task_id = %task_id, replaced, "drag started");
        Ok(GestureOutcome::Started {
            task_id: task_id.clone(),
            replaced,
        })
    }

    /// Handles the pointer moving over `target`.
    ///
    /// Only a stage column differing from the dragged task's current stage
    /// has an effect.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the dragged task was deleted
    /// mid-gesture; the gesture is abandoned.
    pub fn over<B, C>(
        &mut self,
        store: &mut TaskStore<B, C>,
        target: &DropTarget,
    ) -> StoreResult<GestureOutcome>
    where
        B: BlobStore,
        C: Clock + Send + Sync,
    {
        let Some(task_id) = self.dragged().cloned() else {
            return Ok(GestureOutcome::Ignored);
        };
        let DropTarget::Stage(status) = target else {
            return Ok(GestureOutcome::Ignored);
        };
        if self.move_if_needed(store, &task_id, *status)? {
            return Ok(GestureOutcome::Previewed { status: *status });
        }
        Ok(GestureOutcome::Ignored)
    }

    /// Handles the drop and returns to idle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the dragged task was deleted
    /// mid-gesture, whatever the target.
    pub fn end<B, C>(
        &mut self,
        store: &mut TaskStore<B, C>,
        target: Option<&DropTarget>,
    ) -> StoreResult<GestureOutcome>
    where
        B: BlobStore,
        C: Clock + Send + Sync,
    {
        let state = std::mem::take(&mut self.state);
        let GestureState::Dragging { task_id, .. } = state else {
            return Ok(GestureOutcome::Ignored);
        };
        if store.get(&task_id).is_none() {
            return Err(StoreError::NotFound(task_id));
        }
        match target {
            None => Ok(GestureOutcome::Ignored),
            Some(DropTarget::Stage(status)) => {
                if self.move_if_needed(store, &task_id, *status)? {
                    return Ok(GestureOutcome::Moved { status: *status });
                }
                Ok(GestureOutcome::Ignored)
            }
            Some(DropTarget::Task(over_id)) => Ok(reorder_within_stage(store, &task_id, over_id)),
        }
    }

    /// Aborts the gesture in progress.
    ///
    /// Stage changes already committed while dragging stay in place.
    pub fn cancel(&mut self) -> GestureOutcome {
        match std::mem::take(&mut self.state) {
            GestureState::Dragging { task_id, origin } => {
                debug!(task_id = %task_id, origin = %origin, "drag cancelled");
                GestureOutcome::Cancelled
            }
            GestureState::Idle => GestureOutcome::Ignored,
        }
    }

    fn move_if_needed<B, C>(
        &mut self,
        store: &mut TaskStore<B, C>,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> StoreResult<bool>
    where
        B: BlobStore,
        C: Clock + Send + Sync,
    {
        let Some(current) = store.get(task_id).map(|task| task.status()) else {
            self.state = GestureState::Idle;
            return Err(StoreError::NotFound(task_id.clone()));
        };
        if current == status {
            return Ok(false);
        }
        store.move_task(task_id, status)?;
        Ok(true)
    }
}

/// Array-move of the dragged task onto the target's index within their
/// shared stage.
fn reorder_within_stage<B, C>(
    store: &mut TaskStore<B, C>,
    task_id: &TaskId,
    over_id: &TaskId,
) -> GestureOutcome
where
    B: BlobStore,
    C: Clock + Send + Sync,
{
    let (Some(dragged), Some(over)) = (store.get(task_id), store.get(over_id)) else {
        return GestureOutcome::Ignored;
    };
    let status = dragged.status();
    if over.status() != status {
        return GestureOutcome::Ignored;
    }

    let mut order: Vec<TaskId> = stage_tasks(store.tasks(), status)
        .into_iter()
        .map(|task| task.id().clone())
        .collect();
    let from = order.iter().position(|id| id == task_id);
    let to = order.iter().position(|id| id == over_id);
    let (Some(from), Some(to)) = (from, to) else {
        return GestureOutcome::Ignored;
    };
    if from == to {
        return GestureOutcome::Ignored;
    }

    let moved = order.remove(from);
    order.insert(to, moved);
    store.resequence(status, &order);
    debug!(task_id = %task_id, status = %status, from, to, "reordered within stage");
    GestureOutcome::Reordered { status, from, to }
}
