//! Task aggregate root and the payloads used to create and edit it.

use super::{
    TaskId, TaskPriority, TaskStatus, ValidationError,
    time::{advance_past, now_millis},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// Serializes to the camelCase record stored in the board blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "super::time::option"
    )]
    due_date: Option<DateTime<Utc>>,
    #[serde(with = "super::time")]
    created_at: DateTime<Utc>,
    #[serde(with = "super::time")]
    updated_at: DateTime<Utc>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    estimated_time: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "super::time::option"
    )]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    sequence: u64,
}

/// Caller-supplied fields for a new task.
///
/// Identifier and lifecycle timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    /// Task title; must be non-empty after trimming.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Initial workflow stage.
    pub status: TaskStatus,
    /// Display weighting.
    pub priority: TaskPriority,
    /// Free-text labels.
    pub tags: Vec<String>,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional estimate in minutes.
    pub estimated_time: Option<u32>,
}

impl NewTask {
    /// Creates a `todo` task payload with medium priority.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial stage.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the estimate in minutes.
    #[must_use]
    pub const fn with_estimated_time(mut self, minutes: u32) -> Self {
        self.estimated_time = Some(minutes);
        self
    }
}

/// Partial update merged over an existing task.
///
/// Outer `None` leaves a field untouched. For optional fields the inner
/// `None` clears the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement or cleared description.
    pub description: Option<Option<String>>,
    /// Target stage.
    pub status: Option<TaskStatus>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// Replacement or cleared due date.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Replacement or cleared estimate.
    pub estimated_time: Option<Option<u32>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a patch that only changes the stage.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Clears the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Sets the target stage.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    /// Clears the due date.
    #[must_use]
    pub const fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Replaces the estimate in minutes.
    #[must_use]
    pub const fn with_estimated_time(mut self, minutes: u32) -> Self {
        self.estimated_time = Some(Some(minutes));
        self
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted stage.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted tags.
    pub tags: Vec<String>,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted estimate in minutes, if any.
    pub estimated_time: Option<u32>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted intra-stage rank.
    pub sequence: u64,
}

impl Task {
    /// Creates a new task from caller-supplied fields.
    ///
    /// The title is stored trimmed. A task created directly in the completed
    /// stage receives a completion timestamp equal to its creation time.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] when the title is blank.
    pub fn new(
        id: TaskId,
        fields: NewTask,
        sequence: u64,
        clock: &impl Clock,
    ) -> Result<Self, ValidationError> {
        let title = validated_title(&fields.title)?;
        let timestamp = now_millis(clock);
        Ok(Self {
            id,
            title,
            description: fields.description,
            status: fields.status,
            priority: fields.priority,
            due_date: fields.due_date,
            created_at: timestamp,
            updated_at: timestamp,
            tags: fields.tags,
            estimated_time: fields.estimated_time,
            completed_at: fields.status.is_completed().then_some(timestamp),
            sequence,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
            tags: data.tags,
            estimated_time: data.estimated_time,
            completed_at: data.completed_at,
            sequence: data.sequence,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the workflow stage.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the tags in stored order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the estimate in minutes, if any.
    #[must_use]
    pub const fn estimated_time(&self) -> Option<u32> {
        self.estimated_time
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the intra-stage display rank.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns `true` when the task is past due and not completed.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_completed() && self.due_date.is_some_and(|due| due < now)
    }

    /// Merges a patch over this task.
    ///
    /// The patch is validated before anything changes. A stage change sets
    /// the completion timestamp when entering the completed stage and clears
    /// it when leaving. `updated_at` always advances.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] when the patch carries a blank
    /// title; the task is left untouched.
    pub fn apply(&mut self, patch: TaskPatch, clock: &impl Clock) -> Result<(), ValidationError> {
        let title = patch.title.as_deref().map(validated_title).transpose()?;
        let timestamp = self.touch(clock);

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(estimated_time) = patch.estimated_time {
            self.estimated_time = estimated_time;
        }
        if let Some(status) = patch.status
            && status != self.status
        {
            self.status = status;
            self.completed_at = status.is_completed().then_some(timestamp);
        }
        Ok(())
    }

    /// Changes the intra-stage rank, advancing `updated_at`.
    pub fn reposition(&mut self, sequence: u64, clock: &impl Clock) {
        self.sequence = sequence;
        self.touch(clock);
    }

    /// Places the task at a rank without touching timestamps.
    ///
    /// Used by the store alongside a mutation that already advanced
    /// `updated_at`.
    pub(crate) const fn place(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    /// Raises `updated_at` to `created_at` when a stored record violates the
    /// ordering. Returns `true` when a correction was made.
    pub(crate) fn clamp_updated_at(&mut self) -> bool {
        if self.updated_at < self.created_at {
            self.updated_at = self.created_at;
            return true;
        }
        false
    }

    /// Advances `updated_at` and returns the new value.
    fn touch(&mut self, clock: &impl Clock) -> DateTime<Utc> {
        self.updated_at = advance_past(self.updated_at, now_millis(clock));
        self.updated_at
    }
}

fn validated_title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}
