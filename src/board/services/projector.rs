//! Derived board views: search and tag filtering, stage columns, and
//! summary statistics.
//!
//! Every function here is a pure function of its inputs. Callers recompute
//! the view whenever the collection, the search text, or the tag selection
//! changes.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::board::domain::{Task, TaskStatus};

/// Ephemeral search and tag selection driving the board view.
///
/// Never persisted; reset only through [`BoardQuery::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardQuery {
    search: String,
    tags: BTreeSet<String>,
}

impl BoardQuery {
    /// Creates an empty query that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Replaces the tag selection.
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns the selected tags.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Replaces the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Selects `tag` if it is not selected, otherwise deselects it.
    ///
    /// Returns `true` when the tag is selected afterwards.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.tags.remove(tag) {
            return false;
        }
        self.tags.insert(tag.to_owned());
        true
    }

    /// Clears both the search text and the tag selection.
    pub fn clear(&mut self) {
        self.search.clear();
        self.tags.clear();
    }

    /// Returns `true` when the query matches every task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.tags.is_empty()
    }

    /// Returns `true` when `task` satisfies both the text and tag criteria.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task) && self.matches_tags(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title().to_lowercase().contains(&needle)
            || task
                .description()
                .is_some_and(|description| description.to_lowercase().contains(&needle))
    }

    fn matches_tags(&self, task: &Task) -> bool {
        self.tags.is_empty() || task.tags().iter().any(|tag| self.tags.contains(tag))
    }
}

/// Returns the tasks matching `query`, in collection order.
#[must_use]
pub fn filter<'a>(tasks: &'a [Task], query: &BoardQuery) -> Vec<&'a Task> {
    tasks.iter().filter(|task| query.matches(task)).collect()
}

/// Returns the tasks of one stage in display order.
///
/// Display order is ascending `sequence`; equal ranks keep input order.
#[must_use]
pub fn stage_tasks<'a, I>(tasks: I, status: TaskStatus) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut stage: Vec<&Task> = tasks
        .into_iter()
        .filter(|task| task.status() == status)
        .collect();
    stage.sort_by_key(|task| task.sequence());
    stage
}

/// Tasks split into one ordered column per stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePartition<'a> {
    columns: BTreeMap<TaskStatus, Vec<&'a Task>>,
}

impl<'a> StagePartition<'a> {
    /// Returns the ordered tasks of `status`.
    #[must_use]
    pub fn stage(&self, status: TaskStatus) -> &[&'a Task] {
        self.columns
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over every stage in display order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[&'a Task])> {
        self.columns
            .iter()
            .map(|(status, tasks)| (*status, tasks.as_slice()))
    }
}

/// Splits already filtered tasks into stage columns.
#[must_use]
pub fn partition_by_status<'a>(filtered: &[&'a Task]) -> StagePartition<'a> {
    let columns = TaskStatus::ALL
        .into_iter()
        .map(|status| (status, stage_tasks(filtered.iter().copied(), status)))
        .collect();
    StagePartition { columns }
}

/// Returns every tag used anywhere in the collection.
#[must_use]
pub fn all_tags(tasks: &[Task]) -> BTreeSet<String> {
    tasks
        .iter()
        .flat_map(|task| task.tags().iter().cloned())
        .collect()
}

/// Summary counts for the board header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardStats {
    /// Number of tasks.
    pub total: usize,
    /// Number of tasks per stage; every stage is present.
    pub by_status: BTreeMap<TaskStatus, usize>,
    /// Tasks past their due date and not completed.
    pub overdue: usize,
    /// Completed share of all tasks as a rounded percentage.
    pub completion_rate: u8,
}

impl BoardStats {
    /// Returns the number of tasks in `status`.
    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or_default()
    }

    /// Returns the number of completed tasks.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.count(TaskStatus::Completed)
    }

    /// Returns the number of tasks in progress.
    #[must_use]
    pub fn in_progress(&self) -> usize {
        self.count(TaskStatus::InProgress)
    }
}

/// Computes summary statistics as of `now`.
#[must_use]
pub fn stats(tasks: &[Task], now: DateTime<Utc>) -> BoardStats {
    let mut by_status: BTreeMap<TaskStatus, usize> =
        TaskStatus::ALL.into_iter().map(|status| (status, 0)).collect();
    for task in tasks {
        by_status
            .entry(task.status())
            .and_modify(|count| *count = count.saturating_add(1));
    }
    let overdue = tasks.iter().filter(|task| task.is_overdue(now)).count();
    let completed = by_status
        .get(&TaskStatus::Completed)
        .copied()
        .unwrap_or_default();
    BoardStats {
        total: tasks.len(),
        by_status,
        overdue,
        completion_rate: rounded_percentage(completed, tasks.len()),
    }
}

/// Rounds `part / whole * 100` half-up; zero when `whole` is zero.
fn rounded_percentage(part: usize, whole: usize) -> u8 {
    let numerator = part.saturating_mul(200).saturating_add(whole);
    let rate = numerator
        .checked_div(whole.saturating_mul(2))
        .unwrap_or_default();
    u8::try_from(rate).unwrap_or(100)
}

/// Everything the board renders for one combination of collection and
/// query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView<'a> {
    /// Tasks matching the query, in collection order.
    pub filtered: Vec<&'a Task>,
    /// Matching tasks split into stage columns.
    pub columns: StagePartition<'a>,
    /// Tags across the whole collection, for the filter control.
    pub all_tags: BTreeSet<String>,
    /// Statistics across the whole collection.
    pub stats: BoardStats,
}

/// Projects the collection through `query` as of `now`.
#[must_use]
pub fn project<'a>(tasks: &'a [Task], query: &BoardQuery, now: DateTime<Utc>) -> BoardView<'a> {
    let filtered = filter(tasks, query);
    let columns = partition_by_status(&filtered);
    BoardView {
        filtered,
        columns,
        all_tags: all_tags(tasks),
        stats: stats(tasks, now),
    }
}
