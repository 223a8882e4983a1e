//! Example collection used when no saved board exists.

use super::{PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus, time::now_millis};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

struct SeedEntry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: TaskPriority,
    due_in_days: Option<i64>,
    tags: &'static [&'static str],
    estimated_time: u32,
}

const SEED: [SeedEntry; 4] = [
    SeedEntry {
        id: "1",
        title: "Design new landing page",
        description: "Create wireframes and mockups for the new product landing page",
        status: TaskStatus::Todo,
        priority: TaskPriority::High,
        due_in_days: Some(3),
        tags: &["design", "frontend"],
        estimated_time: 120,
    },
    SeedEntry {
        id: "2",
        title: "Implement user authentication",
        description: "Set up JWT authentication with refresh tokens",
        status: TaskStatus::InProgress,
        priority: TaskPriority::High,
        due_in_days: Some(5),
        tags: &["backend", "security"],
        estimated_time: 180,
    },
    SeedEntry {
        id: "3",
        title: "Write API documentation",
        description: "Document all REST endpoints with examples",
        status: TaskStatus::Review,
        priority: TaskPriority::Medium,
        due_in_days: None,
        tags: &["documentation"],
        estimated_time: 90,
    },
    SeedEntry {
        id: "4",
        title: "Setup CI/CD pipeline",
        description: "Configure automated testing and deployment",
        status: TaskStatus::Completed,
        priority: TaskPriority::Medium,
        due_in_days: None,
        tags: &["devops"],
        estimated_time: 240,
    },
];

/// Returns the four example tasks, one per stage.
///
/// Due dates are relative to the clock reading, so a freshly seeded board
/// never starts with overdue work.
#[must_use]
pub fn seed_tasks(clock: &impl Clock) -> Vec<Task> {
    let now = now_millis(clock);
    SEED.iter().map(|entry| seed_task(entry, now)).collect()
}

fn seed_task(entry: &SeedEntry, now: DateTime<Utc>) -> Task {
    let due_date = entry
        .due_in_days
        .and_then(|days| now.checked_add_signed(TimeDelta::days(days)));
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(entry.id),
        title: entry.title.to_owned(),
        description: Some(entry.description.to_owned()),
        status: entry.status,
        priority: entry.priority,
        tags: entry.tags.iter().map(|tag| (*tag).to_owned()).collect(),
        due_date,
        estimated_time: Some(entry.estimated_time),
        created_at: now,
        updated_at: now,
        completed_at: entry.status.is_completed().then_some(now),
        sequence: 0,
    })
}
