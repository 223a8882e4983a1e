//! Then steps for task board BDD scenarios.

use super::world::{BoardWorld, stage};
use rstest_bdd_macros::then;
use taskboard::board::{
    domain::{BlobKey, Task},
    ports::BlobStore,
    services::{GestureOutcome, GestureState, StoreError},
};

fn task<'a>(world: &'a BoardWorld, title: &str) -> Result<&'a Task, eyre::Report> {
    let id = world.task_id(title)?;
    world
        .board
        .store()
        .get(&id)
        .ok_or_else(|| eyre::eyre!("task {title:?} vanished"))
}

#[then("the board holds {count:usize} tasks")]
fn board_holds(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.board.store().tasks().len();
    if actual != count {
        return Err(eyre::eyre!("expected {count} tasks, found {actual}"));
    }
    Ok(())
}

#[then("the stored blob holds {count:usize} tasks")]
fn blob_holds(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let raw = world
        .blobs
        .read(&BlobKey::default())?
        .ok_or_else(|| eyre::eyre!("nothing was persisted"))?;
    let stored: Vec<Task> = serde_json::from_str(&raw)?;
    if stored.len() != count {
        return Err(eyre::eyre!("expected {count} stored tasks, found {}", stored.len()));
    }
    Ok(())
}

#[then(r#"the "{status}" stage lists "{title}""#)]
fn stage_lists(world: &BoardWorld, status: String, title: String) -> Result<(), eyre::Report> {
    let titles = world.stage_titles(stage(&status)?);
    if !titles.contains(&title) {
        return Err(eyre::eyre!("{title:?} not in {status} stage: {titles:?}"));
    }
    Ok(())
}

#[then(r#"the "{status}" stage order is "{order}""#)]
fn stage_order(world: &BoardWorld, status: String, order: String) -> Result<(), eyre::Report> {
    let expected: Vec<&str> = order.split(", ").collect();
    let actual = world.stage_titles(stage(&status)?);
    if actual != expected {
        return Err(eyre::eyre!("expected {status} order {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"the task "{title}" has a completion time"#)]
fn has_completion_time(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    let found = task(world, &title)?;
    if found.completed_at() != Some(found.updated_at()) {
        return Err(eyre::eyre!("completion time not set from the move: {found:?}"));
    }
    Ok(())
}

#[then(r#"the task "{title}" has no completion time"#)]
fn has_no_completion_time(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    if let Some(completed_at) = task(world, &title)?.completed_at() {
        return Err(eyre::eyre!("unexpected completion time {completed_at}"));
    }
    Ok(())
}

#[then("{count:usize} follow-up actions are suggested")]
fn follow_up_actions(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    if world.next_actions.len() != count {
        return Err(eyre::eyre!("expected {count} actions, got {:?}", world.next_actions));
    }
    Ok(())
}

#[then("the last operation failed validation")]
fn failed_validation(world: &BoardWorld) -> Result<(), eyre::Report> {
    if !matches!(world.last_error, Some(StoreError::Validation(_))) {
        return Err(eyre::eyre!("expected a validation error, got {:?}", world.last_error));
    }
    Ok(())
}

#[then("the last operation reported a missing task")]
fn reported_missing(world: &BoardWorld) -> Result<(), eyre::Report> {
    if !matches!(world.last_error, Some(StoreError::NotFound(_))) {
        return Err(eyre::eyre!("expected a not-found error, got {:?}", world.last_error));
    }
    Ok(())
}

#[then(r#"the visible tasks are "{titles}""#)]
fn visible_tasks(world: &BoardWorld, titles: String) -> Result<(), eyre::Report> {
    let expected: Vec<&str> = titles.split(", ").collect();
    let view = world.board.view();
    let actual: Vec<&str> = view.filtered.iter().map(|found| found.title()).collect();
    if actual != expected {
        return Err(eyre::eyre!("expected visible {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then("every task is visible")]
fn every_task_visible(world: &BoardWorld) -> Result<(), eyre::Report> {
    let view = world.board.view();
    if view.filtered.len() != world.board.store().tasks().len() {
        return Err(eyre::eyre!("filters still hide tasks"));
    }
    Ok(())
}

#[then("the board statistics count {count:usize} tasks")]
fn statistics_count(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let total = world.board.view().stats.total;
    if total != count {
        return Err(eyre::eyre!("statistics counted {total} tasks, expected {count}"));
    }
    Ok(())
}

#[then("a drag is in progress")]
fn drag_in_progress(world: &BoardWorld) -> Result<(), eyre::Report> {
    if world.board.gesture() == &GestureState::Idle {
        return Err(eyre::eyre!("expected an active drag"));
    }
    Ok(())
}

#[then("no drag is in progress")]
fn no_drag_in_progress(world: &BoardWorld) -> Result<(), eyre::Report> {
    if world.board.gesture() != &GestureState::Idle {
        return Err(eyre::eyre!("drag still active: {:?}", world.board.gesture()));
    }
    Ok(())
}

#[then("the suggestion panel shows {count:usize} suggestions")]
fn panel_shows(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let shown = world.board.panel().suggestions().len();
    if shown != count {
        return Err(eyre::eyre!("panel shows {shown} suggestions, expected {count}"));
    }
    Ok(())
}

#[then(r#"the improved description starts with "{prefix}""#)]
fn improved_starts_with(world: &BoardWorld, prefix: String) -> Result<(), eyre::Report> {
    let improved = world.improved.as_deref().unwrap_or_default();
    if !improved.starts_with(&prefix) {
        return Err(eyre::eyre!("{improved:?} does not start with {prefix:?}"));
    }
    Ok(())
}

#[then(r#"the improved description contains "{fragment}""#)]
fn improved_contains(world: &BoardWorld, fragment: String) -> Result<(), eyre::Report> {
    let improved = world.improved.as_deref().unwrap_or_default();
    if !improved.contains(&fragment) {
        return Err(eyre::eyre!("{improved:?} does not contain {fragment:?}"));
    }
    Ok(())
}

#[then("the drop changed nothing")]
fn drop_changed_nothing(world: &BoardWorld) -> Result<(), eyre::Report> {
    if world.last_outcome != Some(GestureOutcome::Ignored) {
        return Err(eyre::eyre!("expected an ignored drop, got {:?}", world.last_outcome));
    }
    Ok(())
}

#[then("the suggestion panel is closed")]
fn panel_closed(world: &BoardWorld) -> Result<(), eyre::Report> {
    let panel = world.board.panel();
    if panel.is_open() || panel.is_loading() {
        return Err(eyre::eyre!("panel still showing: {panel:?}"));
    }
    Ok(())
}

#[then("the suggestion response was discarded")]
fn response_discarded(world: &BoardWorld) -> Result<(), eyre::Report> {
    if world.delivered != Some(false) {
        return Err(eyre::eyre!("expected a discarded response, got {:?}", world.delivered));
    }
    Ok(())
}
