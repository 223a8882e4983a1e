//! When steps for task board BDD scenarios.

use super::world::{BoardWorld, run_async, stage};
use chrono::TimeDelta;
use rstest_bdd_macros::when;
use taskboard::board::{
    domain::{NewTask, TaskId},
    services::DropTarget,
};

#[when("the board is opened")]
fn open_board(world: &mut BoardWorld) {
    world.reopen();
}

#[when("the board is reloaded from storage")]
fn reload_board(world: &mut BoardWorld) {
    world.board.store_mut().reload();
}

#[when(r#"I create a task titled "{title}" in "{status}""#)]
fn create_task(world: &mut BoardWorld, title: String, status: String) -> Result<(), eyre::Report> {
    world.clock.advance(TimeDelta::seconds(1));
    let fields = NewTask::new(title).with_status(stage(&status)?);
    if let Err(err) = world.board.store_mut().create(fields) {
        world.last_error = Some(err);
    }
    Ok(())
}

#[when(r#"the task "{title}" is completed"#)]
fn complete_task(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    world.clock.advance(TimeDelta::minutes(1));
    let (_, actions) = run_async(world.board.complete(&id))?;
    world.next_actions = actions;
    Ok(())
}

#[when(r#"the task "{title}" is moved to "{status}""#)]
fn move_task(world: &mut BoardWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    world.clock.advance(TimeDelta::minutes(1));
    world.board.store_mut().move_task(&id, stage(&status)?)?;
    Ok(())
}

#[when(r#"I search for "{text}""#)]
fn search_for(world: &mut BoardWorld, text: String) {
    world.board.query_mut().set_search(text);
}

#[when(r#"I toggle the tag "{tag}""#)]
fn toggle_tag(world: &mut BoardWorld, tag: String) {
    world.board.query_mut().toggle_tag(&tag);
}

#[when("I clear the filters")]
fn clear_filters(world: &mut BoardWorld) {
    world.board.query_mut().clear();
}

#[when(r#"I start dragging "{title}""#)]
fn start_dragging(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    world.last_outcome = Some(world.board.start_drag(&id)?);
    Ok(())
}

#[when("I start dragging a task that does not exist")]
fn start_dragging_missing(world: &mut BoardWorld) {
    match world.board.start_drag(&TaskId::from("does-not-exist")) {
        Ok(outcome) => world.last_outcome = Some(outcome),
        Err(err) => world.last_error = Some(err),
    }
}

#[when(r#"I drag over the "{status}" stage"#)]
fn drag_over_stage(world: &mut BoardWorld, status: String) -> Result<(), eyre::Report> {
    let target = DropTarget::Stage(stage(&status)?);
    world.last_outcome = Some(world.board.drag_over(&target)?);
    Ok(())
}

#[when(r#"I drop onto the "{status}" stage"#)]
fn drop_on_stage(world: &mut BoardWorld, status: String) -> Result<(), eyre::Report> {
    let target = DropTarget::Stage(stage(&status)?);
    world.last_outcome = Some(world.board.drop_on(Some(&target))?);
    Ok(())
}

#[when(r#"I drop onto the task "{title}""#)]
fn drop_on_task(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let target = DropTarget::Task(world.task_id(&title)?);
    world.last_outcome = Some(world.board.drop_on(Some(&target))?);
    Ok(())
}

#[when("I cancel the drag")]
fn cancel_drag(world: &mut BoardWorld) {
    world.last_outcome = Some(world.board.cancel_drag());
}

#[when("I request suggestions")]
fn request_suggestions(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    if !run_async(world.board.request_suggestions()) {
        return Err(eyre::eyre!("suggestions were discarded as stale"));
    }
    Ok(())
}

#[when(r#"I admit the suggestion "{id}""#)]
fn admit_suggestion(world: &mut BoardWorld, id: String) -> Result<(), eyre::Report> {
    world
        .board
        .admit_suggestion(&id)?
        .ok_or_else(|| eyre::eyre!("suggestion {id:?} is not visible"))?;
    Ok(())
}

#[when("I start a suggestion request")]
fn start_suggestion_request(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let ticket = world
        .board
        .begin_suggestions()
        .ok_or_else(|| eyre::eyre!("expected the empty panel to fetch"))?;
    world.pending_suggestions = Some(ticket);
    Ok(())
}

#[when("the suggestion response arrives")]
fn suggestion_response_arrives(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let ticket = world
        .pending_suggestions
        .take()
        .ok_or_else(|| eyre::eyre!("no suggestion request in flight"))?;
    let records = run_async(world.board.fetch_suggestions());
    world.delivered = Some(world.board.deliver_suggestions(ticket, records));
    Ok(())
}

#[when("I dismiss the suggestions")]
fn dismiss_suggestions(world: &mut BoardWorld) {
    world.board.dismiss_suggestions();
}

#[when(r#"I improve the description "{description}" of "{title}""#)]
fn improve_description(world: &mut BoardWorld, description: String, title: String) {
    world.improved = run_async(
        world
            .board
            .enhance_description(&title, Some(description.as_str())),
    );
}
