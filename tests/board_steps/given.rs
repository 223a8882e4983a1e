//! Given steps for task board BDD scenarios.

use super::world::{BoardWorld, stage};
use chrono::TimeDelta;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::board::domain::NewTask;

#[given("nothing has been saved yet")]
fn nothing_saved(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    if world.blobs.write_count() != 0 {
        return Err(eyre::eyre!("expected an untouched blob store"));
    }
    Ok(())
}

#[given("a board with no tasks")]
fn empty_board(world: &mut BoardWorld) {
    world.clear();
}

#[given(r#"a task titled "{title}" in "{status}""#)]
fn task_in_stage(world: &mut BoardWorld, title: String, status: String) -> Result<(), eyre::Report> {
    world.clock.advance(TimeDelta::seconds(1));
    world
        .board
        .store_mut()
        .create(NewTask::new(title).with_status(stage(&status)?))
        .wrap_err("create task in scenario setup")?;
    Ok(())
}

#[given(r#"a "{tag}" task titled "{title}" in "{status}""#)]
fn tagged_task_in_stage(
    world: &mut BoardWorld,
    tag: String,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    world.clock.advance(TimeDelta::seconds(1));
    world
        .board
        .store_mut()
        .create(
            NewTask::new(title)
                .with_status(stage(&status)?)
                .with_tags([tag]),
        )
        .wrap_err("create tagged task in scenario setup")?;
    Ok(())
}

#[given(r#"the "{status}" stage holds "{titles}""#)]
fn stage_holds(world: &mut BoardWorld, status: String, titles: String) -> Result<(), eyre::Report> {
    let status = stage(&status)?;
    for title in titles.split(", ") {
        world.clock.advance(TimeDelta::seconds(1));
        world
            .board
            .store_mut()
            .create(NewTask::new(title).with_status(status))
            .wrap_err_with(|| format!("create {title:?} in scenario setup"))?;
    }
    Ok(())
}
