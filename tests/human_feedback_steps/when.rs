//! When steps for human feedback BDD scenarios.

use super::world::{FeedbackWorld, run_async};
use atelier::task::domain::{FeedbackSubmission, TaskId};
use eyre::WrapErr;
use rstest_bdd_macros::when;

fn reject_with_correction(
    world: &mut FeedbackWorld,
    task_id: TaskId,
    correction: String,
) -> Result<(), eyre::Report> {
    let spawned = run_async(world.service.apply_human_feedback(
        task_id,
        FeedbackSubmission::reject()
            .with_correction(correction)
            .with_reviewer("human"),
    ))
    .wrap_err("reject with correction")?;
    world.corrections.push(spawned);
    Ok(())
}

#[when("the reviewer approves the task")]
fn reviewer_approves(world: &mut FeedbackWorld) -> Result<(), eyre::Report> {
    let task_id = world.original()?.id();
    let approved = run_async(
        world
            .service
            .apply_human_feedback(task_id, FeedbackSubmission::approve().with_reviewer("human")),
    )
    .wrap_err("approve scenario task")?;
    world.original = Some(approved);
    Ok(())
}

#[when(r#"the reviewer rejects the task with correction "{correction}""#)]
fn reviewer_rejects_with_correction(
    world: &mut FeedbackWorld,
    correction: String,
) -> Result<(), eyre::Report> {
    let task_id = world.original()?.id();
    reject_with_correction(world, task_id, correction)
}

#[when(r#"the reviewer rejects the correction task with correction "{correction}""#)]
fn reviewer_rejects_correction(
    world: &mut FeedbackWorld,
    correction: String,
) -> Result<(), eyre::Report> {
    let task_id = world.latest_correction()?.id();
    reject_with_correction(world, task_id, correction)
}

#[when("the reviewer rejects the task without a correction")]
fn reviewer_rejects_without_correction(world: &mut FeedbackWorld) -> Result<(), eyre::Report> {
    let task_id = world.original()?.id();
    let failed = run_async(
        world
            .service
            .apply_human_feedback(task_id, FeedbackSubmission::reject()),
    )
    .wrap_err("reject scenario task")?;
    world.original = Some(failed);
    Ok(())
}
