//! Then steps for human feedback BDD scenarios.

use super::world::{FeedbackWorld, run_async};
use atelier::task::domain::TaskStatus;
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &FeedbackWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.original()?.id();
    let stored = run_async(world.service.get_task(task_id))?
        .ok_or_else(|| eyre::eyre!("scenario task missing from store"))?;

    eyre::ensure!(
        stored.status() == expected,
        "expected status {}, found {}",
        expected.as_str(),
        stored.status().as_str()
    );
    Ok(())
}

#[then("the task records human approval")]
fn task_records_approval(world: &FeedbackWorld) -> Result<(), eyre::Report> {
    let task = world.original()?;
    let feedback = task
        .human_feedback()
        .ok_or_else(|| eyre::eyre!("missing human feedback"))?;
    eyre::ensure!(feedback.was_approved, "feedback should record approval");
    eyre::ensure!(feedback.reviewer_id.as_deref() == Some("human"));
    Ok(())
}

#[then("the correction task has priority {priority}")]
fn correction_priority(world: &FeedbackWorld, priority: i32) -> Result<(), eyre::Report> {
    let correction = world.latest_correction()?;
    eyre::ensure!(
        correction.priority() == priority,
        "expected priority {priority}, found {}",
        correction.priority()
    );
    Ok(())
}

#[then(r#"the correction task prompt contains "{text}""#)]
fn correction_prompt_contains(world: &FeedbackWorld, text: String) -> Result<(), eyre::Report> {
    let correction = world.latest_correction()?;
    eyre::ensure!(
        correction.input().prompt.contains(&text),
        "prompt does not mention {text:?}"
    );
    Ok(())
}

#[then("the correction task is linked to the original task")]
fn correction_is_linked(world: &FeedbackWorld) -> Result<(), eyre::Report> {
    let original = world.original()?;
    let correction = world.latest_correction()?;
    eyre::ensure!(correction.parent_task_id() == Some(original.id()));
    eyre::ensure!(correction.status() == TaskStatus::Pending);
    Ok(())
}

#[then("the feedback history of the latest correction has {count} entries")]
fn feedback_history_length(world: &FeedbackWorld, count: usize) -> Result<(), eyre::Report> {
    let correction_id = world.latest_correction()?.id();
    let history = run_async(world.service.get_feedback_history(correction_id))?;
    eyre::ensure!(
        history.len() == count,
        "expected {count} entries, found {}",
        history.len()
    );
    Ok(())
}
