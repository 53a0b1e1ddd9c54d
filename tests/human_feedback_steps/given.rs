//! Given steps for human feedback BDD scenarios.

use super::world::{FeedbackWorld, run_async};
use atelier::task::{
    domain::{AgentId, Confidence, ExecutionRecord, TaskDraft, TaskOutput},
    services::RecordOutputRequest,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a pending task "{prompt}" with priority {priority}"#)]
fn pending_task(
    world: &mut FeedbackWorld,
    prompt: String,
    priority: i32,
) -> Result<(), eyre::Report> {
    let draft = TaskDraft::new("launch", "project_manager", "content_creator", prompt)
        .with_priority(priority);
    let created = run_async(world.service.create_task(draft)).wrap_err("create scenario task")?;
    world.original = Some(created);
    Ok(())
}

#[given("the content creator reports output with confidence {confidence}")]
fn content_creator_reports_output(
    world: &mut FeedbackWorld,
    confidence: f64,
) -> Result<(), eyre::Report> {
    let task_id = world.original()?.id();
    let agent = AgentId::new("content_creator")?;
    let output = TaskOutput::new(Confidence::new(confidence)?)
        .with_data(serde_json::json!("Introducing our calmer launch week."));
    let updated = run_async(world.service.set_output(RecordOutputRequest::new(
        task_id,
        output,
        ExecutionRecord::new(agent).with_model("gpt-4o-mini"),
    )))
    .wrap_err("record scenario output")?;
    world.original = Some(updated);
    Ok(())
}
