//! End-to-end feedback loop: worker output, review, and corrections.

use super::helpers::{Stack, agent};
use atelier::task::domain::{FeedbackSubmission, Rating, TaskDraft, TaskStatus};
use eyre::{WrapErr, ensure, eyre};

fn launch_post() -> TaskDraft {
    TaskDraft::new(
        "launch",
        "project_manager",
        "content_creator",
        "Write a launch post",
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_output_is_corrected_and_completed() -> eyre::Result<()> {
    let stack = Stack::new(&[0.5, 0.95]);
    let original = stack.lifecycle.create_task(launch_post()).await?;

    let first = stack.registry.dispatch(&original).await?;
    ensure!(first.success, "first attempt should produce output");
    let reviewed = stack
        .lifecycle
        .get_task(original.id())
        .await?
        .ok_or_else(|| eyre!("original task missing"))?;
    ensure!(reviewed.status() == TaskStatus::NeedsValidation);
    ensure!(
        stack
            .events
            .event_names()
            .contains(&"validation:required".to_owned())
    );

    let correction = stack
        .lifecycle
        .apply_human_feedback(
            original.id(),
            FeedbackSubmission::reject()
                .with_correction("be more casual")
                .with_reviewer("human"),
        )
        .await
        .wrap_err("reject with correction")?;
    ensure!(correction.parent_task_id() == Some(original.id()));
    ensure!(correction.priority() == original.priority() + 1);

    let second = stack.registry.dispatch(&correction).await?;
    ensure!(second.success);

    let finished = stack
        .lifecycle
        .get_task(correction.id())
        .await?
        .ok_or_else(|| eyre!("correction task missing"))?;
    ensure!(finished.status() == TaskStatus::Completed);
    let cancelled = stack
        .lifecycle
        .get_task(original.id())
        .await?
        .ok_or_else(|| eyre!("original task missing"))?;
    ensure!(cancelled.status() == TaskStatus::Cancelled);

    let prompts = stack.invoker.prompts();
    let last_prompt = prompts.last().ok_or_else(|| eyre!("no prompts recorded"))?;
    ensure!(last_prompt.contains("be more casual"));
    ensure!(last_prompt.contains("Write a launch post"));

    let history = stack.lifecycle.get_feedback_history(correction.id()).await?;
    ensure!(history.len() == 2, "expected feedback and correction entries");
    ensure!(history.iter().all(|record| record.task_id == original.id()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn approved_tasks_are_offered_as_examples() -> eyre::Result<()> {
    let stack = Stack::new(&[0.5, 0.5, 0.5]);
    let mut approved = Vec::new();
    for rating in [3, 5] {
        let task = stack.lifecycle.create_task(launch_post()).await?;
        stack.registry.dispatch(&task).await?;
        let done = stack
            .lifecycle
            .apply_human_feedback(
                task.id(),
                FeedbackSubmission::approve().with_rating(Rating::new(rating)?),
            )
            .await?;
        ensure!(done.status() == TaskStatus::Completed);
        approved.push(done);
    }
    let probe = stack.lifecycle.create_task(launch_post()).await?;

    let similar = stack.lifecycle.find_successful_similar_tasks(&probe).await?;

    let ids: Vec<_> = similar.iter().map(|task| task.id()).collect();
    let expected: Vec<_> = approved.iter().rev().map(|task| task.id()).collect();
    ensure!(ids == expected, "best rated task should come first");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_model_marks_task_failed_and_allows_retry() -> eyre::Result<()> {
    let stack = Stack::new(&[]);
    let task = stack.lifecycle.create_task(launch_post()).await?;

    let result = stack.registry.dispatch(&task).await?;

    ensure!(!result.success);
    ensure!(result.output.confidence_score.value() == 0.0);
    let failed = stack
        .lifecycle
        .get_task(task.id())
        .await?
        .ok_or_else(|| eyre!("task missing"))?;
    ensure!(failed.status() == TaskStatus::Failed);
    ensure!(failed.status().can_transition_to(TaskStatus::Pending));
    let metrics = stack
        .lifecycle
        .get_agent_metrics(&agent("content_creator"), "24h".try_into()?)
        .await?;
    ensure!(metrics.failed == 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn review_verdicts_reach_prompt_metrics() -> eyre::Result<()> {
    let stack = Stack::new(&[0.5, 0.5]);
    let first = stack.lifecycle.create_task(launch_post()).await?;
    stack.registry.dispatch(&first).await?;
    let approved = stack
        .lifecycle
        .apply_human_feedback(first.id(), FeedbackSubmission::approve())
        .await?;
    ensure!(stack.registry.record_review(&approved)?);

    let second = stack.lifecycle.create_task(launch_post()).await?;
    stack.registry.dispatch(&second).await?;
    stack
        .lifecycle
        .apply_human_feedback(
            second.id(),
            FeedbackSubmission::reject().with_correction("be more casual"),
        )
        .await?;
    let rejected = stack
        .lifecycle
        .get_task(second.id())
        .await?
        .ok_or_else(|| eyre!("rejected task missing"))?;
    ensure!(stack.registry.record_review(&rejected)?);
    let unreviewed = stack.lifecycle.create_task(launch_post()).await?;
    ensure!(!stack.registry.record_review(&unreviewed)?);

    let metrics = stack
        .prompts
        .get_prompt_metrics("content_creator", "general")?;
    let [system] = metrics.as_slice() else {
        return Err(eyre!("expected one rendered version, found {}", metrics.len()));
    };
    ensure!(system.version == "system");
    ensure!(system.executions == 2);
    ensure!((system.review_rate - 1.0).abs() < 1e-9);
    ensure!((system.approval_rate - 0.5).abs() < 1e-9);
    ensure!(system.first_used <= system.last_used);
    Ok(())
}
