//! Agent queue ordering and outcome aggregation over a shared store.

use super::helpers::{Stack, agent};
use atelier::task::domain::{MetricsWindow, TaskDraft, TaskStatus};
use atelier::task::services::TransitionTaskRequest;
use eyre::ensure;

fn draft(target: &str, prompt: &str, priority: i32) -> TaskDraft {
    TaskDraft::new("launch", "project_manager", target, prompt).with_priority(priority)
}

#[tokio::test(flavor = "multi_thread")]
async fn queue_lists_open_tasks_by_priority() -> eyre::Result<()> {
    let stack = Stack::new(&[]);
    let low = stack.lifecycle.create_task(draft("content_creator", "low", 2)).await?;
    let high = stack.lifecycle.create_task(draft("content_creator", "high", 9)).await?;
    let queued = stack.lifecycle.create_task(draft("content_creator", "queued", 5)).await?;
    let done = stack.lifecycle.create_task(draft("content_creator", "done", 10)).await?;
    stack.lifecycle.create_task(draft("qa_tester", "elsewhere", 10)).await?;
    stack
        .lifecycle
        .update_status(TransitionTaskRequest::new(queued.id(), TaskStatus::Queued))
        .await?;
    stack
        .lifecycle
        .update_status(TransitionTaskRequest::new(done.id(), TaskStatus::Cancelled))
        .await?;

    let order: Vec<_> = stack
        .lifecycle
        .get_tasks_for_agent(&agent("content_creator"), 10)
        .await?
        .map(|task| task.id())
        .collect();

    ensure!(order == vec![high.id(), queued.id(), low.id()]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn metrics_summarise_processed_tasks() -> eyre::Result<()> {
    let stack = Stack::new(&[0.95, 0.5, 0.0]);
    for prompt in ["one", "two", "three"] {
        let task = stack
            .lifecycle
            .create_task(draft("content_creator", prompt, 5))
            .await?;
        stack.registry.dispatch(&task).await?;
    }

    let metrics = stack
        .lifecycle
        .get_agent_metrics(&agent("content_creator"), MetricsWindow::Week)
        .await?;

    ensure!(metrics.total_tasks == 3);
    ensure!(metrics.completed == 1);
    ensure!(metrics.needs_validation == 1);
    ensure!(metrics.failed == 1);
    ensure!((metrics.success_rate - 1.0 / 3.0).abs() < 1e-9);
    ensure!(metrics.human_approval_rate == 0.0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn metrics_for_idle_agent_are_zero() -> eyre::Result<()> {
    let stack = Stack::new(&[]);

    let metrics = stack
        .lifecycle
        .get_agent_metrics(&agent("designer"), MetricsWindow::Month)
        .await?;

    ensure!(metrics.total_tasks == 0);
    ensure!(metrics.average_confidence == 0.0);
    ensure!(metrics.success_rate == 0.0);
    ensure!(!metrics.average_duration_ms.is_nan());
    Ok(())
}
