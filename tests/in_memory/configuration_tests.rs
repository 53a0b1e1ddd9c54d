//! JSON configuration wired into the services.

use std::sync::Arc;

use super::helpers::init_tracing;
use atelier::config::AtelierConfig;
use atelier::task::{
    adapters::memory::{InMemoryEventBus, InMemoryTaskRepository},
    domain::{Confidence, ExecutionRecord, TaskDraft, TaskOutput, TaskStatus},
    services::{
        RecordOutputRequest, TaskLifecycleError, TaskLifecycleService, TransitionTaskRequest,
    },
};
use eyre::{ensure, eyre};
use mockable::DefaultClock;

const CONFIG: &str = r#"{
    "validation": {"known_agents": ["planner", "writer", "human"], "max_priority": 10},
    "lifecycle": {
        "environment": "staging",
        "enforce_transitions": true,
        "thresholds": {"failed_at_or_below": 0.2, "complete_at_or_above": 0.75}
    }
}"#;

fn service(
    config: &AtelierConfig,
) -> TaskLifecycleService<InMemoryTaskRepository, InMemoryEventBus, DefaultClock> {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(InMemoryEventBus::new()),
        Arc::new(DefaultClock),
    )
    .with_validator(Arc::new(config.validator()))
    .with_config(config.lifecycle.clone())
}

#[tokio::test(flavor = "multi_thread")]
async fn configured_agents_thresholds_and_enforcement_apply() -> eyre::Result<()> {
    init_tracing();
    let config = AtelierConfig::from_json_str(CONFIG)?;
    let lifecycle = service(&config);

    let rejected = lifecycle
        .create_task(TaskDraft::new("site", "planner", "content_creator", "Draft copy"))
        .await;
    ensure!(matches!(rejected, Err(TaskLifecycleError::Validation(_))));

    let task = lifecycle
        .create_task(TaskDraft::new("site", "planner", "writer", "Draft copy").with_priority(10))
        .await?;
    ensure!(task.metadata().environment == "staging");

    let skipped = lifecycle
        .update_status(TransitionTaskRequest::new(task.id(), TaskStatus::Completed))
        .await;
    ensure!(matches!(
        skipped,
        Err(TaskLifecycleError::InvalidTransition { .. })
    ));

    lifecycle
        .update_status(TransitionTaskRequest::new(task.id(), TaskStatus::InProgress))
        .await?;
    let routed = lifecycle
        .set_output(RecordOutputRequest::new(
            task.id(),
            TaskOutput::new(Confidence::new(0.8)?),
            ExecutionRecord::new(task.target_agent().clone()),
        ))
        .await?;
    ensure!(
        routed.status() == TaskStatus::Completed,
        "0.8 clears the configured completion threshold"
    );
    let stored = lifecycle
        .get_task(task.id())
        .await?
        .ok_or_else(|| eyre!("task missing"))?;
    ensure!(stored.revision() == routed.revision());
    Ok(())
}
