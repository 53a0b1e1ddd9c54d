//! Shared builders for agent tests.

use crate::agent::domain::ModelResponse;
use crate::agent::ports::MockModelInvoker;
use crate::task::domain::{
    AgentId, Confidence, PersistedTaskData, ProjectId, Task, TaskId, TaskInput, TaskMetadata,
    TaskStatus,
};
use chrono::{TimeZone, Utc};
use serde_json::{Map, json};

pub fn agent(id: &str) -> AgentId {
    AgentId::new(id).expect("valid agent id")
}

pub fn response(confidence: f64) -> ModelResponse {
    ModelResponse::new(
        Some(json!("Three tips for a calmer launch week.")),
        Confidence::new(confidence).expect("valid confidence"),
    )
    .with_explanation("drafted from the brief")
    .with_usage(120, 0.02)
}

/// Invoker expected to run exactly `times` times, always answering with
/// `confidence`.
pub fn invoker(times: usize, confidence: f64) -> MockModelInvoker {
    let mut invoker = MockModelInvoker::new();
    invoker
        .expect_invoke()
        .times(times)
        .returning(move |_| Ok(response(confidence)));
    invoker
}

/// A stored task with arbitrary identifiers, bypassing draft validation.
pub fn stored_task(id: TaskId, target: &str, prompt: &str) -> Task {
    let at = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    Task::from_persisted(PersistedTaskData {
        id,
        project_id: ProjectId::new("launch").expect("valid project"),
        parent_task_id: None,
        status: TaskStatus::Pending,
        priority: 5,
        requester_agent: agent("project_manager"),
        target_agent: agent(target),
        input: TaskInput {
            prompt: prompt.to_owned(),
            context: Map::new(),
            data: None,
        },
        output: None,
        execution: None,
        history: Vec::new(),
        human_feedback: None,
        metadata: TaskMetadata::new("1.0", "test"),
        revision: 0,
        created_at: at,
        updated_at: at,
    })
}
