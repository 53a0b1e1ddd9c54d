//! Tests for worker registration and dispatch.

use super::support::{agent, stored_task};
use crate::agent::{
    domain::{AgentError, AgentResult},
    services::{AgentRegistry, Worker},
};
use crate::task::domain::{AgentId, Confidence, ExecutionRecord, Task, TaskId, TaskOutput};
use async_trait::async_trait;
use std::sync::Arc;

struct EchoWorker {
    agent_id: AgentId,
    confidence: f64,
}

impl EchoWorker {
    fn new(agent_id: &str, confidence: f64) -> Arc<dyn Worker> {
        Arc::new(Self {
            agent_id: agent(agent_id),
            confidence,
        })
    }
}

#[async_trait]
impl Worker for EchoWorker {
    fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    async fn process_task(&self, task: &Task) -> AgentResult {
        let output = TaskOutput::new(Confidence::saturating(self.confidence))
            .with_explanation(task.input().prompt.clone());
        AgentResult::succeeded(task.id(), output, ExecutionRecord::new(self.agent_id.clone()))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn dispatch_routes_by_target_agent() {
    let mut registry = AgentRegistry::new();
    registry.register(EchoWorker::new("content_creator", 0.9));
    registry.register(EchoWorker::new("qa_tester", 0.4));
    let task = stored_task(TaskId::new(), "qa_tester", "Check the signup form");

    let result = registry.dispatch(&task).await.expect("worker registered");

    assert!(result.success);
    assert_eq!(result.task_id, Some(task.id()));
    assert_eq!(result.output.confidence_score, Confidence::saturating(0.4));
    assert_eq!(
        result.output.explanation.as_deref(),
        Some("Check the signup form")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn dispatch_rejects_unknown_agent() {
    let registry = AgentRegistry::new();
    let task = stored_task(TaskId::new(), "designer", "Sketch a logo");

    let result = registry.dispatch(&task).await;

    assert!(matches!(result, Err(AgentError::UnknownAgent(id)) if id == agent("designer")));
}

#[test]
fn register_replaces_existing_worker_and_lists_ids_in_order() {
    let mut registry = AgentRegistry::new();
    assert!(registry.register(EchoWorker::new("qa_tester", 0.4)).is_none());
    registry.register(EchoWorker::new("content_creator", 0.9));

    let replaced = registry.register(EchoWorker::new("qa_tester", 0.7));

    assert!(replaced.is_some());
    let ids: Vec<&str> = registry.agent_ids().map(AgentId::as_str).collect();
    assert_eq!(ids, vec!["content_creator", "qa_tester"]);
    assert!(registry.get(&agent("designer")).is_none());
}
