//! Shared wiring for in-memory integration tests.

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use atelier::agent::{
    domain::{ModelRequest, ModelResponse},
    ports::{ModelInvocationError, ModelInvocationResult, ModelInvoker, TaskCoordinator},
    services::{AgentCore, AgentRegistry, TemplateWorker},
};
use atelier::prompt::{
    adapters::InMemoryTemplateSource,
    domain::{TemplateKey, TemplateRecord},
    services::PromptEngine,
};
use atelier::task::{
    adapters::memory::{InMemoryEventBus, InMemoryTaskRepository},
    domain::{AgentId, Confidence},
    services::TaskLifecycleService,
};
use mockable::DefaultClock;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Lifecycle service type used across integration tests.
pub type Lifecycle = TaskLifecycleService<InMemoryTaskRepository, InMemoryEventBus, DefaultClock>;

/// Prompt engine type used across integration tests.
pub type Prompts = PromptEngine<InMemoryTemplateSource, DefaultClock>;

static TRACING: Once = Once::new();

/// Installs a test log subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Invoker that answers with queued confidences and records every prompt.
#[derive(Default)]
pub struct ScriptedInvoker {
    confidences: Mutex<Vec<f64>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInvoker {
    /// Answers successive calls with `confidences`, in order.
    pub fn answering(confidences: &[f64]) -> Self {
        let mut queued = confidences.to_vec();
        queued.reverse();
        Self {
            confidences: Mutex::new(queued),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns the prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log lock").clone()
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(&self, request: &ModelRequest) -> ModelInvocationResult<ModelResponse> {
        self.prompts
            .lock()
            .expect("prompt log lock")
            .push(request.prompt.clone());
        let next = self.confidences.lock().expect("script lock").pop();
        let confidence = next.ok_or_else(|| {
            ModelInvocationError::Provider("script exhausted".to_owned())
        })?;
        Ok(ModelResponse::new(
            Some(json!(format!("draft for: {}", request.prompt))),
            Confidence::saturating(confidence),
        )
        .with_usage(200, 0.01))
    }
}

/// A fully wired in-memory system with one content creator worker.
pub struct Stack {
    pub lifecycle: Arc<Lifecycle>,
    pub events: Arc<InMemoryEventBus>,
    pub prompts: Arc<Prompts>,
    pub invoker: Arc<ScriptedInvoker>,
    pub registry: AgentRegistry,
}

impl Stack {
    /// Builds the stack; the worker answers with `confidences` in order.
    pub fn new(confidences: &[f64]) -> Self {
        init_tracing();
        let clock = Arc::new(DefaultClock);
        let events = Arc::new(InMemoryEventBus::new());
        let lifecycle = Arc::new(TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::clone(&events),
            Arc::clone(&clock),
        ));
        let prompts = Arc::new(PromptEngine::new(
            Arc::new(InMemoryTemplateSource::with_templates([TemplateRecord::new(
                TemplateKey::system("content_creator"),
                "You write for {{ product_name }}. {{ prompt }}",
            )])),
            Arc::clone(&clock),
        ));
        let invoker = Arc::new(ScriptedInvoker::answering(confidences));
        let coordinator: Arc<dyn TaskCoordinator> = Arc::clone(&lifecycle) as Arc<dyn TaskCoordinator>;
        let invoker_handle: Arc<dyn ModelInvoker> = Arc::clone(&invoker) as Arc<dyn ModelInvoker>;
        let core = AgentCore::new(agent("content_creator"), invoker_handle, clock)
            .with_coordinator(coordinator);

        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(TemplateWorker::new(core, Arc::clone(&prompts))));
        Self {
            lifecycle,
            events,
            prompts,
            invoker,
            registry,
        }
    }
}

/// Parses an agent id.
pub fn agent(id: &str) -> AgentId {
    AgentId::new(id).expect("valid agent id")
}
