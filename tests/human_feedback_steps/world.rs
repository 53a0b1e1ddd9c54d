//! Shared world state for human feedback BDD scenarios.

use std::sync::Arc;

use atelier::task::{
    adapters::memory::{InMemoryEventBus, InMemoryTaskRepository},
    domain::Task,
    services::TaskLifecycleService,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryEventBus, DefaultClock>;

/// Scenario world for feedback behaviour tests.
pub struct FeedbackWorld {
    pub service: TestTaskService,
    pub original: Option<Task>,
    pub corrections: Vec<Task>,
}

impl FeedbackWorld {
    /// Creates a world with an empty store.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(InMemoryEventBus::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            original: None,
            corrections: Vec::new(),
        }
    }

    /// Returns the task created by the scenario.
    pub fn original(&self) -> Result<&Task, eyre::Report> {
        self.original
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing original task in scenario world"))
    }

    /// Returns the most recently spawned correction task.
    pub fn latest_correction(&self) -> Result<&Task, eyre::Report> {
        self.corrections
            .last()
            .ok_or_else(|| eyre::eyre!("no correction task spawned"))
    }
}

impl Default for FeedbackWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> FeedbackWorld {
    FeedbackWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
