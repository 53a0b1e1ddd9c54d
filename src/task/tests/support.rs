//! Shared fixtures for task lifecycle tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;

use crate::task::{
    adapters::memory::{InMemoryEventBus, InMemoryTaskRepository},
    domain::{Confidence, TaskDraft},
    services::TaskLifecycleService,
};

/// Clock that only moves when a test advances it.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl SteppingClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock");
        *now += delta;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub type TestService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryEventBus, SteppingClock>;

pub struct Harness {
    pub service: TestService,
    pub events: Arc<InMemoryEventBus>,
    pub clock: Arc<SteppingClock>,
}

#[fixture]
pub fn clock() -> SteppingClock {
    SteppingClock::starting_at(
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid start time"),
    )
}

#[fixture]
pub fn harness(clock: SteppingClock) -> Harness {
    let events = Arc::new(InMemoryEventBus::new());
    let clock_handle = Arc::new(clock);
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::clone(&events),
        Arc::clone(&clock_handle),
    );
    Harness {
        service,
        events,
        clock: clock_handle,
    }
}

pub fn draft(prompt: &str) -> TaskDraft {
    TaskDraft::new("launch", "project_manager", "content_creator", prompt)
}

pub fn confidence(value: f64) -> Confidence {
    Confidence::new(value).expect("valid confidence")
}
