//! In-memory event bus backed by a broadcast channel.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::task::ports::{EventBus, TaskEvent, TaskEventError, TaskEventResult};

/// Capacity of the broadcast channel; slow subscribers lag beyond this.
const CHANNEL_CAPACITY: usize = 256;

/// Event bus that records every published event and fans it out to
/// subscribers.
#[derive(Debug, Clone)]
pub struct InMemoryEventBus {
    sender: broadcast::Sender<TaskEvent>,
    recorded: Arc<Mutex<Vec<TaskEvent>>>,
    closed: Arc<AtomicBool>,
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventBus {
    /// Creates an open bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            recorded: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribes to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.sender.subscribe()
    }

    /// Returns every event published so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<TaskEvent> {
        self.recorded
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns the channel names of every event published so far.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.events().iter().map(TaskEvent::name).collect()
    }

    /// Rejects all further publications.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: TaskEvent) -> TaskEventResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TaskEventError::Closed);
        }
        self.recorded
            .lock()
            .map_err(|err| TaskEventError::delivery(std::io::Error::other(err.to_string())))?
            .push(event.clone());
        // A send error only means nobody is subscribed right now.
        let _receivers = self.sender.send(event).unwrap_or(0);
        Ok(())
    }
}
