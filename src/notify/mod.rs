use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use tracing::debug;

use crate::error::AppResult;

/// Outbound progress/notification events, addressed to a session user.
///
/// The realtime delivery layer belongs to the surrounding framework; this
/// trait is the seam the record lifecycle publishes through.
#[async_trait]
pub trait NotificationBus: Send + Sync {
    async fn publish(&self, event: &str, payload: Value, user: &str) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedEvent {
    pub event: String,
    pub payload: Value,
    pub user: String,
}

/// Implementation of [`NotificationBus`] that records published events.
#[derive(Debug, Default)]
pub struct InMemoryNotificationBus {
    events: Mutex<Vec<PublishedEvent>>,
}

impl InMemoryNotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<PublishedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationBus for InMemoryNotificationBus {
    async fn publish(&self, event: &str, payload: Value, user: &str) -> AppResult<()> {
        debug!(event, user, "notification published");
        self.events.lock()?.push(PublishedEvent {
            event: event.to_string(),
            payload,
            user: user.to_string(),
        });
        Ok(())
    }
}
