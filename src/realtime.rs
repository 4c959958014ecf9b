//! Change feed for the applications table.
//!
//! The staff dashboard subscribes once and refetches its list whenever any
//! application row is inserted or updated.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::applications::types::ApplicationStatus;

const FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ApplicationEvent {
    Inserted { id: i64 },
    Updated { id: i64, status: ApplicationStatus },
}

impl ApplicationEvent {
    pub fn application_id(&self) -> i64 {
        match self {
            ApplicationEvent::Inserted { id } | ApplicationEvent::Updated { id, .. } => *id,
        }
    }
}

#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ApplicationEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    /// Publish an event; having no subscribers is not an error.
    pub fn publish(&self, event: ApplicationEvent) {
        let receivers = self.sender.send(event.clone()).unwrap_or(0);
        debug!("Published {:?} to {} subscriber(s)", event, receivers);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ApplicationEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let feed = ChangeFeed::new();
        let mut rx = feed.subscribe();

        feed.publish(ApplicationEvent::Inserted { id: 7 });
        let event = rx.recv().await.unwrap();
        assert_eq!(event.application_id(), 7);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let feed = ChangeFeed::new();
        feed.publish(ApplicationEvent::Updated {
            id: 1,
            status: ApplicationStatus::Approved,
        });
    }
}
