//! Event Bus for broadcasting workflow events to audit subscribers

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{Event, EventMessage};

const DEFAULT_CAPACITY: usize = 1024;

/// Event bus for broadcasting events to all subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: Event) {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let station_id = message.event.station_id();

        match self.sender.send(message) {
            Ok(count) => {
                debug!(event_type, station_id, subscribers = count, "Event published");
            }
            Err(_) => {
                debug!(event_type, station_id, "Event published (no subscribers)");
            }
        }
    }

    pub fn publish_all<'a>(&self, events: impl IntoIterator<Item = &'a Event>) {
        for event in events {
            self.publish(event.clone());
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        debug!("New event subscriber");
        EventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Event subscriber that receives events from the bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
}

impl EventSubscriber {
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "Subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return None;
                }
            }
        }
    }

    /// Non-blocking receive; `None` when nothing is queued
    pub fn try_recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.try_recv() {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!(missed = count, "Subscriber lagged");
                    continue;
                }
                Err(_) => return None,
            }
        }
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

/// Create a shared event bus
pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::AdministratorNotifiedEvent;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        bus.publish(Event::AdministratorNotified(AdministratorNotifiedEvent {
            station_id: 7,
        }));

        let received = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            subscriber.recv(),
        )
        .await
        .expect("Timeout")
        .expect("No message");

        assert_eq!(received.event.event_type(), "administrator_notified");
        assert_eq!(received.event.station_id(), 7);
    }

    #[test]
    fn test_publish_all_keeps_order() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        let events: Vec<Event> = [3, 4]
            .into_iter()
            .map(|station_id| Event::AdministratorNotified(AdministratorNotifiedEvent { station_id }))
            .collect();
        bus.publish_all(&events);

        assert_eq!(subscriber.try_recv().unwrap().event.station_id(), 3);
        assert_eq!(subscriber.try_recv().unwrap().event.station_id(), 4);
        assert!(subscriber.try_recv().is_none());
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(Event::AdministratorNotified(AdministratorNotifiedEvent {
            station_id: 1,
        }));
        let mut subscriber = bus.subscribe();
        assert!(subscriber.try_recv().is_none());
    }
}
