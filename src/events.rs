//! Event system for task and scheduler events.
//!
//! This module provides an event bus for subscribing to task lifecycle events
//! as the scheduler registers, runs, reschedules and removes tasks.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Represents different types of events that can occur in the scheduler.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    /// A task was registered
    TaskAdded {
        task_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A task was removed, explicitly or after its last run
    TaskRemoved {
        task_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A task body is about to run
    TaskStarted {
        task_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A task body returned successfully
    TaskCompleted {
        task_id: String,
        timestamp: DateTime<Utc>,
        duration_ms: u64,
    },

    /// A task body failed and the error handler was invoked
    TaskFailed {
        task_id: String,
        timestamp: DateTime<Utc>,
        error: String,
        retries_left: u32,
    },

    /// A task body failed with an error that has a reschedule policy
    TaskRescheduled {
        task_id: String,
        timestamp: DateTime<Utc>,
        error: String,
        reschedules_left: u32,
    },

    /// The scheduler was stopped
    SchedulerStopped {
        timestamp: DateTime<Utc>,
        removed_tasks: usize,
    },
}

impl SchedulerEvent {
    /// The task this event is about, if any.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            SchedulerEvent::TaskAdded { task_id, .. }
            | SchedulerEvent::TaskRemoved { task_id, .. }
            | SchedulerEvent::TaskStarted { task_id, .. }
            | SchedulerEvent::TaskCompleted { task_id, .. }
            | SchedulerEvent::TaskFailed { task_id, .. }
            | SchedulerEvent::TaskRescheduled { task_id, .. } => Some(task_id),
            SchedulerEvent::SchedulerStopped { .. } => None,
        }
    }
}

/// Event bus for broadcasting scheduler and task events.
///
/// Slow receivers lose the oldest events once the buffer is full.
///
/// # Examples
///
/// ```
/// use tasktick::events::{EventBus, SchedulerEvent};
///
/// #[tokio::main]
/// async fn main() {
///     let event_bus = EventBus::new();
///
///     let mut receiver = event_bus.subscribe();
///
///     tokio::spawn(async move {
///         while let Ok(event) = receiver.recv().await {
///             println!("Received event: {:?}", event);
///         }
///     });
/// }
/// ```
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<SchedulerEvent>>,
}

impl EventBus {
    /// Creates a new event bus with a default capacity of 1000 events.
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    /// Creates a new event bus buffering up to `capacity` events per receiver.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        EventBus {
            sender: Arc::new(sender),
        }
    }

    /// Publishes an event to all subscribers.
    pub fn publish(&self, event: SchedulerEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// # Examples
    ///
    /// ```
    /// use tasktick::events::EventBus;
    ///
    /// let event_bus = EventBus::new();
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _receiver = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bus_creation() {
        let event_bus = EventBus::new();
        assert_eq!(event_bus.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let event_bus = EventBus::with_capacity(4);
        event_bus.publish(SchedulerEvent::SchedulerStopped {
            timestamp: Utc::now(),
            removed_tasks: 0,
        });
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let event_bus = EventBus::new();
        let mut receiver1 = event_bus.subscribe();
        let mut receiver2 = event_bus.subscribe();

        assert_eq!(event_bus.subscriber_count(), 2);

        event_bus.publish(SchedulerEvent::TaskAdded {
            task_id: "test-123".to_string(),
            timestamp: Utc::now(),
        });

        let first = receiver1.recv().await.unwrap();
        let second = receiver2.recv().await.unwrap();
        assert_eq!(first.task_id(), Some("test-123"));
        assert_eq!(second.task_id(), Some("test-123"));
    }

    #[test]
    fn test_stopped_event_has_no_task() {
        let event = SchedulerEvent::SchedulerStopped {
            timestamp: Utc::now(),
            removed_tasks: 3,
        };
        assert!(event.task_id().is_none());
    }
}
