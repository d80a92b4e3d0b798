// Event Publisher Port (message broker)

use crate::domain::ObjectEvent;
use async_trait::async_trait;
use thiserror::Error;

/// Publish errors
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Event serialization failed: {0}")]
    Serialization(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Publisher unavailable: {0}")]
    Unavailable(String),
}

/// Fire-and-forget publication of per-object metadata
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &ObjectEvent) -> Result<(), PublishError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    type EventPredicate = Box<dyn Fn(&ObjectEvent) -> bool + Send + Sync>;

    /// Publisher that records every event it accepts
    #[derive(Default)]
    pub struct RecordingPublisher {
        events: Mutex<Vec<ObjectEvent>>,
        attempts: Mutex<usize>,
        fail_when: Option<EventPredicate>,
    }

    impl RecordingPublisher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_when(
            mut self,
            pred: impl Fn(&ObjectEvent) -> bool + Send + Sync + 'static,
        ) -> Self {
            self.fail_when = Some(Box::new(pred));
            self
        }

        pub fn events(&self) -> Vec<ObjectEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn attempts(&self) -> usize {
            *self.attempts.lock().unwrap()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: &ObjectEvent) -> Result<(), PublishError> {
            *self.attempts.lock().unwrap() += 1;
            if self.fail_when.as_ref().is_some_and(|f| f(event)) {
                return Err(PublishError::Delivery("injected failure".to_string()));
            }
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }
}
