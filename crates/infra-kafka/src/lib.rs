// Kafka Infrastructure Layer
// Implements the EventPublisher port; the broker client is compiled in with
// the `kafka` feature.

pub mod publisher;

pub use publisher::{encode_event, KafkaEventPublisher, DEFAULT_MESSAGE_TIMEOUT};
