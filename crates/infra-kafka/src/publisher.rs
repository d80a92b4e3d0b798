// Kafka EventPublisher Implementation

use async_trait::async_trait;
use seeder_core::domain::{KafkaConfig, ObjectEvent};
use seeder_core::port::{EventPublisher, PublishError};
use std::time::Duration;

#[cfg(feature = "kafka")]
use rdkafka::config::ClientConfig;
#[cfg(feature = "kafka")]
use rdkafka::producer::{FutureProducer, FutureRecord};
#[cfg(feature = "kafka")]
use tracing::{debug, info};

/// Delivery timeout per message
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// JSON payload for one event
pub fn encode_event(event: &ObjectEvent) -> Result<Vec<u8>, PublishError> {
    serde_json::to_vec(event).map_err(|e| PublishError::Serialization(e.to_string()))
}

/// Publishes one message per uploaded object, keyed by object name
pub struct KafkaEventPublisher {
    topic: String,
    message_timeout: Duration,
    #[cfg(feature = "kafka")]
    producer: FutureProducer,
}

impl KafkaEventPublisher {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn message_timeout(&self) -> Duration {
        self.message_timeout
    }

    pub fn with_message_timeout(mut self, timeout: Duration) -> Self {
        self.message_timeout = timeout;
        self
    }
}

#[cfg(feature = "kafka")]
impl KafkaEventPublisher {
    /// Create a producer for the configured brokers and topic
    ///
    /// # Errors
    /// PublishError::Unavailable if the client cannot be created
    pub fn connect(config: &KafkaConfig) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers.join(","))
            .set(
                "message.timeout.ms",
                DEFAULT_MESSAGE_TIMEOUT.as_millis().to_string(),
            )
            .create()
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;

        info!(
            brokers = %config.brokers.join(","),
            topic = %config.topic,
            "Kafka producer created"
        );

        Ok(Self {
            topic: config.topic.clone(),
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
            producer,
        })
    }
}

#[cfg(not(feature = "kafka"))]
impl KafkaEventPublisher {
    /// Always fails: the broker client is not compiled in
    pub fn connect(config: &KafkaConfig) -> Result<Self, PublishError> {
        Err(PublishError::Unavailable(format!(
            "cannot publish to topic {}: built without the `kafka` feature",
            config.topic
        )))
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    #[cfg(feature = "kafka")]
    async fn publish(&self, event: &ObjectEvent) -> Result<(), PublishError> {
        let payload = encode_event(event)?;
        let record = FutureRecord::to(&self.topic)
            .key(event.object_name.as_str())
            .payload(payload.as_slice());

        let (partition, offset) = self
            .producer
            .send(record, self.message_timeout)
            .await
            .map_err(|(e, _)| PublishError::Delivery(e.to_string()))?;

        debug!(
            object = %event.object_name,
            partition,
            offset,
            "Event delivered"
        );
        Ok(())
    }

    #[cfg(not(feature = "kafka"))]
    async fn publish(&self, _event: &ObjectEvent) -> Result<(), PublishError> {
        Err(PublishError::Unavailable(
            "built without the `kafka` feature".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seeder_core::domain::TagSet;

    fn event() -> ObjectEvent {
        let mut tags = TagSet::new();
        tags.insert("env".to_string(), "qa".to_string());
        ObjectEvent::new("b1", "file_001_x.txt", tags)
    }

    #[test]
    fn test_encode_event_json() {
        let payload = encode_event(&event()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["bucket"], "b1");
        assert_eq!(value["object_name"], "file_001_x.txt");
        assert_eq!(value["tags"]["env"], "qa");
    }

    #[cfg(not(feature = "kafka"))]
    #[test]
    fn test_connect_without_feature_is_unavailable() {
        let config = KafkaConfig {
            enabled: true,
            brokers: vec!["localhost:9092".to_string()],
            topic: "fixtures".to_string(),
        };
        let err = KafkaEventPublisher::connect(&config).err().unwrap();
        assert!(matches!(err, PublishError::Unavailable(_)));
        assert!(err.to_string().contains("fixtures"));
    }

    #[cfg(feature = "kafka")]
    #[test]
    fn test_connect_creates_producer_lazily() {
        // librdkafka connects in the background; creation needs no broker
        let config = KafkaConfig {
            enabled: true,
            brokers: vec!["localhost:1".to_string()],
            topic: "fixtures".to_string(),
        };
        let publisher = KafkaEventPublisher::connect(&config)
            .unwrap()
            .with_message_timeout(Duration::from_millis(10));
        assert_eq!(publisher.topic(), "fixtures");
        assert_eq!(publisher.message_timeout(), Duration::from_millis(10));
    }
}
