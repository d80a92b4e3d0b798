//! Shared harness: a seeder wired to in-memory adapters

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use seeder_core::application::{FixtureSeeder, RetryPolicy, SeederDeps};
use seeder_core::domain::{FileType, KafkaConfig, RunConfig};
use seeder_core::port::event_publisher::mocks::RecordingPublisher;
use seeder_core::port::fixture_generator::mocks::StaticFixtureGenerator;
use seeder_core::port::id_provider::mocks::SequentialIdProvider;
use seeder_core::port::object_storage::mocks::InMemoryObjectStorage;
use seeder_core::port::time_provider::mocks::FixedTimeProvider;
use seeder_core::port::{EventPublisher, FixtureGenerator};
use std::sync::Arc;
use std::time::Duration;

pub const RUN_START: &str = "2024-06-01T12:00:00Z";

pub fn run_start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(RUN_START)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1), 2.0, Duration::from_millis(5))
}

pub fn config(file_count: i64, buckets: &[&str], types: &[&str], workers: i64) -> RunConfig {
    RunConfig {
        file_count,
        buckets: buckets.iter().map(|b| b.to_string()).collect(),
        file_types: types.iter().map(|t| FileType::parse(t)).collect(),
        num_workers: workers,
        seed: Some(7),
        ..Default::default()
    }
}

pub fn kafka() -> KafkaConfig {
    KafkaConfig {
        enabled: true,
        brokers: vec!["localhost:9092".to_string()],
        topic: "fixtures".to_string(),
    }
}

/// 1-based ordinal encoded in `file_NNN_<id>.<ext>`
pub fn ordinal_of(key: &str) -> usize {
    key["file_".len().."file_".len() + 3].parse().unwrap()
}

pub struct Harness {
    pub storage: Arc<InMemoryObjectStorage>,
    pub generator: Arc<StaticFixtureGenerator>,
    pub publisher: Option<Arc<RecordingPublisher>>,
    payloads: Option<Arc<dyn FixtureGenerator>>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(InMemoryObjectStorage::new()),
            generator: Arc::new(StaticFixtureGenerator::new()),
            publisher: None,
            payloads: None,
        }
    }

    pub fn with_storage(mut self, storage: InMemoryObjectStorage) -> Self {
        self.storage = Arc::new(storage);
        self
    }

    pub fn with_publisher(mut self, publisher: RecordingPublisher) -> Self {
        self.publisher = Some(Arc::new(publisher));
        self
    }

    /// Use a real payload generator instead of the static one
    pub fn with_generator(mut self, generator: Arc<dyn FixtureGenerator>) -> Self {
        self.payloads = Some(generator);
        self
    }

    pub fn seeder(&self, config: RunConfig) -> FixtureSeeder {
        let generator: Arc<dyn FixtureGenerator> = match &self.payloads {
            Some(generator) => Arc::clone(generator),
            None => self.generator.clone() as Arc<dyn FixtureGenerator>,
        };
        let deps = SeederDeps {
            storage: self.storage.clone(),
            generator,
            publisher: self
                .publisher
                .clone()
                .map(|p| p as Arc<dyn EventPublisher>),
            id_provider: Arc::new(SequentialIdProvider::default()),
            time_provider: Arc::new(FixedTimeProvider::at(run_start())),
        };
        FixtureSeeder::new(config, deps)
            .with_progress_interval(Duration::from_millis(20))
            .with_tag_retry(fast_retry())
    }
}
