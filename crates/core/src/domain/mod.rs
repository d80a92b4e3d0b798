// Domain Layer - Pure business logic and entities

pub mod config;
pub mod error;
pub mod event;
pub mod fixture;
pub mod job;
pub mod stats;
pub mod tags;

// Re-exports
pub use config::{
    parse_progress_interval, KafkaConfig, RunConfig, DEFAULT_BUCKET, DEFAULT_FILE_COUNT,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_WORKER_COUNT, MAX_FILE_COUNT,
};
pub use error::DomainError;
pub use event::ObjectEvent;
pub use fixture::Fixture;
pub use job::{FileJob, FileType, JobIndex, JobPlan};
pub use stats::{human_readable_bytes, GenerationStats, ProgressSnapshot};
pub use tags::{TagRule, TagSet};
