// Port Layer - Interfaces for external dependencies

pub mod event_publisher;
pub mod fixture_generator;
pub mod id_provider; // For deterministic testing
pub mod object_storage;
pub mod time_provider;

// Re-exports
pub use event_publisher::{EventPublisher, PublishError};
pub use fixture_generator::{FixtureGenerator, GenerationError};
pub use id_provider::IdProvider;
pub use object_storage::{content_type_for_key, ObjectStorage, StorageError};
pub use time_provider::TimeProvider;
