//! Run setup: bucket preparation and configuration failures

mod common;

use common::{config, kafka, Harness};
use seeder_core::error::AppError;
use seeder_core::port::event_publisher::mocks::RecordingPublisher;
use seeder_core::port::object_storage::mocks::InMemoryObjectStorage;
use seeder_core::port::StorageError;

#[tokio::test]
async fn test_missing_buckets_are_created() {
    let harness = Harness::new();
    harness
        .seeder(config(2, &["fresh-a", "fresh-b"], &["text"], 1))
        .run()
        .await
        .unwrap();

    assert!(harness.storage.has_bucket("fresh-a"));
    assert!(harness.storage.has_bucket("fresh-b"));
}

#[tokio::test]
async fn test_clean_buckets_removes_existing_objects() {
    let harness = Harness::new()
        .with_storage(InMemoryObjectStorage::new().with_bucket("b1", &["stale-1", "stale-2"]));
    let mut run = config(3, &["b1"], &["text"], 2);
    run.clean_buckets = true;

    harness.seeder(run).run().await.unwrap();

    let objects = harness.storage.objects("b1");
    assert_eq!(objects.len(), 3);
    assert!(objects.keys().all(|k| k.starts_with("file_")));
}

#[tokio::test]
async fn test_existing_objects_kept_without_clean() {
    let harness = Harness::new()
        .with_storage(InMemoryObjectStorage::new().with_bucket("b1", &["stale-1"]));

    harness
        .seeder(config(2, &["b1"], &["text"], 1))
        .run()
        .await
        .unwrap();

    let objects = harness.storage.objects("b1");
    assert_eq!(objects.len(), 3);
    assert!(objects.contains_key("stale-1"));
}

#[tokio::test]
async fn test_bucket_failure_aborts_before_any_upload() {
    let harness = Harness::new().with_storage(InMemoryObjectStorage::new().fail_bucket("b2"));

    let err = harness
        .seeder(config(4, &["b1", "b2"], &["text"], 2))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Storage(StorageError::Bucket { ref bucket, .. }) if bucket == "b2"
    ));
    assert!(harness.storage.put_attempts().is_empty());
    assert!(harness.generator.calls().is_empty());
}

#[tokio::test]
async fn test_clean_failure_aborts_run() {
    let harness = Harness::new().with_storage(InMemoryObjectStorage::new().fail_bucket("b1"));
    let mut run = config(2, &["b1"], &["text"], 1);
    run.clean_buckets = true;

    let err = harness.seeder(run).run().await.unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));
    assert!(harness.storage.put_attempts().is_empty());
}

#[tokio::test]
async fn test_kafka_enabled_without_publisher_is_config_error() {
    let harness = Harness::new();
    let mut run = config(2, &["b1"], &["text"], 1);
    run.kafka = Some(kafka());

    let err = harness.seeder(run).run().await.unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    assert!(harness.storage.put_attempts().is_empty());
}

#[tokio::test]
async fn test_kafka_enabled_without_topic_is_rejected() {
    let harness = Harness::new().with_publisher(RecordingPublisher::new());
    let mut run = config(2, &["b1"], &["text"], 1);
    let mut broker = kafka();
    broker.topic = String::new();
    run.kafka = Some(broker);

    let err = harness.seeder(run).run().await.unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));
}

#[tokio::test]
async fn test_blank_bucket_name_is_rejected() {
    let harness = Harness::new();
    let err = harness
        .seeder(config(2, &["b1", " "], &["text"], 1))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));
    assert!(!harness.storage.has_bucket("b1"));
}

#[tokio::test]
async fn test_defaults_applied_to_empty_config() {
    let harness = Harness::new();
    let seeder = harness.seeder(Default::default());

    assert_eq!(seeder.config().file_count(), 10);
    assert_eq!(seeder.config().worker_count(), 5);

    let stats = seeder.run().await.unwrap();
    assert_eq!(stats.total_files, 10);
    assert_eq!(harness.storage.objects("default-bucket").len(), 10);
}

#[tokio::test]
async fn test_oversized_file_count_is_rejected() {
    let harness = Harness::new();
    let err = harness
        .seeder(config(i64::MAX, &["b1"], &["text"], 1))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));
    assert!(!harness.storage.has_bucket("b1"));
}
