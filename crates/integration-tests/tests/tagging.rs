//! Tag policy as seen through stored objects

mod common;

use common::{config, Harness, RUN_START};
use seeder_core::port::object_storage::mocks::InMemoryObjectStorage;
use std::collections::HashSet;

/// skip=0, {"env": "uuid"}: every object gets a distinct well-formed UUID
#[tokio::test]
async fn test_uuid_rule_distinct_per_object() {
    let harness = Harness::new();
    let mut run = config(40, &["b1"], &["text"], 4);
    run.tags.insert("env".to_string(), "uuid".to_string());

    harness.seeder(run).run().await.unwrap();

    let objects = harness.storage.objects("b1");
    assert_eq!(objects.len(), 40);

    let ids: HashSet<String> = objects
        .values()
        .map(|o| {
            let id = o.tags["env"].clone();
            let parsed = uuid::Uuid::parse_str(&id).unwrap();
            assert_eq!(parsed.get_version_num(), 4);
            id
        })
        .collect();
    assert_eq!(ids.len(), 40);
}

/// Mixed rules resolve per object; literals are copied verbatim
#[tokio::test]
async fn test_rules_resolved_per_object() {
    let harness = Harness::new();
    let mut run = config(10, &["b1"], &["text"], 2);
    for (key, rule) in [
        ("hash", "random_hash"),
        ("created", "random_date"),
        ("seen", "upload_date"),
        ("team", "platform"),
    ] {
        run.tags.insert(key.to_string(), rule.to_string());
    }

    harness.seeder(run).run().await.unwrap();

    for object in harness.storage.objects("b1").values() {
        let tags = &object.tags;
        assert_eq!(tags.len(), 4);
        assert_eq!(tags["hash"].len(), 40);
        assert!(tags["hash"].chars().all(|c| c.is_ascii_hexdigit()));
        assert!(tags["created"].as_str() >= "2015-01-01T00:00:00Z");
        assert!(tags["created"].as_str() <= RUN_START);
        assert_eq!(tags["seen"], RUN_START);
        assert_eq!(tags["team"], "platform");
    }
}

/// skip=1: no tags at all, and no tag writes
#[tokio::test]
async fn test_skip_probability_one_leaves_objects_untagged() {
    let harness = Harness::new();
    let mut run = config(8, &["b1"], &["text"], 2);
    run.tags.insert("env".to_string(), "uuid".to_string());
    run.tags.insert("team".to_string(), "qa".to_string());
    run.skip_tags_probability = 1.0;

    let stats = harness.seeder(run).run().await.unwrap();

    assert_eq!(stats.total_files, 8);
    for (key, object) in harness.storage.objects("b1") {
        assert!(object.tags.is_empty());
        assert_eq!(harness.storage.tag_attempts(&key), 0);
    }
}

/// Out-of-range probability falls back to 0: every tag present
#[tokio::test]
async fn test_invalid_skip_probability_treated_as_zero() {
    let harness = Harness::new();
    let mut run = config(5, &["b1"], &["text"], 1);
    run.tags.insert("team".to_string(), "qa".to_string());
    run.skip_tags_probability = 1.5;

    harness.seeder(run).run().await.unwrap();
    assert!(harness
        .storage
        .objects("b1")
        .values()
        .all(|o| o.tags.len() == 1));
}

/// Transient tag failures are absorbed by the retry
#[tokio::test]
async fn test_transient_tag_failures_recovered() {
    let harness =
        Harness::new().with_storage(InMemoryObjectStorage::new().with_transient_tag_failures(2));
    let mut run = config(6, &["b1"], &["text"], 3);
    run.tags.insert("team".to_string(), "qa".to_string());

    let stats = harness.seeder(run).run().await.unwrap();

    assert_eq!(stats.total_files, 6);
    for (key, object) in harness.storage.objects("b1") {
        assert_eq!(harness.storage.tag_attempts(&key), 3);
        assert_eq!(object.tags["team"], "qa");
    }
}

/// Exhausted tag retries fail only the affected job
#[tokio::test]
async fn test_tag_retry_exhaustion_isolated_to_one_job() {
    let harness = Harness::new().with_storage(
        InMemoryObjectStorage::new().fail_tags_when(|key| key.starts_with("file_002_")),
    );
    let mut run = config(6, &["b1"], &["text"], 3);
    run.tags.insert("team".to_string(), "qa".to_string());

    let stats = harness.seeder(run).run().await.unwrap();

    assert_eq!(stats.total_files, 5);
    // text payload of ordinal n is n bytes; ordinal 2 excluded
    assert_eq!(stats.total_bytes, 1 + 3 + 4 + 5 + 6);

    let objects = harness.storage.objects("b1");
    let failed: Vec<&String> = objects
        .keys()
        .filter(|k| k.starts_with("file_002_"))
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(harness.storage.tag_attempts(failed[0]), 3);
    assert_eq!(harness.storage.put_attempts().len(), 6);
}

/// Same seed, same worker count of one: identical tag values
#[tokio::test]
async fn test_seeded_runs_reproduce_tags() {
    let mut tag_sets = Vec::new();
    for _ in 0..2 {
        let harness = Harness::new();
        let mut run = config(5, &["b1"], &["text"], 1);
        run.tags.insert("env".to_string(), "uuid".to_string());
        run.tags.insert("maybe".to_string(), "x".to_string());
        run.skip_tags_probability = 0.5;

        harness.seeder(run).run().await.unwrap();
        let tags: Vec<_> = harness
            .storage
            .objects("b1")
            .into_values()
            .map(|o| o.tags)
            .collect();
        tag_sets.push(tags);
    }
    assert_eq!(tag_sets[0], tag_sets[1]);
}
