// Run Configuration Domain Model

use super::error::{DomainError, Result};
use super::job::{FileType, JobPlan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default number of fixtures when `file_count` is unset or non-positive
pub const DEFAULT_FILE_COUNT: usize = 10;

/// Upper bound on `file_count`; the whole plan is queued up front
pub const MAX_FILE_COUNT: usize = 1_000_000_000;

/// Default worker pool size when `num_workers` is unset or non-positive
pub const DEFAULT_WORKER_COUNT: usize = 5;

/// Placeholder bucket when none are configured
pub const DEFAULT_BUCKET: &str = "default-bucket";

/// Default progress report interval
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// Broker settings for per-object events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaConfig {
    pub enabled: bool,
    pub brokers: Vec<String>,
    pub topic: String,
}

/// Run configuration, as read from the JSON config file
///
/// Numeric fields are signed so that out-of-range values in the file fall
/// back to defaults instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub file_count: i64,
    pub file_types: Vec<FileType>,
    pub buckets: Vec<String>,
    pub tags: BTreeMap<String, String>,
    pub skip_tags_probability: f64,
    pub clean_buckets: bool,
    pub kafka: Option<KafkaConfig>,
    pub num_workers: i64,
    /// Seed for the tag randomness; OS entropy when absent
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Fill in defaults for unset or out-of-range values
    pub fn with_defaults(mut self) -> Self {
        if self.file_count <= 0 {
            self.file_count = DEFAULT_FILE_COUNT as i64;
        }
        if self.file_types.is_empty() {
            self.file_types = vec![FileType::Text];
        }
        if self.buckets.is_empty() {
            self.buckets = vec![DEFAULT_BUCKET.to_string()];
        }
        if !(0.0..=1.0).contains(&self.skip_tags_probability) {
            self.skip_tags_probability = 0.0;
        }
        self
    }

    /// Check invariants that defaults cannot repair
    pub fn validate(&self) -> Result<()> {
        if self.file_count > MAX_FILE_COUNT as i64 {
            return Err(DomainError::InvalidConfig(format!(
                "file_count must be at most {} (got {})",
                MAX_FILE_COUNT, self.file_count
            )));
        }
        if let Some(bad) = self.buckets.iter().find(|b| b.trim().is_empty()) {
            return Err(DomainError::InvalidConfig(format!(
                "bucket name must not be empty (got {:?})",
                bad
            )));
        }
        if let Some(kafka) = self.kafka.as_ref().filter(|k| k.enabled) {
            if kafka.brokers.is_empty() {
                return Err(DomainError::InvalidConfig(
                    "kafka.enabled requires at least one broker".to_string(),
                ));
            }
            if kafka.topic.trim().is_empty() {
                return Err(DomainError::InvalidConfig(
                    "kafka.enabled requires a topic".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn file_count(&self) -> usize {
        if self.file_count <= 0 {
            DEFAULT_FILE_COUNT
        } else {
            self.file_count as usize
        }
    }

    pub fn worker_count(&self) -> usize {
        if self.num_workers <= 0 {
            DEFAULT_WORKER_COUNT
        } else {
            self.num_workers as usize
        }
    }

    /// Kafka settings, only when publishing is switched on
    pub fn enabled_kafka(&self) -> Option<&KafkaConfig> {
        self.kafka.as_ref().filter(|k| k.enabled)
    }

    pub fn job_plan(&self) -> Result<JobPlan> {
        JobPlan::new(
            self.file_count(),
            self.buckets.clone(),
            self.file_types.clone(),
        )
    }
}

/// Parse a progress interval in whole seconds; invalid or non-positive
/// values fall back to the default
pub fn parse_progress_interval(raw: Option<&str>) -> Duration {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_PROGRESS_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let cfg = RunConfig::default().with_defaults();
        assert_eq!(cfg.file_count(), 10);
        assert_eq!(cfg.file_types, vec![FileType::Text]);
        assert_eq!(cfg.buckets, vec!["default-bucket".to_string()]);
        assert!(cfg.tags.is_empty());
        assert_eq!(cfg.skip_tags_probability, 0.0);
        assert_eq!(cfg.worker_count(), 5);
        assert!(cfg.enabled_kafka().is_none());
    }

    #[test]
    fn test_out_of_range_probability_reset() {
        for p in [-0.1, 1.5, f64::NAN] {
            let cfg = RunConfig {
                skip_tags_probability: p,
                ..Default::default()
            }
            .with_defaults();
            assert_eq!(cfg.skip_tags_probability, 0.0);
        }
        let cfg = RunConfig {
            skip_tags_probability: 1.0,
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(cfg.skip_tags_probability, 1.0);
    }

    #[test]
    fn test_non_positive_counts_fall_back() {
        let cfg = RunConfig {
            file_count: -3,
            num_workers: 0,
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(cfg.file_count(), 10);
        assert_eq!(cfg.worker_count(), 5);
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "file_count": 4,
            "file_types": ["text", "IMAGE"],
            "buckets": ["b1", "b2"],
            "tags": {"env": "uuid", "team": "qa"},
            "skip_tags_probability": 0.25,
            "clean_buckets": true,
            "num_workers": 2,
            "kafka": {"enabled": true, "brokers": ["localhost:9092"], "topic": "fixtures"}
        }"#;
        let cfg: RunConfig = serde_json::from_str(json).unwrap();
        let cfg = cfg.with_defaults();

        assert_eq!(cfg.file_count(), 4);
        assert_eq!(cfg.file_types, vec![FileType::Text, FileType::Image]);
        assert_eq!(cfg.tags.get("team").map(String::as_str), Some("qa"));
        assert!(cfg.clean_buckets);
        assert_eq!(cfg.worker_count(), 2);
        assert_eq!(cfg.enabled_kafka().unwrap().topic, "fixtures");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_enabled_kafka_without_brokers() {
        let cfg = RunConfig {
            kafka: Some(KafkaConfig {
                enabled: true,
                brokers: vec![],
                topic: "t".into(),
            }),
            ..Default::default()
        }
        .with_defaults();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_ignores_disabled_kafka() {
        let cfg = RunConfig {
            kafka: Some(KafkaConfig::default()),
            ..Default::default()
        }
        .with_defaults();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_bucket() {
        let cfg = RunConfig {
            buckets: vec!["ok".into(), "  ".into()],
            ..Default::default()
        }
        .with_defaults();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_file_count() {
        let cfg = RunConfig {
            file_count: i64::MAX,
            ..Default::default()
        }
        .with_defaults();
        assert!(matches!(cfg.validate(), Err(DomainError::InvalidConfig(_))));

        let cfg = RunConfig {
            file_count: MAX_FILE_COUNT as i64,
            ..Default::default()
        }
        .with_defaults();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_parse_progress_interval() {
        assert_eq!(parse_progress_interval(None), Duration::from_secs(5));
        assert_eq!(parse_progress_interval(Some("2")), Duration::from_secs(2));
        assert_eq!(parse_progress_interval(Some("0")), Duration::from_secs(5));
        assert_eq!(parse_progress_interval(Some("-1")), Duration::from_secs(5));
        assert_eq!(parse_progress_interval(Some("abc")), Duration::from_secs(5));
    }
}
