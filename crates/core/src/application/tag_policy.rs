// Tag Policy - per-fixture tag randomization

use crate::application::worker::constants::RANDOM_DATE_EPOCH_SECS;
use crate::domain::{TagRule, TagSet};
use crate::port::TimeProvider;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Resolves the configured tag rules into a concrete tag set per fixture
///
/// Every key is an independent Bernoulli trial: it is dropped when a uniform
/// draw falls below `skip_probability`, otherwise its rule is resolved.
pub struct TagPolicy {
    rules: Vec<(String, TagRule)>,
    skip_probability: f64,
    run_start: DateTime<Utc>,
    time_provider: Arc<dyn TimeProvider>,
}

impl TagPolicy {
    /// Create a tag policy
    ///
    /// # Arguments
    /// * `rules` - Tag key -> rule string
    /// * `skip_probability` - Chance of omitting each key, clamped to [0, 1]
    /// * `time_provider` - Clock; its current time is the upper bound for `random_date`
    pub fn new(
        rules: &BTreeMap<String, String>,
        skip_probability: f64,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        let skip_probability = if skip_probability.is_nan() {
            0.0
        } else {
            skip_probability.clamp(0.0, 1.0)
        };
        Self {
            rules: rules
                .iter()
                .map(|(key, rule)| (key.clone(), TagRule::parse(rule)))
                .collect(),
            skip_probability,
            run_start: time_provider.now(),
            time_provider,
        }
    }

    pub fn run_start(&self) -> DateTime<Utc> {
        self.run_start
    }

    /// Draw the tag set for one fixture
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> TagSet {
        let mut tags = TagSet::new();
        for (key, rule) in &self.rules {
            if rng.gen::<f64>() < self.skip_probability {
                continue;
            }
            tags.insert(key.clone(), self.resolve_rule(rule, rng));
        }
        tags
    }

    fn resolve_rule<R: Rng + ?Sized>(&self, rule: &TagRule, rng: &mut R) -> String {
        match rule {
            TagRule::Uuid => random_uuid(rng).to_string(),
            TagRule::RandomHash => random_hash(rng),
            TagRule::RandomDate => format_rfc3339(random_date(rng, self.run_start)),
            TagRule::CurrentDate => format_rfc3339(self.time_provider.now()),
            TagRule::Literal(value) => value.clone(),
        }
    }
}

/// Lower bound for `random_date` values
pub fn random_date_epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(RANDOM_DATE_EPOCH_SECS, 0).unwrap_or_default()
}

/// Version 4 UUID drawn from `rng`
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> uuid::Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// SHA-1 hex digest of a fresh UUID (40 chars)
fn random_hash<R: Rng + ?Sized>(rng: &mut R) -> String {
    let id = random_uuid(rng).to_string();
    hex::encode(Sha1::digest(id.as_bytes()))
}

/// Whole-second timestamp uniform in `[epoch, end]`
fn random_date<R: Rng + ?Sized>(rng: &mut R, end: DateTime<Utc>) -> DateTime<Utc> {
    let start = RANDOM_DATE_EPOCH_SECS;
    let end = end.timestamp();
    if end <= start {
        return random_date_epoch();
    }
    let secs = rng.gen_range(start..=end);
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn format_rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}
