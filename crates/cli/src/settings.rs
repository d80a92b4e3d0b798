// Run configuration loading
//
// JSON file, then SEEDER__<FIELD> environment overrides
// (nested with `__`, e.g. SEEDER__KAFKA__TOPIC; lists comma separated).
// `config` lower-cases keys, so tag keys get their case back from the file.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use seeder_core::domain::RunConfig;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const ENV_PREFIX: &str = "SEEDER";
const ENV_SEPARATOR: &str = "__";
const LIST_KEYS: [&str; 3] = ["buckets", "file_types", "kafka.brokers"];

/// Override source; `None` reads the process environment
fn environment(vars: Option<HashMap<String, String>>) -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .list_separator(",")
            .try_parsing(true)
            .source(vars),
        |env, key| env.with_list_parse_key(key),
    )
}

/// Load the run configuration with defaults applied
pub fn load_config(path: &Path) -> Result<RunConfig> {
    load_with(path, environment(None))
}

fn load_with(path: &Path, env: Environment) -> Result<RunConfig> {
    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Json).required(true))
        .add_source(env)
        .build()
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let mut config: RunConfig = settings
        .try_deserialize()
        .with_context(|| format!("Invalid config file {}", path.display()))?;

    let keys = file_tag_keys(path)?;
    config.tags = restore_tag_case(std::mem::take(&mut config.tags), &keys);

    Ok(config.with_defaults())
}

/// Tag keys exactly as written in the config file
fn file_tag_keys(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config file {}", path.display()))?;

    Ok(value
        .get("tags")
        .and_then(serde_json::Value::as_object)
        .map(|tags| tags.keys().cloned().collect())
        .unwrap_or_default())
}

/// Re-key lower-cased tags with their original spelling
///
/// Values keep any environment override; keys only present in the
/// environment stay lower-case.
fn restore_tag_case(
    mut merged: BTreeMap<String, String>,
    original_keys: &[String],
) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    for key in original_keys {
        if let Some(value) = merged.remove(&key.to_lowercase()) {
            tags.insert(key.clone(), value);
        }
    }
    tags.extend(merged);
    tags
}
