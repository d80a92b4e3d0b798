// Logging setup
//
// SEEDER_LOG_FORMAT=json|pretty selects the console format.
// SEEDER_LOG_DIR adds a daily-rolling JSON file next to the console output.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const ENV_LOG_FORMAT: &str = "SEEDER_LOG_FORMAT";
pub const ENV_LOG_DIR: &str = "SEEDER_LOG_DIR";

const DEFAULT_FILTER: &str = "fixture_seeder=info,seeder_core=info,seeder_infra_s3=info,seeder_infra_kafka=info";
const LOG_FILE_PREFIX: &str = "fixture-seeder.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber
///
/// # Returns
/// Guard flushing the file writer; keep it alive until exit
pub fn init_logging() -> Result<Option<WorkerGuard>> {
    let format = LogFormat::parse(std::env::var(ENV_LOG_FORMAT).ok().as_deref());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    let console = match format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    };

    let (file, guard) = match std::env::var(ENV_LOG_DIR)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
    {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
