//! Fixture Seeder - Main Entry Point
//! Populates S3-compatible buckets with tagged fixtures, optionally
//! announcing each object on Kafka.

mod logging;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

// Import workspace crates
use seeder_core::application::{FixtureSeeder, RandomSource, SeederDeps};
use seeder_core::domain::{human_readable_bytes, parse_progress_interval};
use seeder_core::port::id_provider::UuidProvider;
use seeder_core::port::time_provider::SystemTimeProvider;
use seeder_core::port::EventPublisher;
use seeder_infra_fixtures::DefaultFixtureGenerator;
use seeder_infra_kafka::KafkaEventPublisher;
use seeder_infra_s3::{create_client, S3ObjectStorage, S3Settings};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Parser)]
#[command(name = "fixture-seeder")]
#[command(about = "Generate tagged test fixtures in S3-compatible storage", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the JSON run configuration
    #[arg(short, long, env = "SEEDER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Seconds between progress lines
    #[arg(long, env = "PROGRESS_INTERVAL_SEC")]
    progress_interval: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    let _log_guard = logging::init_logging()?;
    info!("Fixture Seeder v{} starting...", VERSION);

    // 2. Load configuration
    let config = settings::load_config(&cli.config)?;
    config.validate().context("Invalid run configuration")?;
    info!(config = ?config, path = %cli.config.display(), "Configuration loaded");

    let progress_interval = parse_progress_interval(cli.progress_interval.as_deref());

    // 3. Setup dependencies (DI wiring)
    let s3_settings = S3Settings::from_env().context("Object storage settings")?;
    info!(endpoint = %s3_settings.endpoint, region = %s3_settings.region, "Connecting to object storage");
    let storage = Arc::new(S3ObjectStorage::new(create_client(&s3_settings)));

    let generator = Arc::new(DefaultFixtureGenerator::new(&RandomSource::new(config.seed)));

    let publisher = match config.enabled_kafka() {
        Some(kafka) => {
            let publisher = KafkaEventPublisher::connect(kafka)
                .context("Failed to initialize Kafka publisher")?;
            Some(Arc::new(publisher) as Arc<dyn EventPublisher>)
        }
        None => None,
    };

    let deps = SeederDeps {
        storage,
        generator,
        publisher,
        id_provider: Arc::new(UuidProvider),
        time_provider: Arc::new(SystemTimeProvider),
    };

    // 4. Run
    let seeder = FixtureSeeder::new(config, deps).with_progress_interval(progress_interval);
    let stats = seeder.run().await.context("Fixture generation failed")?;

    // 5. Summary
    info!("Fixture generation completed successfully");
    info!(total_files = stats.total_files, "Files uploaded: {}", stats.total_files);
    info!(total_events = stats.total_events, "Events published: {}", stats.total_events);
    info!(
        total_bytes = stats.total_bytes,
        "Data uploaded: {}",
        human_readable_bytes(stats.total_bytes)
    );
    info!(
        duration_ms = stats.duration.as_millis() as u64,
        "Duration: {:?}", stats.duration
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_config_flag() {
        let cli = Cli::try_parse_from(["fixture-seeder", "--config", "run.json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("run.json"));
    }
}
