// Fixture Seeder - run orchestration
//
// Setup (clean + ensure buckets) -> reporter -> distributor + pool ->
// join barrier -> stop reporter -> final stats.

use crate::application::progress::ProgressReporter;
use crate::application::queue::JobDistributor;
use crate::application::random::RandomSource;
use crate::application::retry::RetryPolicy;
use crate::application::stats::StatsAggregator;
use crate::application::tag_policy::TagPolicy;
use crate::application::uploader::Uploader;
use crate::application::worker::{WorkerContext, WorkerPool};
use crate::domain::{GenerationStats, RunConfig, DEFAULT_PROGRESS_INTERVAL};
use crate::error::{AppError, Result};
use crate::port::{EventPublisher, FixtureGenerator, IdProvider, ObjectStorage, TimeProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Adapters the seeder runs against
pub struct SeederDeps {
    pub storage: Arc<dyn ObjectStorage>,
    pub generator: Arc<dyn FixtureGenerator>,
    /// Required when the config enables event publishing
    pub publisher: Option<Arc<dyn EventPublisher>>,
    pub id_provider: Arc<dyn IdProvider>,
    pub time_provider: Arc<dyn TimeProvider>,
}

pub struct FixtureSeeder {
    config: RunConfig,
    deps: SeederDeps,
    progress_interval: Duration,
    tag_retry: RetryPolicy,
}

impl FixtureSeeder {
    /// Create a seeder; defaults are applied to `config` here
    pub fn new(config: RunConfig, deps: SeederDeps) -> Self {
        Self {
            config: config.with_defaults(),
            deps,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            tag_retry: RetryPolicy::tag_write(),
        }
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_tag_retry(mut self, policy: RetryPolicy) -> Self {
        self.tag_retry = policy;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute the whole run
    ///
    /// # Errors
    /// Only setup failures: invalid config, missing publisher, bucket
    /// clear/create failures. Per-job failures are logged and skipped.
    pub async fn run(&self) -> Result<GenerationStats> {
        let config = &self.config;
        config.validate()?;
        let plan = config.job_plan()?;

        let publisher = match (config.enabled_kafka(), &self.deps.publisher) {
            (Some(_), Some(publisher)) => Some(Arc::clone(publisher)),
            (Some(_), None) => {
                return Err(AppError::Config(
                    "event publishing is enabled but no publisher is configured".to_string(),
                ))
            }
            (None, _) => None,
        };

        let stats = Arc::new(StatsAggregator::new());
        let uploader = Arc::new(Uploader::new(
            Arc::clone(&self.deps.storage),
            self.tag_retry.clone(),
        ));

        if config.clean_buckets {
            for bucket in plan.buckets() {
                uploader.clear_bucket(bucket).await?;
            }
        }
        for bucket in plan.buckets() {
            uploader.ensure_bucket(bucket).await?;
        }

        let file_count = plan.file_count();
        let worker_count = config.worker_count();
        info!(
            file_count,
            worker_count,
            buckets = plan.buckets().len(),
            events = publisher.is_some(),
            "Starting fixture generation"
        );

        let ctx = Arc::new(WorkerContext {
            plan,
            generator: Arc::clone(&self.deps.generator),
            uploader,
            publisher,
            tag_policy: Arc::new(TagPolicy::new(
                &config.tags,
                config.skip_tags_probability,
                Arc::clone(&self.deps.time_provider),
            )),
            id_provider: Arc::clone(&self.deps.id_provider),
            stats: Arc::clone(&stats),
        });

        let reporter =
            ProgressReporter::new(Arc::clone(&stats), file_count, self.progress_interval).spawn();

        let distributor = JobDistributor::new(file_count);
        let (sender, receiver) = distributor.queue();
        distributor.distribute(sender).await;

        let pool = WorkerPool::new(worker_count, ctx, RandomSource::new(config.seed));
        let report = pool.run(receiver).await;

        reporter.stop().await;

        let final_stats = stats.finish();
        info!(
            total_files = final_stats.total_files,
            total_events = final_stats.total_events,
            total_bytes = final_stats.total_bytes,
            failed_jobs = report.processed - report.uploaded,
            duration_ms = final_stats.duration.as_millis() as u64,
            "Fixture generation finished"
        );
        Ok(final_stats)
    }
}
