// Worker - per-job fixture pipeline and the fixed-size pool that runs it

pub mod constants;

use crate::application::queue::JobReceiver;
use crate::application::random::RandomSource;
use crate::application::stats::StatsAggregator;
use crate::application::tag_policy::TagPolicy;
use crate::application::uploader::Uploader;
use crate::domain::{JobIndex, JobPlan, ObjectEvent};
use crate::port::{EventPublisher, FixtureGenerator, IdProvider};
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// What happened to one job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Content and tags written; `event_sent` tells whether the broker accepted the event
    Uploaded { bytes: u64, event_sent: bool },
    /// Fixture could not be generated; job skipped
    GenerationFailed,
    /// Content or tag write failed; job skipped
    UploadFailed,
    /// Index outside the plan (never produced by the distributor)
    Rejected,
}

/// Dependencies shared by every worker in the pool
pub struct WorkerContext {
    pub plan: JobPlan,
    pub generator: Arc<dyn FixtureGenerator>,
    pub uploader: Arc<Uploader>,
    /// Present only when event publishing is enabled
    pub publisher: Option<Arc<dyn EventPublisher>>,
    pub tag_policy: Arc<TagPolicy>,
    pub id_provider: Arc<dyn IdProvider>,
    pub stats: Arc<StatsAggregator>,
}

/// Per-worker tally, returned when the queue is drained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub processed: u64,
    pub uploaded: u64,
}

/// Single pool member; owns its random generator
pub struct Worker {
    id: usize,
    ctx: Arc<WorkerContext>,
    rng: StdRng,
}

impl Worker {
    pub fn new(id: usize, ctx: Arc<WorkerContext>, rng: StdRng) -> Self {
        Self { id, ctx, rng }
    }

    /// Drain the queue until it is closed and empty
    pub async fn run(mut self, jobs: JobReceiver) -> WorkerReport {
        debug!(worker_id = self.id, "Worker started");
        let mut report = WorkerReport::default();
        while let Some(index) = jobs.recv().await {
            report.processed += 1;
            if let JobOutcome::Uploaded { .. } = self.process_job(index).await {
                report.uploaded += 1;
            }
        }
        debug!(
            worker_id = self.id,
            processed = report.processed,
            uploaded = report.uploaded,
            "Worker stopped"
        );
        report
    }

    /// Run the pipeline for one job: generate, tag, upload, count, publish
    pub async fn process_job(&mut self, index: JobIndex) -> JobOutcome {
        let ctx = Arc::clone(&self.ctx);

        let job = match ctx.plan.job(index) {
            Ok(job) => job,
            Err(e) => {
                error!(worker_id = self.id, error = %e, "Rejected job");
                return JobOutcome::Rejected;
            }
        };

        let fixture = match ctx.generator.generate(&job.file_type, job.ordinal()) {
            Ok(fixture) => fixture,
            Err(e) => {
                warn!(
                    worker_id = self.id,
                    index,
                    file_type = %job.file_type,
                    error = %e,
                    "Fixture generation failed"
                );
                return JobOutcome::GenerationFailed;
            }
        };

        let object_name = job.object_key(&ctx.id_provider.generate_id());
        let tags = ctx.tag_policy.resolve(&mut self.rng);
        let bytes = fixture.len() as u64;

        if let Err(e) = ctx
            .uploader
            .upload_object(&job.bucket, &object_name, fixture.content, &tags)
            .await
        {
            warn!(
                worker_id = self.id,
                bucket = %job.bucket,
                object = %object_name,
                error = %e,
                "Upload failed"
            );
            return JobOutcome::UploadFailed;
        }
        ctx.stats.record_upload(bytes);
        debug!(worker_id = self.id, bucket = %job.bucket, object = %object_name, bytes, "Uploaded");

        let event_sent = match &ctx.publisher {
            Some(publisher) => {
                let event = ObjectEvent::new(job.bucket, object_name, tags);
                match publisher.publish(&event).await {
                    Ok(()) => {
                        ctx.stats.record_event();
                        true
                    }
                    Err(e) => {
                        warn!(
                            worker_id = self.id,
                            object = %event.object_name,
                            error = %e,
                            "Event publish failed"
                        );
                        false
                    }
                }
            }
            None => false,
        };

        JobOutcome::Uploaded { bytes, event_sent }
    }
}

/// Totals over the whole pool after the join barrier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolReport {
    pub workers: usize,
    pub processed: u64,
    pub uploaded: u64,
    /// Workers that ended abnormally (panic)
    pub crashed: usize,
}

/// Fixed-size pool of workers sharing one job queue
pub struct WorkerPool {
    size: usize,
    ctx: Arc<WorkerContext>,
    random: RandomSource,
}

impl WorkerPool {
    pub fn new(size: usize, ctx: Arc<WorkerContext>, random: RandomSource) -> Self {
        Self {
            size: size.max(1),
            ctx,
            random,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Spawn all workers and wait for every one of them to exit
    ///
    /// A panicking worker is logged; the others keep draining the queue.
    pub async fn run(&self, jobs: JobReceiver) -> PoolReport {
        let mut set = JoinSet::new();
        for id in 1..=self.size {
            let worker = Worker::new(id, Arc::clone(&self.ctx), self.random.worker_rng(id));
            set.spawn(worker.run(jobs.clone()));
        }
        drop(jobs);

        let mut report = PoolReport {
            workers: self.size,
            ..Default::default()
        };
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(worker) => {
                    report.processed += worker.processed;
                    report.uploaded += worker.uploaded;
                }
                Err(join_err) => {
                    report.crashed += 1;
                    if join_err.is_panic() {
                        error!("Worker panicked: {:?}", join_err);
                    } else {
                        error!("Worker cancelled: {:?}", join_err);
                    }
                }
            }
        }
        info!(
            workers = report.workers,
            processed = report.processed,
            uploaded = report.uploaded,
            crashed = report.crashed,
            "Worker pool drained"
        );
        report
    }
}
