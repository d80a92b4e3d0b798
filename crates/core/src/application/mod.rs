// Application Layer - Use Cases and Business Logic

pub mod progress;
pub mod queue;
pub mod random;
pub mod retry;
pub mod seeder;
pub mod shutdown;
pub mod stats;
pub mod tag_policy;
pub mod uploader;
pub mod worker;

// Re-exports
pub use progress::{ProgressReport, ProgressReporter, ReporterHandle};
pub use queue::{job_queue, JobDistributor, JobReceiver, JobSender};
pub use random::RandomSource;
pub use retry::{RetryDecision, RetryPolicy};
pub use seeder::{FixtureSeeder, SeederDeps};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use stats::StatsAggregator;
pub use tag_policy::{random_uuid, TagPolicy};
pub use uploader::Uploader;
pub use worker::{JobOutcome, PoolReport, Worker, WorkerContext, WorkerPool};
