// Progress Reporter
//
// Periodic read-only view of the stats aggregator: completion, throughput, ETA.

use crate::application::shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
use crate::application::stats::StatsAggregator;
use crate::domain::ProgressSnapshot;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Figures derived from one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub files_done: u64,
    pub total_files: u64,
    pub percent: f64,
    /// Files per second since run start
    pub throughput: f64,
    /// None while throughput is zero
    pub eta: Option<Duration>,
    pub events_sent: u64,
    pub bytes_done: u64,
}

impl ProgressReport {
    pub fn compute(snapshot: &ProgressSnapshot, total_files: usize) -> Self {
        let total = total_files as u64;
        let done = snapshot.files_done;

        let percent = if total == 0 {
            100.0
        } else {
            done as f64 / total as f64 * 100.0
        };

        let elapsed = snapshot.elapsed.as_secs_f64();
        let throughput = if elapsed > 0.0 {
            done as f64 / elapsed
        } else {
            0.0
        };

        let eta = (throughput > 0.0).then(|| {
            let remaining = total.saturating_sub(done) as f64;
            Duration::from_secs_f64(remaining / throughput)
        });

        Self {
            files_done: done,
            total_files: total,
            percent,
            throughput,
            eta,
            events_sent: snapshot.events_sent,
            bytes_done: snapshot.bytes_done,
        }
    }
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eta = self
            .eta
            .map(format_eta)
            .unwrap_or_else(|| "n/a".to_string());
        write!(
            f,
            "Uploaded files: {} / {} ({:.1}%), {:.1} files/s, ETA: {}, events: {}, data: {:.2} MB",
            self.files_done,
            self.total_files,
            self.percent,
            self.throughput,
            eta,
            self.events_sent,
            self.bytes_done as f64 / BYTES_PER_MB
        )
    }
}

/// Whole-second duration as `1h2m3s`, `4m0s`, `9s`
pub fn format_eta(eta: Duration) -> String {
    let secs = eta.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{}s", s),
        (0, _) => format!("{}m{}s", m, s),
        _ => format!("{}h{}m{}s", h, m, s),
    }
}

/// Periodic progress logger
pub struct ProgressReporter {
    stats: Arc<StatsAggregator>,
    total_files: usize,
    interval: Duration,
}

impl ProgressReporter {
    /// Create a reporter
    ///
    /// # Arguments
    /// * `stats` - Aggregator to read (never mutated)
    /// * `total_files` - Configured file count
    /// * `interval` - Tick period
    pub fn new(stats: Arc<StatsAggregator>, total_files: usize, interval: Duration) -> Self {
        Self {
            stats,
            total_files,
            interval,
        }
    }

    /// Start the reporter as a background task
    pub fn spawn(self) -> ReporterHandle {
        let (shutdown, token) = shutdown_channel();
        let task = tokio::spawn(self.run(token));
        ReporterHandle { shutdown, task }
    }

    /// Tick until stopped
    ///
    /// # Returns
    /// Number of progress lines emitted
    pub async fn run(self, mut shutdown: ShutdownToken) -> u64 {
        // First report one full interval after start
        let period = self.interval.max(Duration::from_millis(1));
        let mut tick = interval_at(Instant::now() + period, period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut reports = 0;
        loop {
            if shutdown.is_shutdown() {
                break;
            }
            tokio::select! {
                _ = tick.tick() => {
                    let report = ProgressReport::compute(&self.stats.snapshot(), self.total_files);
                    info!(
                        files_done = report.files_done,
                        total_files = report.total_files,
                        events_sent = report.events_sent,
                        bytes_done = report.bytes_done,
                        "{}",
                        report
                    );
                    reports += 1;
                }
                _ = shutdown.wait() => break,
            }
        }
        reports
    }
}

/// Handle to a running reporter
pub struct ReporterHandle {
    shutdown: ShutdownSender,
    task: JoinHandle<u64>,
}

impl ReporterHandle {
    /// Signal stop and wait for the task (and its timer) to finish
    ///
    /// # Returns
    /// Number of progress lines emitted
    pub async fn stop(self) -> u64 {
        self.shutdown.shutdown();
        match self.task.await {
            Ok(reports) => reports,
            Err(e) => {
                warn!(error = %e, "Progress reporter task ended abnormally");
                0
            }
        }
    }
}
