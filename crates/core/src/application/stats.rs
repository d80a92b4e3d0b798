// Stats Aggregator - shared run counters

use crate::domain::{GenerationStats, ProgressSnapshot};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

#[derive(Debug, Default)]
struct Counters {
    files: u64,
    events: u64,
    bytes: u64,
}

/// Single owner of the run counters
///
/// All three counters sit behind one mutex so that a snapshot is a single
/// point-in-time view. Critical sections are a few additions; the lock is
/// never held across I/O.
#[derive(Debug)]
pub struct StatsAggregator {
    started: Instant,
    counters: Mutex<Counters>,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAggregator {
    /// Start the run clock
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            counters: Mutex::new(Counters::default()),
        }
    }

    /// A file was uploaded (content and tags)
    pub fn record_upload(&self, bytes: u64) {
        let mut counters = self.lock();
        counters.files += 1;
        counters.bytes += bytes;
    }

    /// An event was accepted by the broker
    pub fn record_event(&self) {
        self.lock().events += 1;
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let counters = self.lock();
        ProgressSnapshot {
            files_done: counters.files,
            events_sent: counters.events,
            bytes_done: counters.bytes,
            elapsed: self.started.elapsed(),
        }
    }

    /// Final statistics (call after the worker join barrier)
    pub fn finish(&self) -> GenerationStats {
        self.snapshot().into()
    }

    // Counters stay valid even if a holder panicked mid-update: each update
    // is a plain addition.
    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
