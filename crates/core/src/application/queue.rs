// Job Queue & Distributor
//
// Bounded single-producer / multi-consumer queue of job indices. The
// distributor sizes it to the file count so the producer never waits.

use crate::domain::JobIndex;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// Producer side; dropping it closes the queue
pub struct JobSender {
    tx: mpsc::Sender<JobIndex>,
}

impl JobSender {
    /// Enqueue a job, waiting for capacity if the queue is full
    ///
    /// Returns false once every receiver has been dropped.
    pub async fn send(&self, index: JobIndex) -> bool {
        self.tx.send(index).await.is_ok()
    }
}

/// Consumer side, shared by all workers
///
/// Each index is handed to exactly one receiver.
#[derive(Clone)]
pub struct JobReceiver {
    rx: Arc<Mutex<mpsc::Receiver<JobIndex>>>,
}

impl JobReceiver {
    /// Next job, or None once the queue is closed and drained
    pub async fn recv(&self) -> Option<JobIndex> {
        self.rx.lock().await.recv().await
    }
}

/// Create a bounded job queue (capacity of at least 1)
pub fn job_queue(capacity: usize) -> (JobSender, JobReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        JobSender { tx },
        JobReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Emits `0..file_count` in order, then closes the queue
#[derive(Debug, Clone, Copy)]
pub struct JobDistributor {
    file_count: usize,
}

impl JobDistributor {
    pub fn new(file_count: usize) -> Self {
        Self { file_count }
    }

    /// Queue sized so that `distribute` never blocks
    pub fn queue(&self) -> (JobSender, JobReceiver) {
        job_queue(self.file_count)
    }

    /// Fill the queue and close it
    ///
    /// # Returns
    /// Number of jobs enqueued
    pub async fn distribute(self, sender: JobSender) -> usize {
        let mut sent = 0;
        for index in 0..self.file_count {
            if !sender.send(index).await {
                debug!(sent, "All job receivers dropped, stopping distribution");
                break;
            }
            sent += 1;
        }
        sent
    }
}
