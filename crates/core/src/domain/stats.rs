// Run statistics

use std::time::Duration;

/// Consistent point-in-time view of the run counters (display only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub files_done: u64,
    pub events_sent: u64,
    pub bytes_done: u64,
    pub elapsed: Duration,
}

/// Final statistics, returned once after all workers finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    pub total_files: u64,
    pub total_events: u64,
    pub total_bytes: u64,
    pub duration: Duration,
}

impl From<ProgressSnapshot> for GenerationStats {
    fn from(s: ProgressSnapshot) -> Self {
        Self {
            total_files: s.files_done,
            total_events: s.events_sent,
            total_bytes: s.bytes_done,
            duration: s.elapsed,
        }
    }
}

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;
const TB: u64 = 1024 * GB;

/// Format a byte count with binary units (`1.50 MB`, `512 B`)
pub fn human_readable_bytes(bytes: u64) -> String {
    let (unit, name) = match bytes {
        b if b >= TB => (TB, "TB"),
        b if b >= GB => (GB, "GB"),
        b if b >= MB => (MB, "MB"),
        b if b >= KB => (KB, "KB"),
        _ => return format!("{} B", bytes),
    };
    format!("{:.2} {}", bytes as f64 / unit as f64, name)
}
