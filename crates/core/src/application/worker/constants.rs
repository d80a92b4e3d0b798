// Pipeline constants (no magic values)
use std::time::Duration;

/// Total attempts for the tag write (first try included)
pub const TAG_WRITE_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first tag write retry (100ms)
pub const TAG_WRITE_BASE_DELAY: Duration = Duration::from_millis(100);

/// Exponential backoff factor between tag write retries
pub const TAG_WRITE_BACKOFF_FACTOR: f64 = 2.0;

/// Upper bound for a single tag write backoff (2s)
pub const TAG_WRITE_MAX_DELAY: Duration = Duration::from_secs(2);

/// Lower bound for `random_date` tags: 2015-01-01T00:00:00Z
pub const RANDOM_DATE_EPOCH_SECS: i64 = 1_420_070_400;

/// Mixed into the run seed so that each worker draws an independent stream
pub const WORKER_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;
