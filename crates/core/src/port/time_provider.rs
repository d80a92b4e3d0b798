// Time Provider Port (for testability)

use chrono::{DateTime, Utc};

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;

    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_millis()).unwrap_or_default()
    }
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

pub mod mocks {
    use super::*;

    /// Clock frozen at a given instant
    pub struct FixedTimeProvider {
        pub millis: i64,
    }

    impl FixedTimeProvider {
        pub fn at(time: DateTime<Utc>) -> Self {
            Self {
                millis: time.timestamp_millis(),
            }
        }
    }

    impl TimeProvider for FixedTimeProvider {
        fn now_millis(&self) -> i64 {
            self.millis
        }
    }
}
