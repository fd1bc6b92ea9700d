//! Time utilities and constants for Railwise.

use chrono::{DateTime, Duration, Utc};

/// Timing constants shared by the execution and advisory layers.
pub mod constants {
    use super::Duration;

    /// How long a quoted rate stays contractually valid (30 seconds).
    pub fn quote_lock_duration() -> Duration {
        Duration::seconds(30)
    }

    /// Upper bound accepted for a configured quote validity (1 hour).
    pub fn max_quote_validity() -> Duration {
        Duration::hours(1)
    }

    /// Simulated settlement wait before a trade completes (2 seconds).
    pub fn settlement_delay() -> Duration {
        Duration::seconds(2)
    }

    /// Upper bound accepted for a configured settlement wait (5 minutes).
    pub fn max_settlement_delay() -> Duration {
        Duration::minutes(5)
    }

    /// Advisory request timeout (20 seconds).
    pub fn advisory_timeout() -> Duration {
        Duration::seconds(20)
    }
}

/// A timestamp with timezone (always UTC).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Check if `expiry` lies before `at`.
pub fn is_expired_at(expiry: Timestamp, at: Timestamp) -> bool {
    at > expiry
}

/// Duration extensions for convenient construction.
pub trait DurationExt {
    fn as_std(&self) -> std::time::Duration;
}

impl DurationExt for Duration {
    fn as_std(&self) -> std::time::Duration {
        self.to_std().unwrap_or(std::time::Duration::ZERO)
    }
}
