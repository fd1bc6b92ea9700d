//! Time sources for trade execution.
//!
//! Wall-clock reads go through [`Clock`] and settlement waits through
//! [`SettlementTimer`]. Production uses [`SystemClock`] and [`TokioTimer`];
//! tests substitute a manual clock that only moves when told to.

use std::time::Duration;

use async_trait::async_trait;
use railwise_common::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        railwise_common::now()
    }
}

/// Suspends the caller for a settlement wait.
#[async_trait]
pub trait SettlementTimer: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait]
impl SettlementTimer for TokioTimer {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock that only moves when advanced.
///
/// Also acts as a [`SettlementTimer`]: waiting advances the clock by the
/// requested duration and returns immediately.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug)]
pub struct ManualClock {
    now: parking_lot::Mutex<Timestamp>,
}

#[cfg(any(test, feature = "test-utils"))]
impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: parking_lot::Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl SettlementTimer for ManualClock {
    async fn wait(&self, duration: Duration) {
        let by = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX);
        self.advance(by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let start = railwise_common::now();
        let clock = ManualClock::new(start);

        assert_eq!(clock.now(), start);
        clock.advance(chrono::Duration::seconds(5));
        assert_eq!(clock.now(), start + chrono::Duration::seconds(5));
    }

    #[tokio::test]
    async fn test_manual_clock_wait_is_instant() {
        let start = railwise_common::now();
        let clock = ManualClock::new(start);

        clock.wait(Duration::from_secs(2)).await;
        assert_eq!(clock.now(), start + chrono::Duration::seconds(2));
    }

    #[tokio::test]
    async fn test_tokio_timer_zero_wait() {
        TokioTimer.wait(Duration::ZERO).await;
    }
}
