//! Settlement venues.
//!
//! A venue is where a confirmed order settles. The simulated venue waits
//! out the configured delay and always succeeds.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::clock::SettlementTimer;
use crate::order::ExecutionSnapshot;

/// Settles confirmed orders.
#[async_trait]
pub trait SettlementVenue: Send + Sync {
    /// Venue name for logs.
    fn name(&self) -> &str;

    /// Settle the trade frozen in `snapshot`.
    ///
    /// An `Err` carries the venue's rejection reason.
    async fn settle(&self, snapshot: &ExecutionSnapshot) -> Result<(), String>;
}

/// Venue that settles every trade after a fixed delay.
pub struct SimulatedVenue {
    timer: Arc<dyn SettlementTimer>,
    delay: Duration,
}

impl SimulatedVenue {
    pub fn new(timer: Arc<dyn SettlementTimer>, delay: Duration) -> Self {
        Self { timer, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl SettlementVenue for SimulatedVenue {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn settle(&self, snapshot: &ExecutionSnapshot) -> Result<(), String> {
        debug!(
            order_id = %snapshot.order_id,
            delay_ms = self.delay.as_millis() as u64,
            "Waiting for simulated settlement"
        );
        self.timer.wait(self.delay).await;
        Ok(())
    }
}

/// Venue that rejects every trade.
#[cfg(any(test, feature = "test-utils"))]
pub struct RejectingVenue {
    reason: String,
}

#[cfg(any(test, feature = "test-utils"))]
impl RejectingVenue {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl SettlementVenue for RejectingVenue {
    fn name(&self) -> &str {
        "rejecting"
    }

    async fn settle(&self, _snapshot: &ExecutionSnapshot) -> Result<(), String> {
        Err(self.reason.clone())
    }
}
