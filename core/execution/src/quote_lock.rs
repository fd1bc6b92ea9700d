//! Quote locks for stablecoin trades.

use chrono::Duration;
use railwise_common::{is_expired_at, QuoteLockId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ExecutionError, ExecutionResult};

/// Slippage the desk tolerates on a locked quote (0.5%).
///
/// Recorded on every lock for display; settlement does not check it.
pub const DEFAULT_SLIPPAGE_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// A quoted rate held for a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLock {
    /// Unique lock ID.
    pub id: QuoteLockId,
    /// The locked rate, domestic units per foreign unit.
    pub rate: Decimal,
    /// When the lock was created.
    pub created_at: Timestamp,
    /// When the lock expires.
    pub expires_at: Timestamp,
    /// Accepted price movement as a fraction of the rate.
    pub slippage_tolerance: Decimal,
    /// Whether an execution has consumed the lock.
    pub used: bool,
}

impl QuoteLock {
    /// Lock `rate` at `created_at` for `validity`.
    pub fn new(rate: Decimal, created_at: Timestamp, validity: Duration) -> ExecutionResult<Self> {
        let expires_at = created_at
            .checked_add_signed(validity)
            .ok_or(ExecutionError::ArithmeticOverflow("quote lock expiry"))?;

        Ok(Self {
            id: QuoteLockId::new(),
            rate,
            created_at,
            expires_at,
            slippage_tolerance: DEFAULT_SLIPPAGE_TOLERANCE,
            used: false,
        })
    }

    /// Override the recorded slippage tolerance.
    pub fn with_slippage_tolerance(mut self, tolerance: Decimal) -> Self {
        self.slippage_tolerance = tolerance;
        self
    }

    /// Check if the lock can still be used at `now`.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        !self.used && !is_expired_at(self.expires_at, now)
    }

    /// Remaining validity at `now`, never negative.
    pub fn time_remaining(&self, now: Timestamp) -> Duration {
        let remaining = self.expires_at.signed_duration_since(now);
        if remaining < Duration::zero() {
            Duration::zero()
        } else {
            remaining
        }
    }

    pub fn mark_used(&mut self) {
        self.used = true;
    }
}
