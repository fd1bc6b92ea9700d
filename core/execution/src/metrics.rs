//! Counters for simulated trading activity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Execution metrics.
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    /// Orders opened.
    pub orders_opened: AtomicU64,
    /// Orders currently waiting on settlement.
    pub orders_executing: AtomicU64,
    /// Orders settled.
    pub orders_succeeded: AtomicU64,
    /// Orders that ended in FAILED.
    pub orders_failed: AtomicU64,
    /// Confirmations rejected because the quote had expired.
    pub quotes_expired: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_opened(&self) {
        self.orders_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an order entering EXECUTING.
    pub fn execution_started(&self) {
        self.orders_executing.fetch_add(1, Ordering::Relaxed);
    }

    /// Record settlement success.
    pub fn execution_succeeded(&self) {
        self.orders_succeeded.fetch_add(1, Ordering::Relaxed);
        self.orders_executing.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record settlement failure.
    pub fn execution_failed(&self) {
        self.orders_failed.fetch_add(1, Ordering::Relaxed);
        self.orders_executing.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn quote_expired(&self) {
        self.quotes_expired.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            orders_opened: self.orders_opened.load(Ordering::Relaxed),
            orders_executing: self.orders_executing.load(Ordering::Relaxed),
            orders_succeeded: self.orders_succeeded.load(Ordering::Relaxed),
            orders_failed: self.orders_failed.load(Ordering::Relaxed),
            quotes_expired: self.quotes_expired.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub orders_opened: u64,
    pub orders_executing: u64,
    pub orders_succeeded: u64,
    pub orders_failed: u64,
    pub quotes_expired: u64,
}

/// Shared metrics instance.
pub type SharedMetrics = Arc<ExecutionMetrics>;
