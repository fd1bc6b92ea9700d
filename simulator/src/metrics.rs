//! Per-session desk metrics.

use std::collections::VecDeque;

use serde::Serialize;

/// Settlement latency samples kept for averaging.
const MAX_SAMPLES: usize = 1_000;

/// Desk activity for one CLI session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionMetrics {
    /// Comparisons computed.
    pub comparisons: u64,
    /// Trades confirmed.
    pub trades_total: u64,
    /// Trades that settled.
    pub trades_succeeded: u64,
    /// Trades that ended FAILED.
    pub trades_failed: u64,
    /// Advisory opinions served.
    pub opinions: u64,
    /// Opinions that were fallbacks.
    pub opinion_fallbacks: u64,
    /// Settlement latency samples (ms).
    #[serde(skip)]
    latency_samples: VecDeque<u64>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_comparison(&mut self) {
        self.comparisons += 1;
    }

    /// Record a settled trade.
    pub fn record_success(&mut self, latency_ms: u64) {
        self.trades_total += 1;
        self.trades_succeeded += 1;

        if self.latency_samples.len() >= MAX_SAMPLES {
            self.latency_samples.pop_front();
        }
        self.latency_samples.push_back(latency_ms);
    }

    /// Record a trade that ended FAILED.
    pub fn record_failure(&mut self) {
        self.trades_total += 1;
        self.trades_failed += 1;
    }

    pub fn record_opinion(&mut self, fallback: bool) {
        self.opinions += 1;
        if fallback {
            self.opinion_fallbacks += 1;
        }
    }

    /// Get average settlement latency in ms.
    pub fn average_latency_ms(&self) -> u64 {
        if self.latency_samples.is_empty() {
            return 0;
        }

        let sum: u64 = self.latency_samples.iter().sum();
        sum / self.latency_samples.len() as u64
    }

    /// Get trade success rate.
    pub fn success_rate(&self) -> f64 {
        if self.trades_total == 0 {
            return 0.0;
        }

        self.trades_succeeded as f64 / self.trades_total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let mut metrics = SessionMetrics::new();

        metrics.record_success(2000);
        metrics.record_success(2100);
        metrics.record_success(1900);
        metrics.record_failure();
        metrics.record_opinion(true);
        metrics.record_opinion(false);

        assert_eq!(metrics.trades_total, 4);
        assert_eq!(metrics.trades_succeeded, 3);
        assert_eq!(metrics.trades_failed, 1);
        assert_eq!(metrics.average_latency_ms(), 2000);
        assert_eq!(metrics.success_rate(), 0.75);
        assert_eq!(metrics.opinion_fallbacks, 1);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = SessionMetrics::new();
        assert_eq!(metrics.average_latency_ms(), 0);
        assert_eq!(metrics.success_rate(), 0.0);
    }
}
