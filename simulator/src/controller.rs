//! Desk session.
//!
//! Holds everything one operator works with: the catalog, the optimizer,
//! the trade executor and the advisory client. Nothing here is global; the
//! CLI builds one session per invocation.

use std::sync::Arc;

use anyhow::Context;
use railwise_advisory::{AdvisoryClient, AdvisoryOpinion};
use railwise_common::RouteId;
use railwise_execution::{TradeDirection, TradeExecutor, TradeOrder, TradeReceipt};
use railwise_fx::{spread_history, Optimizer, RouteCatalog, RouteComparison, Savings, SpreadPoint};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::metrics::SessionMetrics;

/// A comparison together with its savings over the baseline.
#[derive(Debug, Clone, Serialize)]
pub struct DeskQuote {
    pub comparison: RouteComparison,
    pub savings: Savings,
}

/// State of one desk session.
pub struct DeskSession {
    optimizer: Optimizer,
    executor: TradeExecutor,
    advisory: AdvisoryClient,
    baseline: RouteId,
    metrics: RwLock<SessionMetrics>,
}

impl DeskSession {
    /// Create a session comparing against `baseline`.
    pub fn new(
        catalog: Arc<RouteCatalog>,
        baseline: RouteId,
        executor: TradeExecutor,
        advisory: AdvisoryClient,
    ) -> anyhow::Result<Self> {
        catalog
            .get(&baseline)
            .with_context(|| format!("baseline rail '{}' is not in the catalog", baseline))?;

        Ok(Self {
            optimizer: Optimizer::new(catalog),
            executor,
            advisory,
            baseline,
            metrics: RwLock::new(SessionMetrics::new()),
        })
    }

    pub fn catalog(&self) -> &RouteCatalog {
        self.optimizer.catalog()
    }

    pub fn executor(&self) -> &TradeExecutor {
        &self.executor
    }

    /// Compare every rail at `principal` and price the savings.
    pub async fn quote(&self, principal: Decimal) -> anyhow::Result<DeskQuote> {
        let comparison = self.optimizer.compare(principal)?;
        let savings = self.optimizer.savings(&comparison, &self.baseline)?;
        self.metrics.write().await.record_comparison();

        info!(
            best = %comparison.best_route_id(),
            savings = %savings.amount,
            "Rails compared"
        );

        Ok(DeskQuote {
            comparison,
            savings,
        })
    }

    /// Open an order on a tradable rail. Dropping it cancels it.
    pub fn open_trade(
        &self,
        route_id: &RouteId,
        direction: TradeDirection,
        principal: Decimal,
    ) -> anyhow::Result<TradeOrder> {
        let order = self
            .executor
            .open_order(self.catalog(), route_id, direction, principal)?;
        Ok(order)
    }

    /// Confirm `order` and wait for it to settle.
    pub async fn execute_trade(&self, order: &mut TradeOrder) -> anyhow::Result<TradeReceipt> {
        let result = self.executor.execute(order).await;
        let mut metrics = self.metrics.write().await;

        match result {
            Ok(receipt) => {
                let latency_ms = order
                    .settlement_time()
                    .map(|d| d.num_milliseconds().max(0) as u64)
                    .unwrap_or_default();
                metrics.record_success(latency_ms);
                Ok(receipt)
            }
            Err(e) => {
                if order.status().is_final() {
                    metrics.record_failure();
                }
                warn!(order_id = %order.id(), code = e.error_code(), "Trade not settled");
                Err(e.into())
            }
        }
    }

    /// Market opinion for `principal`. Never fails.
    pub async fn advise(&self, principal: Decimal) -> AdvisoryOpinion {
        let opinion = self.advisory.request_opinion(principal).await;
        self.metrics
            .write()
            .await
            .record_opinion(opinion.is_fallback());
        opinion
    }

    /// Synthetic bank vs stablecoin rates for the last `days` days.
    pub fn history(&self, days: usize) -> anyhow::Result<Vec<SpreadPoint>> {
        let points = spread_history(chrono::Utc::now().date_naive(), days)
            .with_context(|| format!("cannot build a {days} day spread history"))?;
        Ok(points)
    }

    /// Get session metrics.
    pub async fn metrics(&self) -> SessionMetrics {
        self.metrics.read().await.clone()
    }
}
