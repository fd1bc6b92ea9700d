//! Opens and executes trade orders.

use std::sync::Arc;

use railwise_common::{Money, RouteId};
use railwise_fx::RouteCatalog;
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::clock::{Clock, SystemClock, TokioTimer};
use crate::config::ExecutionConfig;
use crate::error::{ExecutionError, ExecutionResult};
use crate::metrics::{ExecutionMetrics, SharedMetrics};
use crate::order::{FailureCode, OrderStatus, TradeDirection, TradeOrder, TradeReceipt};
use crate::quote_lock::QuoteLock;
use crate::venue::{SettlementVenue, SimulatedVenue};

/// Drives orders from `IDLE` to a terminal state.
pub struct TradeExecutor {
    config: ExecutionConfig,
    clock: Arc<dyn Clock>,
    venue: Arc<dyn SettlementVenue>,
    metrics: SharedMetrics,
}

impl TradeExecutor {
    pub fn new(
        config: ExecutionConfig,
        clock: Arc<dyn Clock>,
        venue: Arc<dyn SettlementVenue>,
    ) -> Self {
        Self {
            config,
            clock,
            venue,
            metrics: Arc::new(ExecutionMetrics::new()),
        }
    }

    /// Executor on the system clock, settling through a [`SimulatedVenue`]
    /// that sleeps for `config.settlement_delay`.
    pub fn simulated(config: ExecutionConfig) -> Self {
        let venue = SimulatedVenue::new(Arc::new(TokioTimer), config.settlement_delay);
        Self::new(config, Arc::new(SystemClock), Arc::new(venue))
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn metrics(&self) -> &SharedMetrics {
        &self.metrics
    }

    /// Open an `IDLE` order on `route_id`, locking its quoted rate.
    ///
    /// Only rails whose type is tradable accept orders. The principal is not
    /// validated, matching the comparison engine.
    pub fn open_order(
        &self,
        catalog: &RouteCatalog,
        route_id: &RouteId,
        direction: TradeDirection,
        principal: Decimal,
    ) -> ExecutionResult<TradeOrder> {
        let route = catalog.get(route_id)?;
        if !route.rail_type.is_tradable() {
            return Err(ExecutionError::NotTradable {
                route_id: route.id.clone(),
                rail_type: route.rail_type,
            });
        }

        let quote_lock = QuoteLock::new(
            route.quoted_rate,
            self.clock.now(),
            self.config.quote_validity,
        )?
        .with_slippage_tolerance(self.config.slippage_tolerance);
        let order = TradeOrder::new(
            route.id.clone(),
            direction,
            Money::new(principal, catalog.domestic_currency().clone()),
            self.config.asset.clone(),
            quote_lock,
        );

        self.metrics.order_opened();
        info!(
            order_id = %order.id(),
            route_id = %route.id,
            direction = %direction,
            locked_rate = %order.locked_rate(),
            expires_at = %order.quote_lock().expires_at,
            "Order opened"
        );

        Ok(order)
    }

    /// Confirm `order` and wait for settlement.
    ///
    /// Exactly one terminal transition happens per confirmed order. A venue
    /// rejection leaves the order `FAILED` and returns
    /// [`ExecutionError::SettlementFailed`].
    #[instrument(skip(self, order), fields(order_id = %order.id(), route_id = %order.route_id()))]
    pub async fn execute(&self, order: &mut TradeOrder) -> ExecutionResult<TradeReceipt> {
        let now = self.clock.now();

        if self.config.enforce_quote_lock
            && order.status() == OrderStatus::Idle
            && !order.quote_lock().is_valid_at(now)
        {
            self.metrics.quote_expired();
            warn!(expires_at = %order.quote_lock().expires_at, "Quote expired before confirmation");
            return Err(ExecutionError::QuoteExpired {
                order_id: order.id(),
                expired_at: order.quote_lock().expires_at,
            });
        }

        let snapshot = order.begin_execution(self.config.fee_rate, now)?;
        self.metrics.execution_started();
        info!(status = %order.status(), venue = self.venue.name(), "Order executing");

        let outcome = self.venue.settle(&snapshot).await;
        let settled_at = self.clock.now();

        match outcome {
            Ok(()) => match order.complete(settled_at) {
                Ok(receipt) => {
                    self.metrics.execution_succeeded();
                    info!(
                        status = %order.status(),
                        realized = %receipt.realized,
                        "Order settled"
                    );
                    Ok(receipt)
                }
                Err(e) => {
                    order.fail(FailureCode::ArithmeticOverflow, e.to_string(), settled_at)?;
                    self.metrics.execution_failed();
                    error!(error = %e, "Receipt computation failed");
                    Err(e)
                }
            },
            Err(reason) => {
                order.fail(FailureCode::VenueRejected, reason.clone(), settled_at)?;
                self.metrics.execution_failed();
                warn!(status = %order.status(), reason = %reason, "Settlement rejected");
                Err(ExecutionError::SettlementFailed {
                    order_id: order.id(),
                    reason,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SettlementTimer};
    use crate::venue::RejectingVenue;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio_test::{assert_pending, assert_ready_ok};

    /// Timer that blocks until the test releases it.
    #[derive(Default)]
    struct GatedTimer {
        gate: Notify,
    }

    #[async_trait]
    impl SettlementTimer for GatedTimer {
        async fn wait(&self, _duration: Duration) {
            self.gate.notified().await;
        }
    }

    fn manual_executor(config: ExecutionConfig) -> (TradeExecutor, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(railwise_common::now()));
        let venue = SimulatedVenue::new(clock.clone(), config.settlement_delay);
        let executor = TradeExecutor::new(config, clock.clone(), Arc::new(venue));
        (executor, clock)
    }

    fn usdt() -> RouteId {
        RouteId::new("usdt")
    }

    #[test]
    fn test_only_crypto_rails_are_tradable() {
        let catalog = RouteCatalog::reference();
        let (executor, _) = manual_executor(ExecutionConfig::default());

        let err = executor
            .open_order(&catalog, &RouteId::new("bca"), TradeDirection::Buy, dec!(1000))
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_TRADABLE");

        let err = executor
            .open_order(&catalog, &RouteId::new("swift"), TradeDirection::Buy, dec!(1000))
            .unwrap_err();
        assert_eq!(err.error_code(), "ROUTE_NOT_FOUND");

        assert_eq!(executor.metrics().snapshot().orders_opened, 0);
    }

    #[test]
    fn test_open_order_locks_quote() {
        let catalog = RouteCatalog::reference();
        let (executor, clock) = manual_executor(ExecutionConfig::default());

        let order = executor
            .open_order(&catalog, &usdt(), TradeDirection::Buy, dec!(100000000))
            .unwrap();

        assert_eq!(order.status(), OrderStatus::Idle);
        assert_eq!(order.locked_rate(), dec!(16550));
        assert_eq!(order.principal().currency.code(), "IDR");
        assert_eq!(order.quote_lock().slippage_tolerance, dec!(0.005));
        assert_eq!(
            order.quote_lock().expires_at,
            clock.now() + chrono::Duration::seconds(30)
        );
    }

    #[test]
    fn test_unrepresentable_quote_window_is_an_error() {
        let catalog = RouteCatalog::reference();
        let config = ExecutionConfig {
            quote_validity: chrono::Duration::seconds(9_000_000_000_000),
            ..ExecutionConfig::default()
        };
        let (executor, _) = manual_executor(config);

        let err = executor
            .open_order(&catalog, &usdt(), TradeDirection::Buy, dec!(1000))
            .unwrap_err();
        assert_eq!(err.error_code(), "ARITHMETIC_OVERFLOW");
        assert_eq!(executor.metrics().snapshot().orders_opened, 0);
    }

    #[tokio::test]
    async fn test_buy_settles_after_delay() {
        let catalog = RouteCatalog::reference();
        let (executor, clock) = manual_executor(ExecutionConfig::default());
        let start = clock.now();

        let mut order = executor
            .open_order(&catalog, &usdt(), TradeDirection::Buy, dec!(100000000))
            .unwrap();
        let receipt = executor.execute(&mut order).await.unwrap();

        assert_eq!(order.status(), OrderStatus::Success);
        assert_eq!(receipt.realized.round().value, dec!(6024.17));
        assert_eq!(receipt.realized.currency.code(), "USDT");
        assert_eq!(receipt.executed_at, start + chrono::Duration::seconds(2));
        assert_eq!(order.settlement_time(), Some(chrono::Duration::seconds(2)));

        let snapshot = executor.metrics().snapshot();
        assert_eq!(snapshot.orders_succeeded, 1);
        assert_eq!(snapshot.orders_executing, 0);
    }

    #[tokio::test]
    async fn test_sell_realizes_principal_less_fee() {
        let catalog = RouteCatalog::reference();
        let (executor, _) = manual_executor(ExecutionConfig::default());

        let mut order = executor
            .open_order(&catalog, &usdt(), TradeDirection::Sell, dec!(100000000))
            .unwrap();
        let receipt = executor.execute(&mut order).await.unwrap();

        assert_eq!(receipt.fee.value, dec!(300000));
        assert_eq!(receipt.realized.value, dec!(99700000));
        assert_eq!(receipt.realized.currency.code(), "IDR");
    }

    #[tokio::test]
    async fn test_success_is_absorbing() {
        let catalog = RouteCatalog::reference();
        let (executor, _) = manual_executor(ExecutionConfig::default());

        let mut order = executor
            .open_order(&catalog, &usdt(), TradeDirection::Buy, dec!(5000000))
            .unwrap();
        executor.execute(&mut order).await.unwrap();

        let err = executor.execute(&mut order).await.unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::InvalidTransition {
                from: OrderStatus::Success,
                to: OrderStatus::Executing,
                ..
            }
        ));
        assert_eq!(order.status(), OrderStatus::Success);
        assert_eq!(executor.metrics().snapshot().orders_succeeded, 1);
    }

    #[tokio::test]
    async fn test_venue_rejection_fails_order() {
        let catalog = RouteCatalog::reference();
        let clock = Arc::new(ManualClock::new(railwise_common::now()));
        let executor = TradeExecutor::new(
            ExecutionConfig::default(),
            clock,
            Arc::new(RejectingVenue::new("liquidity unavailable")),
        );

        let mut order = executor
            .open_order(&catalog, &usdt(), TradeDirection::Buy, dec!(100000000))
            .unwrap();
        let err = executor.execute(&mut order).await.unwrap_err();

        assert_eq!(err.error_code(), "SETTLEMENT_FAILED");
        assert_eq!(order.status(), OrderStatus::Failed);
        assert_eq!(order.failure().unwrap().code, FailureCode::VenueRejected);
        assert!(order.receipt().is_none());
        assert!(executor.execute(&mut order).await.is_err());
        assert_eq!(order.status(), OrderStatus::Failed);
        assert_eq!(executor.metrics().snapshot().orders_failed, 1);
    }

    #[tokio::test]
    async fn test_expired_quote_ignored_by_default() {
        let catalog = RouteCatalog::reference();
        let (executor, clock) = manual_executor(ExecutionConfig::default());

        let mut order = executor
            .open_order(&catalog, &usdt(), TradeDirection::Buy, dec!(100000000))
            .unwrap();
        clock.advance(chrono::Duration::minutes(2));

        executor.execute(&mut order).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Success);
    }

    #[tokio::test]
    async fn test_expired_quote_rejected_when_enforced() {
        let catalog = RouteCatalog::reference();
        let config = ExecutionConfig {
            enforce_quote_lock: true,
            ..ExecutionConfig::default()
        };
        let (executor, clock) = manual_executor(config);

        let mut order = executor
            .open_order(&catalog, &usdt(), TradeDirection::Buy, dec!(100000000))
            .unwrap();
        clock.advance(chrono::Duration::seconds(31));

        let err = executor.execute(&mut order).await.unwrap_err();
        assert_eq!(err.error_code(), "QUOTE_EXPIRED");
        assert_eq!(order.status(), OrderStatus::Idle);
        assert_eq!(executor.metrics().snapshot().quotes_expired, 1);
    }

    #[test]
    fn test_order_is_executing_while_settlement_pending() {
        let catalog = RouteCatalog::reference();
        let timer = Arc::new(GatedTimer::default());
        let venue = SimulatedVenue::new(timer.clone(), Duration::from_secs(2));
        let executor = TradeExecutor::new(
            ExecutionConfig::default(),
            Arc::new(SystemClock),
            Arc::new(venue),
        );

        let mut order = executor
            .open_order(&catalog, &usdt(), TradeDirection::Buy, dec!(100000000))
            .unwrap();

        {
            let mut task = tokio_test::task::spawn(executor.execute(&mut order));
            assert_pending!(task.poll());
            assert_pending!(task.poll());
            assert_eq!(executor.metrics().snapshot().orders_executing, 1);

            timer.gate.notify_one();
            assert!(task.is_woken());
            assert_ready_ok!(task.poll());
        }

        assert_eq!(order.status(), OrderStatus::Success);
        assert_eq!(executor.metrics().snapshot().orders_executing, 0);
    }
}
