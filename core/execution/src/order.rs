//! Trade orders and their lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use railwise_common::{Currency, Money, OrderId, RouteId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ExecutionError, ExecutionResult};
use crate::quote_lock::QuoteLock;

/// Side of a stablecoin trade, seen from the domestic holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeDirection {
    /// Spend domestic currency, receive the stablecoin.
    Buy,
    /// Sell the stablecoin for domestic currency.
    Sell,
}

impl TradeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeDirection::Buy => "BUY",
            TradeDirection::Sell => "SELL",
        }
    }

    /// Past-tense verb used on receipts.
    pub fn verb(&self) -> &'static str {
        match self {
            TradeDirection::Buy => "bought",
            TradeDirection::Sell => "sold",
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeDirection::Buy),
            "SELL" => Ok(TradeDirection::Sell),
            other => Err(format!("unknown trade direction: {other}")),
        }
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Opened, quote locked, awaiting confirmation.
    Idle,
    /// Confirmed and waiting on settlement.
    Executing,
    /// Settled; a receipt is available.
    Success,
    /// Settlement failed; a failure record is available.
    Failed,
}

impl OrderStatus {
    /// Check if this status is final (no further transitions).
    pub fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Success | OrderStatus::Failed)
    }

    /// Statuses reachable from this one in a single step.
    pub fn valid_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Idle => &[OrderStatus::Executing],
            OrderStatus::Executing => &[OrderStatus::Success, OrderStatus::Failed],
            OrderStatus::Success | OrderStatus::Failed => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.valid_transitions().contains(&next)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Idle => "IDLE",
            OrderStatus::Executing => "EXECUTING",
            OrderStatus::Success => "SUCCESS",
            OrderStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Values frozen when an order enters `EXECUTING`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSnapshot {
    pub order_id: OrderId,
    pub route_id: RouteId,
    pub direction: TradeDirection,
    pub principal: Money,
    pub locked_rate: Decimal,
    pub fee_rate: Decimal,
    pub started_at: Timestamp,
}

/// Terminal record of a settled order.
///
/// `realized` is in the stablecoin for BUY orders and in the domestic
/// currency for SELL orders. A SELL does not convert: the desk books the
/// principal net of the trading fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub order_id: OrderId,
    pub direction: TradeDirection,
    pub principal: Money,
    pub fee: Money,
    pub realized: Money,
    /// Principal converted at the locked rate before fees.
    pub gross_quantity: Money,
    pub locked_rate: Decimal,
    pub executed_at: Timestamp,
}

impl TradeReceipt {
    /// Settle `snapshot` into a receipt.
    pub fn settle(
        snapshot: &ExecutionSnapshot,
        asset: &Currency,
        executed_at: Timestamp,
    ) -> ExecutionResult<Self> {
        let principal = snapshot.principal.value;
        let rate = snapshot.locked_rate;

        let fee = principal
            .checked_mul(snapshot.fee_rate)
            .ok_or(ExecutionError::ArithmeticOverflow("trading fee"))?;
        let after_fee = principal
            .checked_sub(fee)
            .ok_or(ExecutionError::ArithmeticOverflow("principal after fee"))?;
        let gross = principal
            .checked_div(rate)
            .ok_or(ExecutionError::ArithmeticOverflow("gross quantity"))?;

        let realized = match snapshot.direction {
            TradeDirection::Buy => Money::new(
                after_fee
                    .checked_div(rate)
                    .ok_or(ExecutionError::ArithmeticOverflow("realized quantity"))?,
                asset.clone(),
            ),
            TradeDirection::Sell => Money::new(after_fee, snapshot.principal.currency.clone()),
        };

        Ok(Self {
            order_id: snapshot.order_id,
            direction: snapshot.direction,
            principal: snapshot.principal.clone(),
            fee: Money::new(fee, snapshot.principal.currency.clone()),
            realized,
            gross_quantity: Money::new(gross, asset.clone()),
            locked_rate: rate,
            executed_at,
        })
    }

    /// One-line confirmation headed by the realized amount, e.g.
    /// `Successfully bought 6024.17 USDT (6042.30 USDT before fees)`.
    pub fn summary(&self) -> String {
        match self.direction {
            TradeDirection::Buy => format!(
                "Successfully {} {} ({} before fees)",
                self.direction.verb(),
                self.realized.round(),
                self.gross_quantity.round()
            ),
            TradeDirection::Sell => format!(
                "Successfully {} {} principal, realized {}",
                self.direction.verb(),
                self.principal.round(),
                self.realized.round()
            ),
        }
    }
}

/// Why an order ended in `FAILED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    /// The settlement venue refused the trade.
    VenueRejected,
    /// The receipt could not be computed.
    ArithmeticOverflow,
}

/// Terminal record of a failed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeFailure {
    pub code: FailureCode,
    pub message: String,
    pub failed_at: Timestamp,
}

/// A single simulated trade on a stablecoin rail.
///
/// Direction, principal and locked rate are fixed at creation. The status
/// only moves forward; see [`OrderStatus::valid_transitions`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeOrder {
    id: OrderId,
    route_id: RouteId,
    direction: TradeDirection,
    principal: Money,
    asset: Currency,
    quote_lock: QuoteLock,
    status: OrderStatus,
    snapshot: Option<ExecutionSnapshot>,
    receipt: Option<TradeReceipt>,
    failure: Option<TradeFailure>,
    completed_at: Option<Timestamp>,
}

impl TradeOrder {
    /// Open an order in `IDLE`.
    pub fn new(
        route_id: RouteId,
        direction: TradeDirection,
        principal: Money,
        asset: Currency,
        quote_lock: QuoteLock,
    ) -> Self {
        Self {
            id: OrderId::new(),
            route_id,
            direction,
            principal,
            asset,
            quote_lock,
            status: OrderStatus::Idle,
            snapshot: None,
            receipt: None,
            failure: None,
            completed_at: None,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn route_id(&self) -> &RouteId {
        &self.route_id
    }

    pub fn direction(&self) -> TradeDirection {
        self.direction
    }

    pub fn principal(&self) -> &Money {
        &self.principal
    }

    /// Stablecoin traded on this order.
    pub fn asset(&self) -> &Currency {
        &self.asset
    }

    pub fn locked_rate(&self) -> Decimal {
        self.quote_lock.rate
    }

    pub fn quote_lock(&self) -> &QuoteLock {
        &self.quote_lock
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn opened_at(&self) -> Timestamp {
        self.quote_lock.created_at
    }

    pub fn snapshot(&self) -> Option<&ExecutionSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn receipt(&self) -> Option<&TradeReceipt> {
        self.receipt.as_ref()
    }

    pub fn failure(&self) -> Option<&TradeFailure> {
        self.failure.as_ref()
    }

    /// Time spent between confirmation and the terminal transition.
    pub fn settlement_time(&self) -> Option<Duration> {
        let started = self.snapshot.as_ref()?.started_at;
        Some(self.completed_at? - started)
    }

    /// Fee the desk charges at `fee_rate`, before the order is confirmed.
    pub fn estimated_fee(&self, fee_rate: Decimal) -> Option<Money> {
        self.principal
            .value
            .checked_mul(fee_rate)
            .map(|fee| Money::new(fee, self.principal.currency.clone()))
    }

    fn transition(&mut self, to: OrderStatus) -> ExecutionResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(ExecutionError::InvalidTransition {
                order_id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// `IDLE -> EXECUTING`: consume the quote lock and freeze the trade terms.
    pub fn begin_execution(
        &mut self,
        fee_rate: Decimal,
        now: Timestamp,
    ) -> ExecutionResult<ExecutionSnapshot> {
        self.transition(OrderStatus::Executing)?;
        self.quote_lock.mark_used();

        let snapshot = ExecutionSnapshot {
            order_id: self.id,
            route_id: self.route_id.clone(),
            direction: self.direction,
            principal: self.principal.clone(),
            locked_rate: self.quote_lock.rate,
            fee_rate,
            started_at: now,
        };
        self.snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// `EXECUTING -> SUCCESS`: compute and store the receipt.
    ///
    /// If the receipt cannot be computed the order is left in `EXECUTING`
    /// so the caller can fail it.
    pub fn complete(&mut self, now: Timestamp) -> ExecutionResult<TradeReceipt> {
        if !self.status.can_transition_to(OrderStatus::Success) {
            return Err(ExecutionError::InvalidTransition {
                order_id: self.id,
                from: self.status,
                to: OrderStatus::Success,
            });
        }
        let snapshot = self.snapshot.as_ref().ok_or(ExecutionError::InvalidTransition {
            order_id: self.id,
            from: self.status,
            to: OrderStatus::Success,
        })?;

        let receipt = TradeReceipt::settle(snapshot, &self.asset, now)?;
        self.transition(OrderStatus::Success)?;
        self.receipt = Some(receipt.clone());
        self.completed_at = Some(now);
        Ok(receipt)
    }

    /// `EXECUTING -> FAILED`: record why settlement did not happen.
    pub fn fail(
        &mut self,
        code: FailureCode,
        message: impl Into<String>,
        now: Timestamp,
    ) -> ExecutionResult<()> {
        self.transition(OrderStatus::Failed)?;
        self.failure = Some(TradeFailure {
            code,
            message: message.into(),
            failed_at: now,
        });
        self.completed_at = Some(now);
        Ok(())
    }
}
