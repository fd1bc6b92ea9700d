//! Trade execution error types.

use railwise_common::{OrderId, RouteId, Timestamp};
use railwise_fx::{FxError, RailType};
use thiserror::Error;

use crate::order::OrderStatus;

/// Errors that can occur while opening or executing a trade order.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Orders can only be opened on tradable rails.
    #[error("Route {route_id} ({rail_type}) does not support trading")]
    NotTradable {
        route_id: RouteId,
        rail_type: RailType,
    },

    /// Catalog lookup or arithmetic failure in the route engine.
    #[error(transparent)]
    Route(#[from] FxError),

    /// The order is not in a state that allows the requested transition.
    #[error("Order {order_id}: invalid transition from {from:?} to {to:?}")]
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The locked quote is no longer valid (only when enforcement is on).
    #[error("Quote for order {order_id} expired at {expired_at}")]
    QuoteExpired {
        order_id: OrderId,
        expired_at: Timestamp,
    },

    /// The venue did not settle the trade; the order is now FAILED.
    #[error("Settlement failed for order {order_id}: {reason}")]
    SettlementFailed { order_id: OrderId, reason: String },

    /// Decimal arithmetic left the representable range.
    #[error("Arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),
}

impl ExecutionError {
    /// Get error code for logs and CLI output.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExecutionError::NotTradable { .. } => "NOT_TRADABLE",
            ExecutionError::Route(e) => e.error_code(),
            ExecutionError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ExecutionError::QuoteExpired { .. } => "QUOTE_EXPIRED",
            ExecutionError::SettlementFailed { .. } => "SETTLEMENT_FAILED",
            ExecutionError::ArithmeticOverflow(_) => "ARITHMETIC_OVERFLOW",
        }
    }
}

/// Result type for trade execution.
pub type ExecutionResult<T> = Result<T, ExecutionError>;
