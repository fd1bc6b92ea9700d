//! Route optimization error types.

use railwise_common::RouteId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the route optimization engine.
#[derive(Debug, Error)]
pub enum FxError {
    /// No rail with the requested id exists in the catalog.
    #[error("Route not found: {0}")]
    RouteNotFound(RouteId),

    /// Two rails share the same id.
    #[error("Duplicate route id: {0}")]
    DuplicateRoute(RouteId),

    /// A catalog must contain at least one rail.
    #[error("Route catalog is empty")]
    EmptyCatalog,

    /// A rail definition failed validation.
    #[error("Invalid route {route_id}: {reason}")]
    InvalidRoute { route_id: RouteId, reason: String },

    /// A quoted rate must be strictly positive.
    #[error("Quoted rate must be positive, got {0}")]
    InvalidQuotedRate(Decimal),

    /// The best rail does not deliver a positive foreign amount.
    #[error("No viable route: best route {route_id} nets {net_foreign_amount}")]
    NoViableRoute {
        route_id: RouteId,
        net_foreign_amount: Decimal,
    },

    /// Decimal arithmetic left the representable range.
    #[error("Arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),
}

impl FxError {
    /// Get error code for logs and CLI output.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            FxError::DuplicateRoute(_) => "DUPLICATE_ROUTE",
            FxError::EmptyCatalog => "EMPTY_CATALOG",
            FxError::InvalidRoute { .. } => "INVALID_ROUTE",
            FxError::InvalidQuotedRate(_) => "INVALID_QUOTED_RATE",
            FxError::NoViableRoute { .. } => "NO_VIABLE_ROUTE",
            FxError::ArithmeticOverflow(_) => "ARITHMETIC_OVERFLOW",
        }
    }
}

/// Result type for route optimization operations.
pub type FxResult<T> = Result<T, FxError>;
