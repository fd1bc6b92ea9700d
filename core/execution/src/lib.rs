//! Railwise Trade Execution
//!
//! Simulated trades on stablecoin rails. An order locks the rail's quoted
//! rate when it is opened and moves through a one-way lifecycle:
//!
//! ```text
//! IDLE --confirm--> EXECUTING --settled--> SUCCESS
//!                             \--failed--> FAILED
//! ```
//!
//! There is no way back to `IDLE`; an idle order is cancelled by dropping it.
//! Settlement is awaited through an injectable [`SettlementVenue`], and time
//! is read through an injectable [`Clock`], so tests drive both
//! deterministically.

pub mod clock;
pub mod config;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod order;
pub mod quote_lock;
pub mod venue;

pub use clock::{Clock, SettlementTimer, SystemClock, TokioTimer};
pub use config::{ExecutionConfig, DEFAULT_FEE_RATE};
pub use error::{ExecutionError, ExecutionResult};
pub use executor::TradeExecutor;
pub use metrics::{ExecutionMetrics, MetricsSnapshot, SharedMetrics};
pub use order::{
    ExecutionSnapshot, FailureCode, OrderStatus, TradeDirection, TradeFailure, TradeOrder,
    TradeReceipt,
};
pub use quote_lock::{QuoteLock, DEFAULT_SLIPPAGE_TOLERANCE};
pub use venue::{SettlementVenue, SimulatedVenue};

#[cfg(any(test, feature = "test-utils"))]
pub use clock::ManualClock;
#[cfg(any(test, feature = "test-utils"))]
pub use venue::RejectingVenue;
