//! Railwise Route Optimization Engine
//!
//! Compares settlement rails for converting a domestic-currency principal
//! into a foreign currency.
//!
//! # Features
//!
//! - Fee models for flat, percentage and percentage-plus-network-cost rails
//! - Immutable rail catalog with a designated baseline rail
//! - Ranking by net foreign amount received, deterministic tie-break
//! - Savings of the best rail against the baseline
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use railwise_fx::{Optimizer, RouteCatalog};
//! use rust_decimal_macros::dec;
//!
//! let optimizer = Optimizer::new(Arc::new(RouteCatalog::reference()));
//! let comparison = optimizer.compare(dec!(100_000_000))?;
//! let best = comparison.recommendation()?;
//! let savings = optimizer.savings(&comparison, optimizer.catalog().baseline_id())?;
//! ```

pub mod catalog;
pub mod error;
pub mod fee;
pub mod history;
pub mod optimizer;
pub mod savings;

pub use catalog::{RailType, RouteCatalog, RouteDefinition};
pub use error::{FxError, FxResult};
pub use fee::{FeeBreakdown, FeeModel};
pub use history::{spread_history, SpreadPoint};
pub use optimizer::{CalculationResult, EffectiveRate, Optimizer, RouteComparison};
pub use savings::{calculate_savings, Savings};
