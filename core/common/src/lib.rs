//! Railwise Common Types
//!
//! This crate contains shared types used across the Railwise workspace,
//! including identifiers, monetary types, timing constants and the
//! workspace-level error type.

pub mod identifiers;
pub mod monetary;
pub mod error;
pub mod time;

pub use identifiers::*;
pub use monetary::*;
pub use error::*;
pub use time::*;
