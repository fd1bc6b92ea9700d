//! Railwise Advisory
//!
//! Asks an external text-generation service for a short market opinion on a
//! planned conversion. The caller always gets an opinion back: without a
//! credential a fixed "unconfigured" opinion is returned and nothing is sent,
//! and any failure of a live request yields a fixed "degraded" opinion.

pub mod client;
pub mod config;
pub mod error;
pub mod opinion;
pub mod transport;

pub use client::AdvisoryClient;
pub use config::AdvisoryConfig;
pub use error::{AdvisoryError, AdvisoryResult};
pub use opinion::{AdvisoryOpinion, OpinionSource, Sentiment};
pub use transport::{AdvisoryTransport, GeminiTransport};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;
