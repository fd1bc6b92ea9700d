//! Advisory opinions and the fixed fallbacks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisoryError, AdvisoryResult};

/// Direction the service expects the foreign currency to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Bullish, Sentiment::Bearish, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "BULLISH",
            Sentiment::Bearish => "BEARISH",
            Sentiment::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an opinion came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpinionSource {
    /// Parsed from a live service reply.
    #[default]
    Live,
    /// No credential was configured.
    Unconfigured,
    /// The live request failed.
    Degraded,
}

/// A short market opinion on a planned conversion.
///
/// The wire form has exactly `sentiment`, `summary` and `recommendation`;
/// replies with missing or extra fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdvisoryOpinion {
    pub sentiment: Sentiment,
    pub summary: String,
    pub recommendation: String,
    #[serde(skip)]
    pub source: OpinionSource,
}

impl AdvisoryOpinion {
    /// Opinion returned when no credential is configured.
    pub fn unconfigured() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            summary: "Market volatility is moderate. IDR is trading within expected range \
                      against USD. API key missing for live analysis."
                .to_string(),
            recommendation: "Monitor BCA counter rates closely before executing large volume \
                             transfers."
                .to_string(),
            source: OpinionSource::Unconfigured,
        }
    }

    /// Opinion returned when a live request fails for any reason.
    pub fn degraded() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            summary: "AI Analysis temporarily unavailable. Utilizing standard fallback protocols."
                .to_string(),
            recommendation: "Proceed with the most cost-effective route shown below.".to_string(),
            source: OpinionSource::Degraded,
        }
    }

    /// Parse the JSON text of a service reply.
    pub fn from_reply(text: &str) -> AdvisoryResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AdvisoryError::EmptyReply);
        }

        serde_json::from_str(text).map_err(|e| AdvisoryError::MalformedReply(e.to_string()))
    }

    pub fn is_fallback(&self) -> bool {
        self.source != OpinionSource::Live
    }
}
