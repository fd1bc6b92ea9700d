//! Advisory client with fallback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use railwise_common::{Currency, Money};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::config::AdvisoryConfig;
use crate::error::AdvisoryResult;
use crate::opinion::AdvisoryOpinion;
use crate::transport::{AdvisoryTransport, GeminiTransport};

/// Fixed market context sent with every request.
const MARKET_SNAPSHOT: &str = "- USD/IDR Spot: 16,500\n\
                               - Trend: IDR weakening slightly due to global bond yields.";

/// Requests opinions and never fails the caller.
///
/// The credential gates every request: without one the transport is never
/// touched, whatever transport the client holds.
pub struct AdvisoryClient {
    configured: bool,
    transport: Option<Arc<dyn AdvisoryTransport>>,
    fallbacks: AtomicU64,
}

impl AdvisoryClient {
    /// Client over an explicit transport, gated by `config`'s credential.
    pub fn with_transport(config: &AdvisoryConfig, transport: Arc<dyn AdvisoryTransport>) -> Self {
        Self {
            configured: config.is_configured(),
            transport: Some(transport),
            fallbacks: AtomicU64::new(0),
        }
    }

    /// Client that never sends anything.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            transport: None,
            fallbacks: AtomicU64::new(0),
        }
    }

    /// Build from configuration, using the Gemini transport when a
    /// credential is present.
    pub fn from_config(config: &AdvisoryConfig) -> AdvisoryResult<Self> {
        if !config.is_configured() {
            return Ok(Self::unconfigured());
        }

        let transport = GeminiTransport::from_config(config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn is_configured(&self) -> bool {
        self.configured && self.transport.is_some()
    }

    /// Number of fallback opinions served so far.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Ask for an opinion on converting `principal` domestic units.
    ///
    /// Sends at most one request and never retries. Without a credential the
    /// unconfigured opinion is returned; any failure of the request, including
    /// an empty or malformed reply, returns the degraded opinion.
    #[instrument(skip(self), fields(principal = %principal))]
    pub async fn request_opinion(&self, principal: Decimal) -> AdvisoryOpinion {
        let Some(transport) = self.transport.as_ref().filter(|_| self.configured) else {
            warn!("No advisory credential configured, serving fallback opinion");
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
            return AdvisoryOpinion::unconfigured();
        };

        let prompt = build_prompt(principal);
        let outcome = match transport.generate(&prompt).await {
            Ok(text) => AdvisoryOpinion::from_reply(&text),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(opinion) => {
                info!(
                    transport = transport.name(),
                    sentiment = %opinion.sentiment,
                    "Advisory opinion received"
                );
                opinion
            }
            Err(e) => {
                warn!(
                    transport = transport.name(),
                    error = %e,
                    code = e.error_code(),
                    "Advisory request failed, serving fallback opinion"
                );
                self.fallbacks.fetch_add(1, Ordering::Relaxed);
                AdvisoryOpinion::degraded()
            }
        }
    }
}

fn build_prompt(principal: Decimal) -> String {
    let amount = Money::new(principal, Currency::idr()).grouped();
    format!(
        "You are a Senior FX Treasury Analyst. The user is planning to convert {amount} to USD.\n\
         \n\
         Current Market Snapshot (Mock Data):\n\
         {MARKET_SNAPSHOT}\n\
         \n\
         Provide a JSON response with:\n\
         1. Sentiment (BULLISH, BEARISH, NEUTRAL) regarding the USD (is USD getting stronger?).\n\
         2. A concise 1-sentence summary of the market.\n\
         3. A strategic recommendation for this specific transaction size.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opinion::{OpinionSource, Sentiment};
    use crate::transport::MockTransport;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn keyed_config(api_key: Option<&str>) -> AdvisoryConfig {
        AdvisoryConfig {
            api_key: api_key.map(str::to_string),
            ..AdvisoryConfig::default()
        }
    }

    fn client_with(mock: &Arc<MockTransport>) -> AdvisoryClient {
        AdvisoryClient::with_transport(&keyed_config(Some("test-key")), mock.clone())
    }

    #[tokio::test]
    async fn test_unconfigured_sends_nothing() {
        let config = AdvisoryConfig::default();
        let client = AdvisoryClient::from_config(&config).unwrap();

        let opinion = client.request_opinion(dec!(100000000)).await;
        assert_eq!(opinion, AdvisoryOpinion::unconfigured());
        assert!(!client.is_configured());
        assert_eq!(client.fallback_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_never_reaches_transport() {
        for api_key in [None, Some(""), Some("   ")] {
            let mock = Arc::new(MockTransport::replying(
                r#"{"sentiment":"BULLISH","summary":"s","recommendation":"r"}"#,
            ));
            let client = AdvisoryClient::with_transport(&keyed_config(api_key), mock.clone());

            let opinion = client.request_opinion(dec!(100000000)).await;
            assert_eq!(opinion, AdvisoryOpinion::unconfigured(), "key: {api_key:?}");
            assert!(!client.is_configured());
            assert_eq!(mock.calls(), 0);
            assert!(mock.last_prompt().is_none());
        }
    }

    #[tokio::test]
    async fn test_live_opinion() {
        let mock = Arc::new(MockTransport::replying(
            r#"{"sentiment":"BEARISH","summary":"USD easing.","recommendation":"Convert now."}"#,
        ));
        let client = client_with(&mock);

        let opinion = client.request_opinion(dec!(100000000)).await;
        assert_eq!(opinion.sentiment, Sentiment::Bearish);
        assert_eq!(opinion.recommendation, "Convert now.");
        assert_eq!(opinion.source, OpinionSource::Live);
        assert_eq!(mock.calls(), 1);
        assert_eq!(client.fallback_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_carries_principal_and_snapshot() {
        let mock = Arc::new(MockTransport::failing("offline"));
        let client = client_with(&mock);

        client.request_opinion(dec!(100000000)).await;
        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains("100,000,000 IDR"));
        assert!(prompt.contains("USD/IDR Spot: 16,500"));
        assert!(prompt.contains("global bond yields"));
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_without_retry() {
        let mock = Arc::new(MockTransport::failing("connection reset"));
        let client = client_with(&mock);

        let opinion = client.request_opinion(dec!(100000000)).await;
        assert_eq!(opinion, AdvisoryOpinion::degraded());
        assert_eq!(mock.calls(), 1);
        assert_eq!(client.fallback_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_replies_degrade() {
        for reply in [
            "",
            "not json",
            r#"{"sentiment":"NEUTRAL","summary":"s"}"#,
            r#"{"sentiment":"NEUTRAL","summary":"s","recommendation":"r","extra":1}"#,
        ] {
            let mock = Arc::new(MockTransport::replying(reply));
            let client = client_with(&mock);

            let opinion = client.request_opinion(dec!(5000000)).await;
            assert_eq!(opinion.source, OpinionSource::Degraded, "reply: {reply}");
            assert_eq!(mock.calls(), 1);
        }
    }

    proptest! {
        #[test]
        fn prop_blank_credential_sends_nothing(
            principal in any::<i64>(),
            scale in 0u32..=6,
            api_key in prop_oneof![Just(None), "[ \t]{0,4}".prop_map(Some)],
        ) {
            let mock = Arc::new(MockTransport::failing("unreachable"));
            let client = AdvisoryClient::with_transport(&keyed_config(api_key.as_deref()), mock.clone());

            let opinion = tokio_test::block_on(client.request_opinion(Decimal::new(principal, scale)));
            prop_assert_eq!(opinion.sentiment, Sentiment::Neutral);
            prop_assert_eq!(opinion.source, OpinionSource::Unconfigured);
            prop_assert_eq!(mock.calls(), 0);
        }
    }
}
