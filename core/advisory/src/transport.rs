//! Transports to the text-generation service.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::AdvisoryConfig;
use crate::error::{AdvisoryError, AdvisoryResult};

/// Sends one prompt and returns the raw reply text.
#[async_trait]
pub trait AdvisoryTransport: Send + Sync {
    /// Transport name for logs.
    fn name(&self) -> &'static str;

    /// Send `prompt` and return the reply's text, which should be the JSON
    /// encoding of an opinion.
    async fn generate(&self, prompt: &str) -> AdvisoryResult<String>;
}

/// Gemini `generateContent` client.
pub struct GeminiTransport {
    client: Client,
    api_key: String,
    url: String,
}

impl GeminiTransport {
    /// Build a transport from `config`.
    ///
    /// Fails if the configuration has no usable credential.
    pub fn from_config(config: &AdvisoryConfig) -> AdvisoryResult<Self> {
        let api_key = config
            .credential()
            .ok_or_else(|| AdvisoryError::Configuration("API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdvisoryError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for GeminiTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiTransport")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Schema constraining the reply to the three opinion fields.
fn opinion_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sentiment": { "type": "STRING", "enum": ["BULLISH", "BEARISH", "NEUTRAL"] },
            "summary": { "type": "STRING" },
            "recommendation": { "type": "STRING" }
        },
        "required": ["sentiment", "summary", "recommendation"]
    })
}

impl Request {
    fn new(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: opinion_schema(),
            },
        }
    }
}

impl Response {
    /// Text of the first part of the first candidate.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[async_trait]
impl AdvisoryTransport for GeminiTransport {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> AdvisoryResult<String> {
        debug!(url = %self.url, "Sending advisory request");

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Request::new(prompt))
            .send()
            .await?
            .error_for_status()?
            .json::<Response>()
            .await?;

        response.into_text().ok_or(AdvisoryError::EmptyReply)
    }
}

/// Scripted transport that counts calls.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockTransport {
    reply: Result<String, String>,
    calls: std::sync::atomic::AtomicUsize,
    last_prompt: parking_lot::Mutex<Option<String>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// Answer every request with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(Ok(text.into()))
    }

    /// Fail every request with a transport error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_reply(Err(reason.into()))
    }

    fn with_reply(reply: Result<String, String>) -> Self {
        Self {
            reply,
            calls: std::sync::atomic::AtomicUsize::new(0),
            last_prompt: parking_lot::Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl AdvisoryTransport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> AdvisoryResult<String> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.to_string());
        self.reply.clone().map_err(AdvisoryError::Transport)
    }
}
