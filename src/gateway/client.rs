//! HTTP client for the inference gateway, plus mock ports for tests.
//!
//! One `FoundryClient` serves both capability ports: vision requests go to
//! the Gemini-style `generateContent` endpoint, text requests to the
//! OpenAI-style `chat/completions` endpoint. Transient transport failures
//! (connect, timeout) are retried with exponential backoff; errors the
//! service itself reports are returned as-is.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::*;
use super::GatewayError;
use crate::config::PipelineConfig;

/// Production gateway client implementing both ports.
pub struct FoundryClient {
    base_url: String,
    vision_model: String,
    text_model: String,
    client: reqwest::Client,
    timeout_secs: u64,
    transient_retries: u32,
    retry_base_delay_ms: u64,
}

impl FoundryClient {
    pub fn new(config: &PipelineConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.gateway_base_url.trim_end_matches('/').to_string(),
            vision_model: config.vision_model.clone(),
            text_model: config.text_model.clone(),
            client,
            timeout_secs: config.request_timeout_secs,
            transient_retries: config.transient_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
        }
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_connect() {
            GatewayError::NotReachable(self.base_url.clone())
        } else if e.is_timeout() {
            GatewayError::Timeout(self.timeout_secs)
        } else {
            GatewayError::Http(e.to_string())
        }
    }

    /// POST a JSON body and decode a typed response, retrying transient
    /// transport failures with exponential backoff.
    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, GatewayError> {
        let mut attempt: u32 = 0;
        loop {
            let result = self.client.post(url).json(body).send().await;

            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    let mapped = self.classify_transport_error(e);
                    if mapped.is_transient() && attempt < self.transient_retries {
                        let delay = self.retry_base_delay_ms << attempt;
                        tracing::debug!(
                            url,
                            attempt,
                            delay_ms = delay,
                            error = %mapped,
                            "Transient gateway failure, retrying"
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(mapped);
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(GatewayError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            return response
                .json::<R>()
                .await
                .map_err(|e| GatewayError::MalformedResponse(e.to_string()));
        }
    }
}

#[async_trait]
impl VisionClient for FoundryClient {
    async fn generate(
        &self,
        instruction: &str,
        payload: &[u8],
        media_type: &str,
    ) -> Result<String, GatewayError> {
        let url = format!(
            "{}/gemini/v1beta/models/{}:generateContent",
            self.base_url, self.vision_model
        );
        let encoded = base64::engine::general_purpose::STANDARD.encode(payload);
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text {
                        text: instruction.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: media_type.to_string(),
                            data: encoded,
                        },
                    },
                ],
            }],
        };

        let parsed: GenerateContentResponse = self.post_json(&url, &request).await?;
        if let Some(error) = parsed.error {
            return Err(GatewayError::ErrorPayload(error.describe()));
        }
        Ok(parsed.first_text().unwrap_or_default().to_string())
    }
}

#[async_trait]
impl TextClient for FoundryClient {
    async fn complete(&self, instruction: &str) -> Result<String, GatewayError> {
        let url = format!("{}/openai/v1/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: self.text_model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: instruction.to_string(),
            }],
            temperature: 0.0,
            max_tokens: 4096,
        };

        let parsed: ChatCompletionResponse = self.post_json(&url, &request).await?;
        if let Some(error) = parsed.error {
            return Err(GatewayError::ErrorPayload(error.describe()));
        }
        Ok(parsed.first_text().unwrap_or_default().to_string())
    }
}

// ──────────────────────────────────────────────
// Mock ports (testing)
// ──────────────────────────────────────────────

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock vision port: a default response plus per-payload overrides and
/// per-payload artificial latency, for completion-order tests.
pub struct MockVisionClient {
    default_response: Result<String, GatewayError>,
    by_payload: HashMap<Vec<u8>, Result<String, GatewayError>>,
    delay_by_payload: HashMap<Vec<u8>, Duration>,
    calls: AtomicUsize,
}

impl MockVisionClient {
    pub fn new(response: &str) -> Self {
        Self {
            default_response: Ok(response.to_string()),
            by_payload: HashMap::new(),
            delay_by_payload: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            default_response: Err(error),
            by_payload: HashMap::new(),
            delay_by_payload: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response_for(mut self, payload: &[u8], response: Result<String, GatewayError>) -> Self {
        self.by_payload.insert(payload.to_vec(), response);
        self
    }

    pub fn with_delay_for(mut self, payload: &[u8], delay_ms: u64) -> Self {
        self.delay_by_payload
            .insert(payload.to_vec(), Duration::from_millis(delay_ms));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionClient for MockVisionClient {
    async fn generate(
        &self,
        _instruction: &str,
        payload: &[u8],
        _media_type: &str,
    ) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay_by_payload.get(payload) {
            tokio::time::sleep(*delay).await;
        }
        self.by_payload
            .get(payload)
            .unwrap_or(&self.default_response)
            .clone()
    }
}

/// Mock text port with a fixed response and call counting.
pub struct MockTextClient {
    response: Result<String, GatewayError>,
    calls: AtomicUsize,
}

impl MockTextClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextClient for MockTextClient {
    async fn complete(&self, _instruction: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let config = PipelineConfig::with_gateway("http://localhost:9999/");
        let client = FoundryClient::new(&config);
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn client_keeps_configured_models() {
        let client = FoundryClient::new(&PipelineConfig::default());
        assert_eq!(client.vision_model, "gemini-1.5-pro-latest");
        assert_eq!(client.text_model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn mock_vision_returns_default_response() {
        let mock = MockVisionClient::new("Passport");
        let text = mock.generate("classify", b"img", "image/png").await.unwrap();
        assert_eq!(text, "Passport");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn mock_vision_per_payload_override() {
        let mock = MockVisionClient::new("default")
            .with_response_for(b"special", Ok("override".to_string()));
        assert_eq!(
            mock.generate("x", b"special", "image/png").await.unwrap(),
            "override"
        );
        assert_eq!(
            mock.generate("x", b"other", "image/png").await.unwrap(),
            "default"
        );
    }

    #[tokio::test]
    async fn mock_vision_failure() {
        let mock = MockVisionClient::failing(GatewayError::ErrorPayload("down".into()));
        let err = mock.generate("x", b"img", "image/png").await.unwrap_err();
        assert_eq!(err, GatewayError::ErrorPayload("down".into()));
    }

    #[tokio::test]
    async fn mock_text_counts_calls() {
        let mock = MockTextClient::new("**Summary**");
        mock.complete("summarize").await.unwrap();
        mock.complete("summarize").await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }
}
