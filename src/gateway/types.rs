//! Wire contract of the inference gateway and the two capability ports.
//!
//! The gateway proxies two upstream APIs: a Gemini-style
//! `generateContent` endpoint for vision understanding and an
//! OpenAI-style `chat/completions` endpoint for text understanding.
//! Transport and auth details stay behind these types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::GatewayError;

// ──────────────────────────────────────────────
// Capability ports
// ──────────────────────────────────────────────

/// Vision-understanding call: instruction + image/PDF payload → generated
/// text. Used by the classifier and the field extractor.
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn generate(
        &self,
        instruction: &str,
        payload: &[u8],
        media_type: &str,
    ) -> Result<String, GatewayError>;
}

/// Text-understanding call: instruction with embedded structured data →
/// generated text. Used by the summary synthesizer.
#[async_trait]
pub trait TextClient: Send + Sync {
    async fn complete(&self, instruction: &str) -> Result<String, GatewayError>;
}

// ──────────────────────────────────────────────
// Vision endpoint (generateContent)
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// A request part: either instruction text or an inline binary payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded document bytes.
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// First candidate's text, if the response carried any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

// ──────────────────────────────────────────────
// Text endpoint (chat/completions)
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// 0.0 for deterministic summarization.
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

// ──────────────────────────────────────────────
// Shared error payload
// ──────────────────────────────────────────────

/// Error object both upstream APIs embed in an otherwise-200 response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub code: Option<i64>,
}

impl ApiErrorBody {
    pub fn describe(&self) -> String {
        match (&self.message, self.code) {
            (Some(message), _) => message.clone(),
            (None, Some(code)) => format!("error code {code}"),
            (None, None) => "unspecified service error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vision_request_serializes_text_and_inline_data_parts() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".into(),
                parts: vec![
                    Part::Text {
                        text: "identify this".into(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".into(),
                            data: "QUJD".into(),
                        },
                    },
                ],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "identify this");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
    }

    #[test]
    fn vision_response_first_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Passport"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.first_text(), Some("Passport"));
        assert!(response.error.is_none());
    }

    #[test]
    fn vision_response_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn vision_response_with_error_payload() {
        let raw = r#"{"error":{"message":"invalid image","code":400}}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.error.unwrap().describe(), "invalid image");
    }

    #[test]
    fn chat_response_first_text() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"**Summary**"}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.first_text(), Some("**Summary**"));
    }

    #[test]
    fn error_body_describe_fallbacks() {
        let only_code = ApiErrorBody {
            message: None,
            code: Some(503),
        };
        assert_eq!(only_code.describe(), "error code 503");

        let neither = ApiErrorBody {
            message: None,
            code: None,
        };
        assert_eq!(neither.describe(), "unspecified service error");
    }
}
