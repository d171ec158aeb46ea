//! Hosted language model seam.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ModelConfig;

/// Completes a fully rendered prompt.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("language model API key is not configured")]
    MissingApiKey,
    #[error("language model request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("language model returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("language model response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("language model returned no text")]
    EmptyResponse,
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: ModelConfig,
}

impl GeminiClient {
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ModelError::MissingApiKey)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "calling language model");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        parse_response(&body)
    }
}

/// Extracts the reply text from a successful `generateContent` body.
fn parse_response(body: &[u8]) -> Result<String, ModelError> {
    let payload: GenerateContentResponse = serde_json::from_slice(body)?;
    payload.text().ok_or(ModelError::EmptyResponse)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_gemini_field_names() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 512,
            },
        };

        let value = serde_json::to_value(&request).expect("request serializes");

        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 512);
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Expats "},{"text":"need 20%."}]}},{"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .expect("payload parses");

        assert_eq!(payload.text().as_deref(), Some("Expats need 20%."));
    }

    #[test]
    fn blocked_response_has_no_text() {
        let payload: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
                .expect("payload parses");

        assert_eq!(payload.text(), None);
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = parse_response(b"<html>upstream proxy error</html>")
            .expect_err("body is not json");

        assert!(matches!(err, ModelError::Decode(_)));
        assert!(err.to_string().starts_with("language model response could not be decoded"));
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let err = parse_response(br#"{"candidates":"none"}"#).expect_err("candidates not a list");

        assert!(matches!(err, ModelError::Decode(_)));
    }

    #[test]
    fn parsed_body_without_text_is_empty_response() {
        let err = parse_response(br#"{"candidates":[]}"#).expect_err("no candidates");

        assert!(matches!(err, ModelError::EmptyResponse));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let client = GeminiClient::new(ModelConfig {
            api_base: "https://example.test/v1beta/".to_string(),
            ..ModelConfig::default()
        })
        .expect("client builds");

        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-flash-latest:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_sending() {
        let client = GeminiClient::new(ModelConfig::default()).expect("client builds");

        let err = client.complete("hi").await.expect_err("no key configured");

        assert!(matches!(err, ModelError::MissingApiKey));
    }
}
