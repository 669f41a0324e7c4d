//! Gemini image model over the `generateContent` REST endpoint.
//!
//! Text and inline image parts go in a single user turn; the first response
//! part carrying `inlineData` is the generated image.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ImageBackend, RemoteImage, RemoteRequest};
use crate::config::{resolve_env_var, RemoteConfig};
use crate::error::{TierError, TierResult};

const BACKEND: &str = "gemini";

/// Gemini image generation client.
pub struct GeminiBackend {
    api_key: String,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// Build from config; fails with `Configuration` when the key is absent.
    pub fn from_config(config: &RemoteConfig, timeout: Duration) -> TierResult<Self> {
        let api_key = resolve_env_var(&config.api_key).ok_or_else(|| TierError::Configuration {
            backend: BACKEND.to_string(),
            message: format!("API key not set ({})", config.api_key),
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TierError::remote(BACKEND, format!("HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

// --- Request types ---

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// First part with embedded image data, across all candidates.
    fn into_first_image(self) -> Option<InlineData> {
        self.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.inline_data)
    }
}

#[async_trait]
impl ImageBackend for GeminiBackend {
    fn name(&self) -> &str {
        BACKEND
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &RemoteRequest) -> TierResult<RemoteImage> {
        let mut parts = vec![RequestPart::Text {
            text: &request.instruction,
        }];
        if let Some(image) = &request.image {
            parts.push(RequestPart::Inline {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                },
            });
        }
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
        };

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TierError::remote(BACKEND, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(TierError::RemoteService {
                backend: BACKEND.to_string(),
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| TierError::remote(BACKEND, format!("invalid response: {e}")))?;

        let block_reason = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone());
        let inline = parsed.into_first_image().ok_or_else(|| {
            let reason = block_reason
                .map(|r| format!("response blocked ({r})"))
                .unwrap_or_else(|| "response contained no image part".to_string());
            TierError::remote(BACKEND, reason)
        })?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| TierError::remote(BACKEND, format!("undecodable image data: {e}")))?;
        if bytes.is_empty() {
            return Err(TierError::remote(BACKEND, "image part was empty"));
        }

        Ok(RemoteImage {
            bytes,
            mime_type: inline.mime_type,
            model: self.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::ImageInput;
    use mockito::Matcher;
    use serde_json::json;

    const MODEL: &str = "gemini-2.5-flash-image-preview";

    fn backend(server: &mockito::Server) -> GeminiBackend {
        let config = RemoteConfig {
            endpoint: server.url(),
            api_key: "test-key".to_string(),
            model: MODEL.to_string(),
        };
        GeminiBackend::from_config(&config, Duration::from_secs(5)).unwrap()
    }

    fn path() -> String {
        format!("/models/{MODEL}:generateContent")
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let config = RemoteConfig {
            api_key: "${BRANDMARK_TEST_UNSET_GEMINI_KEY}".to_string(),
            ..RemoteConfig::default()
        };
        let err = GeminiBackend::from_config(&config, Duration::from_secs(1))
            .err()
            .unwrap();
        assert_eq!(err.kind(), "unconfigured");
    }

    #[tokio::test]
    async fn test_text_request_returns_first_image_part() {
        let mut server = mockito::Server::new_async().await;
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"png-bytes");
        let mock = server
            .mock("POST", path().as_str())
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"parts": [{"text": "draw a cloud"}]}]
            })))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{"content": {"parts": [
                        {"text": "Here is your logo"},
                        {"inlineData": {"mimeType": "image/png", "data": encoded}},
                        {"inlineData": {"mimeType": "image/png", "data": "c2Vjb25k"}}
                    ]}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let image = backend(&server)
            .generate(&RemoteRequest {
                instruction: "draw a cloud".to_string(),
                image: None,
            })
            .await
            .unwrap();
        assert_eq!(image.bytes, b"png-bytes");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.model, MODEL);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_image_request_sends_inline_data() {
        let mut server = mockito::Server::new_async().await;
        let input = ImageInput::from_bytes(b"source");
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"edited");
        let mock = server
            .mock("POST", path().as_str())
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"parts": [
                    {"text": "edit it"},
                    {"inlineData": {"mimeType": input.mime_type, "data": input.data}}
                ]}]
            })))
            .with_status(200)
            .with_body(
                json!({"candidates": [{"content": {"parts": [
                    {"inlineData": {"mimeType": "image/webp", "data": encoded}}
                ]}}]})
                .to_string(),
            )
            .create_async()
            .await;

        let image = backend(&server)
            .generate(&RemoteRequest {
                instruction: "edit it".to_string(),
                image: Some(input.clone()),
            })
            .await
            .unwrap();
        assert_eq!(image.bytes, b"edited");
        assert_eq!(image.mime_type, "image/webp");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_text_only_response_is_remote_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", path().as_str())
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"I cannot draw"}]}}]}"#)
            .create_async()
            .await;

        let err = backend(&server)
            .generate(&RemoteRequest {
                instruction: "x".to_string(),
                image: None,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no image part"));
        assert_eq!(err.kind(), "remote");
    }

    #[tokio::test]
    async fn test_blocked_prompt_reports_reason() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", path().as_str())
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let err = backend(&server)
            .generate(&RemoteRequest {
                instruction: "x".to_string(),
                image: None,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_auth_failure_carries_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", path().as_str())
            .with_status(403)
            .with_body(r#"{"error":{"message":"API key not valid"}}"#)
            .create_async()
            .await;

        let err = backend(&server)
            .generate(&RemoteRequest {
                instruction: "x".to_string(),
                image: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "auth");
    }
}
