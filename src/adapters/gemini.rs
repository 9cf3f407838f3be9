//! Gemini `generateContent` client.

use crate::config::GeminiConfig;
use crate::domain::ports::LlmClient;
use crate::utils::error::{Result, StudioError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(StudioError::LlmNotConfigured);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(&self, prompt: &str) -> GenerateContentRequest {
        let generation_config = if self.temperature.is_some() || self.max_output_tokens.is_some() {
            Some(GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate_content(&self, prompt: &str) -> Result<String> {
        tracing::debug!("Sending {} prompt chars to {}", prompt.len(), self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Gemini API error: {} - {}", status, body);
            return Err(StudioError::LlmError {
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            tracing::debug!(
                "Gemini usage - prompt: {:?} tokens, response: {:?} tokens",
                usage.prompt_token_count,
                usage.candidates_token_count
            );
        }

        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| StudioError::LlmError {
            message: "No candidates in response".to_string(),
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(StudioError::LlmError {
                message: format!(
                    "Empty candidate (finish reason: {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config_for(server: &MockServer) -> GeminiConfig {
        GeminiConfig {
            base_url: server.url("/v1beta/models"),
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let err = GeminiClient::new(&GeminiConfig::default(), "  ".to_string()).unwrap_err();
        assert!(matches!(err, StudioError::LlmNotConfigured));
    }

    #[tokio::test]
    async fn test_generate_content_joins_parts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-1.5-flash:generateContent")
                .query_param("key", "secret")
                .json_body_partial(r#"{"contents":[{"parts":[{"text":"hello"}]}]}"#);
            then.status(200).json_body(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Hi "}, {"text": "there"}], "role": "model"},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 1, "candidatesTokenCount": 2}
            }));
        });

        let client = GeminiClient::new(&config_for(&server), "secret".to_string()).unwrap();
        let text = client.generate_content("hello").await.unwrap();

        mock.assert();
        assert_eq!(text, "Hi there");
        assert_eq!(client.model_name(), "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_generation_config_is_sent_when_set() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .json_body_partial(r#"{"generationConfig":{"temperature":0.5,"maxOutputTokens":64}}"#);
            then.status(200).json_body(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            }));
        });

        let mut config = config_for(&server);
        config.temperature = Some(0.5);
        config.max_output_tokens = Some(64);
        let client = GeminiClient::new(&config, "k".to_string()).unwrap();
        assert_eq!(client.generate_content("x").await.unwrap(), "ok");
        mock.assert();
    }

    #[tokio::test]
    async fn test_http_error_carries_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(403).body("API key invalid");
        });

        let client = GeminiClient::new(&config_for(&server), "bad".to_string()).unwrap();
        let err = client.generate_content("x").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("API key invalid"));
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(serde_json::json!({"candidates": []}));
        });

        let client = GeminiClient::new(&config_for(&server), "k".to_string()).unwrap();
        let err = client.generate_content("x").await.unwrap_err();
        assert!(err.to_string().contains("No candidates"));
    }

    #[tokio::test]
    async fn test_blocked_candidate_without_content() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200)
                .json_body(serde_json::json!({"candidates": [{"finishReason": "SAFETY"}]}));
        });

        let client = GeminiClient::new(&config_for(&server), "k".to_string()).unwrap();
        let err = client.generate_content("x").await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
