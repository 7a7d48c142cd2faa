//! Gemini API client implementation
//!
//! Implements LlmClient over the `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::client::LlmClient;
use super::types::{CompletionRequest, CompletionResponse, Usage};
use crate::error::{AgentError, Result};

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default API root
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub endpoint: String,
    pub api_key_env: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a client reading the key from `config.api_key_env`
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::MissingCredential {
                env_var: config.api_key_env.clone(),
            })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: impl Into<String>, config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        )
    }

    fn build_request(prompt: &str) -> Value {
        json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        })
    }

    /// Reply text is the first text part of the first candidate
    fn parse_response(body: &Value) -> Result<CompletionResponse> {
        if let Some(message) = body["error"]["message"].as_str() {
            return Err(AgentError::Llm(format!("API error: {}", message)));
        }

        let parts = body["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| {
                let reason = body["candidates"][0]["finishReason"]
                    .as_str()
                    .or_else(|| body["promptFeedback"]["blockReason"].as_str())
                    .unwrap_or("no candidates");
                AgentError::Llm(format!("Empty response: {}", reason))
            })?;

        let content = parts
            .iter()
            .find_map(|p| p["text"].as_str())
            .ok_or_else(|| AgentError::Llm("Empty response: no text part".to_string()))?
            .to_string();

        let meta = &body["usageMetadata"];
        let usage = Usage::new(
            meta["promptTokenCount"].as_u64().unwrap_or(0),
            meta["candidatesTokenCount"].as_u64().unwrap_or(0),
        );

        Ok(CompletionResponse { content, usage })
    }

    async fn send_request(&self, model: &str, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.url(model))
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Llm(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(AgentError::Llm("Rate limited by Gemini API".to_string()));
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::Llm(format!("API error {}: {}", status, error_body)));
        }

        response
            .json()
            .await
            .map_err(|e| AgentError::Llm(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = &self.config.model;
        log::debug!("Sending {} byte prompt to {}", request.prompt.len(), model);
        let body = Self::build_request(&request.prompt);
        let response = self.send_request(model, body).await?;
        Self::parse_response(&response)
    }
}

// Keep the key out of debug output
impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("endpoint", &self.config.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::with_api_key("test-key", GeminiConfig::default()).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.api_key_env, "GOOGLE_API_KEY");
    }

    #[test]
    fn test_url() {
        assert_eq!(
            client().url("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_build_request() {
        let body = GeminiClient::build_request("pick a tool");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "pick a tool");
    }

    #[test]
    fn test_parse_response_text_and_usage() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"mcp_server\": null}"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 30}
        });

        let response = GeminiClient::parse_response(&body).unwrap();
        assert_eq!(response.content, "{\"mcp_server\": null}");
        assert_eq!(response.usage, Usage::new(120, 30));
    }

    #[test]
    fn test_parse_response_reads_first_text_part_only() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"thought": true}, {"text": "first"}, {"text": " second"}]}},
                {"content": {"parts": [{"text": "other candidate"}]}}
            ]
        });

        let response = GeminiClient::parse_response(&body).unwrap();
        assert_eq!(response.content, "first");
    }

    #[test]
    fn test_parse_response_blocked() {
        let body = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = GeminiClient::parse_response(&body).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_parse_response_api_error() {
        let body = json!({"error": {"code": 400, "message": "API key not valid"}});
        let err = GeminiClient::parse_response(&body).unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_missing_credential() {
        let config = GeminiConfig {
            api_key_env: "TOOLPICK_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        match GeminiClient::new(config) {
            Err(AgentError::MissingCredential { env_var }) => {
                assert_eq!(env_var, "TOOLPICK_TEST_KEY_THAT_IS_NEVER_SET")
            }
            other => panic!("Expected MissingCredential, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("test-key"));
    }
}
