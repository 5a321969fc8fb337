//! GroqOracle implementation using an OpenAI-compatible API.

use oracle_core::{async_trait, OracleError, TextOracle};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::GroqOracleConfig;

/// A text oracle backed by Groq's chat-completions API.
///
/// Each call is a fresh two-message conversation; the oracle keeps no
/// history of its own.
pub struct GroqOracle {
    client: Client,
    config: GroqOracleConfig,
}

impl GroqOracle {
    /// Create a new GroqOracle with the given configuration.
    pub fn new(config: GroqOracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                OracleError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "GroqOracle initialized with model: {}, endpoint: {}",
            config.model,
            config.completions_url()
        );

        Ok(Self { client, config })
    }

    /// Create a GroqOracle from environment variables.
    ///
    /// See [`GroqOracleConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, OracleError> {
        Self::new(GroqOracleConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GroqOracleConfig {
        &self.config
    }

    async fn chat_completion(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<ChatCompletionResponse, OracleError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: [ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(self.config.timeout)
                } else {
                    OracleError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let detail = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);
            warn!(status = status.as_u16(), error = %detail, "GROQ_REQUEST_REJECTED");

            return Err(OracleError::RequestFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                detail
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        debug!(
            model = %completion.model,
            total_tokens = completion.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0),
            "Received completion"
        );

        Ok(completion)
    }
}

#[async_trait]
impl TextOracle for GroqOracle {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, OracleError> {
        let completion = self.chat_completion(system_prompt, user_prompt).await?;

        completion
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| OracleError::InvalidResponse("No content in response".to_string()))
    }

    fn name(&self) -> &str {
        "GroqOracle"
    }

    async fn is_ready(&self) -> bool {
        !self.config.api_key.trim().is_empty() && !self.config.api_url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_readiness_follows_credentials() {
        let oracle = GroqOracle::new(GroqOracleConfig::default()).unwrap();
        assert!(!oracle.is_ready().await);

        let oracle = GroqOracle::new(GroqOracleConfig::builder().api_key("key").build()).unwrap();
        assert!(oracle.is_ready().await);
        assert_eq!(oracle.name(), "GroqOracle");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let config = GroqOracleConfig::builder()
            .api_key("key")
            .api_url("http://127.0.0.1:9/v1")
            .timeout(std::time::Duration::from_secs(2))
            .build();
        let oracle = GroqOracle::new(config).unwrap();

        let result = oracle.complete("sys", "hola").await;
        assert!(matches!(
            result,
            Err(OracleError::Network(_)) | Err(OracleError::Timeout(_))
        ));
    }
}
