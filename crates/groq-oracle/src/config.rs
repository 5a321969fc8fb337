//! Configuration for GroqOracle.

use std::env;
use std::time::Duration;

use oracle_core::OracleError;

/// Configuration for GroqOracle.
#[derive(Debug, Clone)]
pub struct GroqOracleConfig {
    /// Base URL of the OpenAI-compatible API, including the version segment.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for GroqOracleConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: Some(1024),
            temperature: Some(0.3),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GroqOracleConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GROQ_API_KEY` - API key for authentication
    /// - `AISERVER` - Base URL of the API (e.g. https://api.groq.com/openai/v1)
    ///
    /// Optional environment variables:
    /// - `GROQ_MODEL` - Model name (default: llama-3.3-70b-versatile)
    /// - `GROQ_MAX_TOKENS` - Max tokens (default: 1024)
    /// - `GROQ_TEMPERATURE` - Temperature (default: 0.3)
    /// - `GROQ_TIMEOUT_SECS` - HTTP timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, OracleError> {
        let api_key = non_empty_var("GROQ_API_KEY");
        let api_url = non_empty_var("AISERVER");

        let (api_key, api_url) = match (api_key, api_url) {
            (Some(key), Some(url)) => (key, url),
            (key, url) => {
                let mut missing = Vec::new();
                if key.is_none() {
                    missing.push("GROQ_API_KEY");
                }
                if url.is_none() {
                    missing.push("AISERVER");
                }
                return Err(OracleError::Configuration(format!(
                    "missing API settings: {}",
                    missing.join(", ")
                )));
            }
        };

        let defaults = Self::default();

        let model = env::var("GROQ_MODEL").unwrap_or(defaults.model);

        let max_tokens = env::var("GROQ_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("GROQ_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let timeout = env::var("GROQ_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Ok(Self {
            api_url,
            api_key,
            model,
            max_tokens,
            temperature,
            timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GroqOracleConfigBuilder {
        GroqOracleConfigBuilder::default()
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Builder for GroqOracleConfig.
#[derive(Debug, Default)]
pub struct GroqOracleConfigBuilder {
    config: GroqOracleConfig,
}

impl GroqOracleConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GroqOracleConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GroqOracleConfig::default();

        assert_eq!(config.api_url, "https://api.groq.com/openai/v1");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.max_tokens, Some(1024));
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_all_options() {
        let config = GroqOracleConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com/v1/")
            .model("llama-3.1-8b-instant")
            .max_tokens(512)
            .temperature(0.0)
            .timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.temperature, Some(0.0));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.completions_url(),
            "https://custom.api.com/v1/chat/completions"
        );
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            std::env::remove_var("GROQ_API_KEY");
            std::env::remove_var("AISERVER");
            std::env::remove_var("GROQ_MODEL");
            std::env::remove_var("GROQ_MAX_TOKENS");
            std::env::remove_var("GROQ_TEMPERATURE");
            std::env::remove_var("GROQ_TIMEOUT_SECS");
        }

        // Scenario 1: Nothing set names both variables
        clear_all_vars();
        match GroqOracleConfig::from_env() {
            Err(OracleError::Configuration(msg)) => {
                assert!(msg.contains("GROQ_API_KEY"));
                assert!(msg.contains("AISERVER"));
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Scenario 2: Blank server counts as missing
        clear_all_vars();
        std::env::set_var("GROQ_API_KEY", "key");
        std::env::set_var("AISERVER", "  ");
        match GroqOracleConfig::from_env() {
            Err(OracleError::Configuration(msg)) => {
                assert!(!msg.contains("GROQ_API_KEY"));
                assert!(msg.contains("AISERVER"));
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Scenario 3: Required vars set, defaults used
        clear_all_vars();
        std::env::set_var("GROQ_API_KEY", "test-env-key");
        std::env::set_var("AISERVER", "https://api.groq.com/openai/v1");

        let config = GroqOracleConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.max_tokens, Some(1024));
        assert_eq!(config.timeout, Duration::from_secs(30));

        // Scenario 4: All vars set
        std::env::set_var("GROQ_MODEL", "mixtral-8x7b-32768");
        std::env::set_var("GROQ_MAX_TOKENS", "256");
        std::env::set_var("GROQ_TEMPERATURE", "0.9");
        std::env::set_var("GROQ_TIMEOUT_SECS", "7");

        let config = GroqOracleConfig::from_env().unwrap();
        assert_eq!(config.model, "mixtral-8x7b-32768");
        assert_eq!(config.max_tokens, Some(256));
        assert_eq!(config.temperature, Some(0.9));
        assert_eq!(config.timeout, Duration::from_secs(7));

        clear_all_vars();
    }
}
