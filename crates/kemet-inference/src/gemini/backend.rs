//! Gemini HTTP transport.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use kemet_core::{defaults, Error, Result};

use super::types::{GenerateRequest, ModelResponse};

/// A single-attempt generation backend.
///
/// Implementations perform exactly one provider call per `generate`
/// invocation; retry policy belongs to the caller. This is the seam the
/// analyzer's tests plug a scripted backend into.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<ModelResponse>;
}

/// Configuration for the Gemini REST backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// API key; `None` means no credential was found and calls must not
    /// be attempted.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GEMINI_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: defaults::GEN_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Build configuration from the environment.
    ///
    /// The credential is taken from `GOOGLE_API_KEY`, falling back to
    /// `GEMINI_API_KEY`. Blank values count as unset.
    pub fn from_env() -> Self {
        let api_key = read_env(defaults::ENV_GOOGLE_API_KEY)
            .or_else(|| read_env(defaults::ENV_GEMINI_API_KEY));
        let base_url = read_env(defaults::ENV_GEMINI_BASE_URL)
            .unwrap_or_else(|| defaults::GEMINI_BASE_URL.to_string());
        let timeout_secs = read_env(defaults::ENV_GEMINI_TIMEOUT_SECS)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults::GEN_TIMEOUT_SECS);

        Self {
            base_url,
            api_key,
            timeout_secs,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// REST client for the Gemini `generateContent` endpoint.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, config }
    }

    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    #[instrument(skip(self, request), fields(
        subsystem = "inference",
        component = "gemini",
        op = "generate",
        model = %model
    ))]
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<ModelResponse> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            Error::Config("No Google API key found in environment variables".to_string())
        })?;

        // The key rides in the query string; never log the URL.
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            model,
            api_key
        );

        let start = Instant::now();
        debug!(model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Request(format!("Gemini request timeout: {}", e))
                } else {
                    Error::Request(format!("Gemini request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Gemini API error (status {}): {}",
                status.as_u16(),
                body
            )));
        }

        let value: serde_json::Value = response.json().await.map_err(|e| {
            Error::Inference(format!("Failed to read Gemini response body: {}", e))
        })?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(duration_ms = elapsed, "generateContent complete");
        if elapsed > defaults::SLOW_CALL_MS {
            warn!(duration_ms = elapsed, model, slow = true, "Slow generation call");
        }

        Ok(ModelResponse::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert!(config.api_key.is_none());
        assert!(!config.has_credential());
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_backend_construction() {
        let backend = GeminiBackend::new(GeminiConfig {
            base_url: "http://localhost:9999".to_string(),
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
        });
        assert!(backend.config().has_credential());
        assert_eq!(backend.config().timeout_secs, 5);
    }

    // Env-var precedence checks share one test since they mutate process
    // state; nothing else in this crate reads these variables.
    #[test]
    fn test_from_env_credential_precedence() {
        std::env::remove_var(defaults::ENV_GOOGLE_API_KEY);
        std::env::remove_var(defaults::ENV_GEMINI_API_KEY);
        assert!(GeminiConfig::from_env().api_key.is_none());

        std::env::set_var(defaults::ENV_GEMINI_API_KEY, "fallback-key");
        assert_eq!(
            GeminiConfig::from_env().api_key.as_deref(),
            Some("fallback-key")
        );

        std::env::set_var(defaults::ENV_GOOGLE_API_KEY, "primary-key");
        assert_eq!(
            GeminiConfig::from_env().api_key.as_deref(),
            Some("primary-key")
        );

        // Blank primary falls through to the fallback
        std::env::set_var(defaults::ENV_GOOGLE_API_KEY, "   ");
        assert_eq!(
            GeminiConfig::from_env().api_key.as_deref(),
            Some("fallback-key")
        );

        std::env::remove_var(defaults::ENV_GOOGLE_API_KEY);
        std::env::remove_var(defaults::ENV_GEMINI_API_KEY);
    }
}
