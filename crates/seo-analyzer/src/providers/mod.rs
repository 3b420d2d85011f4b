mod anthropic;
mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ConfigError, ProviderConfig, ProviderKind};

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

pub const SYSTEM_PROMPT: &str = "You are an SEO content analyst. Reply with a single JSON object and nothing else.";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },
    #[error("Unexpected response payload: {0}")]
    Payload(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub text: String,
    pub tokens_used: Option<u32>,
}

/// A content-analysis capability: text in, text out.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, prompt: &str) -> Result<ProviderResponse, ProviderError>;
}

/// Builds the provider named in the config. Called once at composition time.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn ContentProvider>, ConfigError> {
    let api_key = config
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey(config.kind.as_str()))?;
    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| ConfigError::Client(e.to_string()))?;

    let provider: Arc<dyn ContentProvider> = match config.kind {
        ProviderKind::OpenAi => {
            let mut provider = OpenAiProvider::new(client, api_key).with_max_tokens(config.max_tokens);
            if let Some(model) = &config.model {
                provider = provider.with_model(model);
            }
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url);
            }
            Arc::new(provider)
        }
        ProviderKind::Anthropic => {
            let mut provider =
                AnthropicProvider::new(client, api_key).with_max_tokens(config.max_tokens);
            if let Some(model) = &config.model {
                provider = provider.with_model(model);
            }
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url);
            }
            Arc::new(provider)
        }
    };
    Ok(provider)
}

/// Maps a non-success response to a provider error, reading the body for the message.
async fn error_for_status(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);
    match status.as_u16() {
        401 | 403 => Err(ProviderError::Authentication(message)),
        code => Err(ProviderError::Api {
            provider,
            status: code,
            message,
        }),
    }
}
