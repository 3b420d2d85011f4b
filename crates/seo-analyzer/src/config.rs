use std::path::{Path, PathBuf};
use std::time::Duration;

use html_parser::fetcher::USER_AGENT;
use html_parser::FetchOptions;
use seo_plugins::RuleConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const PAGESPEED_API_KEY: &str = "PAGESPEED_API_KEY";

pub const PAGESPEED_ENDPOINT: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("No API key configured for the {0} provider")]
    MissingApiKey(&'static str),
    #[error("Could not build HTTP client: {0}")]
    Client(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub fetch: FetchConfig,
    pub content: ContentConfig,
    pub speed: SpeedConfig,
    pub tracking: TrackingConfig,
    pub rules: RuleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_redirects: usize,
    /// Latency check used when no speed measurement is available.
    pub latency_timeout_secs: u64,
    /// Sitemap and robots.txt checks.
    pub site_check_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_redirects: 5,
            latency_timeout_secs: 10,
            site_check_timeout_secs: 5,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn latency_timeout(&self) -> Duration {
        Duration::from_secs(self.latency_timeout_secs)
    }

    pub fn site_check_timeout(&self) -> Duration {
        Duration::from_secs(self.site_check_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub max_excerpt_chars: usize,
    pub provider: Option<ProviderConfig>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_excerpt_chars: 8000,
            provider: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    fn env_key(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => OPENAI_API_KEY,
            ProviderKind::Anthropic => ANTHROPIC_API_KEY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_provider_timeout() -> u64 {
    60
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: Some(api_key.into()),
            model: None,
            base_url: None,
            max_tokens: default_max_tokens(),
            timeout_secs: default_provider_timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Measurement is only attempted when a key is present.
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: PAGESPEED_ENDPOINT.to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub auto_fix_grace_hours: u32,
    pub manual_fix_grace_hours: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            auto_fix_grace_hours: 48,
            manual_fix_grace_hours: 24,
        }
    }
}

impl AuditConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Fills API keys from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// A configured provider without a key takes it from its variable. With
    /// no provider configured the first key found picks one, OpenAI first.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if self.content.provider.is_none() {
            self.content.provider = [ProviderKind::OpenAi, ProviderKind::Anthropic]
                .into_iter()
                .find_map(|kind| lookup(kind.env_key()).map(|key| ProviderConfig::new(kind, key)));
        } else if let Some(provider) = self.content.provider.as_mut() {
            if provider.api_key.is_none() {
                provider.api_key = lookup(provider.kind.env_key());
            }
        }

        if self.speed.api_key.is_none() {
            self.speed.api_key = lookup(PAGESPEED_API_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.fetch.timeout_secs, 15);
        assert_eq!(config.fetch.max_redirects, 5);
        assert_eq!(config.fetch.latency_timeout(), Duration::from_secs(10));
        assert_eq!(config.content.max_excerpt_chars, 8000);
        assert_eq!(config.tracking.auto_fix_grace_hours, 48);
        assert_eq!(config.tracking.manual_fix_grace_hours, 24);
        assert!(config.rules.is_rule_enabled("title.missing"));
    }

    #[test]
    fn test_from_toml() {
        let config = AuditConfig::from_toml(
            r#"
            [fetch]
            timeout_secs = 30

            [content.provider]
            kind = "anthropic"
            model = "claude-3-5-haiku-latest"

            [tracking]
            auto_fix_grace_hours = 72

            [rules]
            disabled_rules = ["site.robots"]
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.fetch.max_redirects, 5);
        let provider = config.content.provider.unwrap();
        assert_eq!(provider.kind, ProviderKind::Anthropic);
        assert_eq!(provider.api_key, None);
        assert_eq!(provider.max_tokens, 2000);
        assert_eq!(config.tracking.auto_fix_grace_hours, 72);
        assert_eq!(config.tracking.manual_fix_grace_hours, 24);
        assert!(!config.rules.is_rule_enabled("site.robots"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AuditConfig::from_toml("[fetch]\ntimeout_secs = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_selects_provider() {
        let env = HashMap::from([
            (ANTHROPIC_API_KEY, "sk-ant"),
            (PAGESPEED_API_KEY, "psi-key"),
        ]);
        let mut config = AuditConfig::default();
        config.apply_env_from(|name| env.get(name).map(|v| v.to_string()));

        let provider = config.content.provider.unwrap();
        assert_eq!(provider.kind, ProviderKind::Anthropic);
        assert_eq!(provider.api_key.as_deref(), Some("sk-ant"));
        assert_eq!(config.speed.api_key.as_deref(), Some("psi-key"));
    }

    #[test]
    fn test_env_fills_configured_provider() {
        let env = HashMap::from([(OPENAI_API_KEY, "sk-openai"), (ANTHROPIC_API_KEY, "sk-ant")]);
        let mut config = AuditConfig::default();
        config.content.provider = Some(ProviderConfig {
            api_key: None,
            ..ProviderConfig::new(ProviderKind::Anthropic, "")
        });
        config.apply_env_from(|name| env.get(name).map(|v| v.to_string()));

        let provider = config.content.provider.unwrap();
        assert_eq!(provider.kind, ProviderKind::Anthropic);
        assert_eq!(provider.api_key.as_deref(), Some("sk-ant"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = AuditConfig::default();
        config.apply_env_from(|_| Some("  ".to_string()));
        assert!(config.content.provider.is_none());
        assert!(config.speed.api_key.is_none());
    }
}
