use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use html_parser::PageFetcher;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::SpeedConfig;

pub const DEFAULT_SPEED_SCORE: u8 = 50;
const MOBILE_WEIGHT: f64 = 0.6;
const DESKTOP_WEIGHT: f64 = 0.4;

/// Upper latency bound in milliseconds and the score below it.
const LATENCY_BUCKETS: [(u128, u8); 5] = [(800, 95), (1500, 85), (2500, 75), (4000, 65), (6000, 55)];
const SLOWEST_SCORE: u8 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

#[derive(Debug, Error)]
pub enum SpeedError {
    #[error("Measurement request failed: {0}")]
    Request(String),
    #[error("Measurement service responded with HTTP {0}")]
    Status(u16),
    #[error("No performance score in the measurement result")]
    MissingScore,
}

/// A performance measurement capability returning 0..=100.
#[async_trait]
pub trait SpeedProvider: Send + Sync {
    async fn measure(&self, url: &Url, strategy: Strategy) -> Result<u8, SpeedError>;
}

/// PageSpeed Insights v5.
pub struct PageSpeedProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl PageSpeedProvider {
    pub fn new(config: &SpeedConfig) -> Result<Self, SpeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeedError::Request(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

/// `categories.performance.score` is reported as 0.0..=1.0.
pub fn performance_score(report: &serde_json::Value) -> Option<u8> {
    report["lighthouseResult"]["categories"]["performance"]["score"]
        .as_f64()
        .map(|score| (score * 100.0).round().clamp(0.0, 100.0) as u8)
}

#[async_trait]
impl SpeedProvider for PageSpeedProvider {
    async fn measure(&self, url: &Url, strategy: Strategy) -> Result<u8, SpeedError> {
        let mut query = vec![
            ("url", url.as_str()),
            ("strategy", strategy.as_str()),
            ("category", "performance"),
        ];
        if let Some(key) = &self.api_key {
            query.push(("key", key.as_str()));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| SpeedError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SpeedError::Status(response.status().as_u16()));
        }
        let report: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SpeedError::Request(e.to_string()))?;
        performance_score(&report).ok_or(SpeedError::MissingScore)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpeedSource {
    Measured,
    Latency,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedResult {
    pub score: u8,
    pub source: SpeedSource,
}

pub fn blend(mobile: u8, desktop: u8) -> u8 {
    (MOBILE_WEIGHT * f64::from(mobile) + DESKTOP_WEIGHT * f64::from(desktop)).round() as u8
}

pub fn latency_score(latency: Duration) -> u8 {
    let millis = latency.as_millis();
    LATENCY_BUCKETS
        .iter()
        .find(|(bound, _)| millis < *bound)
        .map(|(_, score)| *score)
        .unwrap_or(SLOWEST_SCORE)
}

#[derive(Clone)]
pub struct SpeedEstimator {
    provider: Option<Arc<dyn SpeedProvider>>,
    fetcher: PageFetcher,
    latency_timeout: Duration,
}

impl SpeedEstimator {
    pub fn new(
        provider: Option<Arc<dyn SpeedProvider>>,
        fetcher: PageFetcher,
        latency_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            fetcher,
            latency_timeout,
        }
    }

    /// Never fails: measurement, then the latency check, then a neutral default.
    pub async fn estimate(&self, url: &Url) -> SpeedResult {
        if let Some(provider) = &self.provider {
            let (mobile, desktop) = tokio::join!(
                provider.measure(url, Strategy::Mobile),
                provider.measure(url, Strategy::Desktop)
            );
            let score = match (mobile, desktop) {
                (Ok(mobile), Ok(desktop)) => Some(blend(mobile, desktop)),
                (Ok(mobile), Err(e)) => {
                    warn!(error = %e, "desktop measurement failed");
                    Some(blend(mobile, 0))
                }
                (Err(e), Ok(desktop)) => {
                    warn!(error = %e, "mobile measurement failed");
                    Some(blend(0, desktop))
                }
                (Err(mobile), Err(desktop)) => {
                    warn!(%mobile, %desktop, "speed measurement unavailable, probing latency");
                    None
                }
            };
            if let Some(score) = score {
                return SpeedResult {
                    score,
                    source: SpeedSource::Measured,
                };
            }
        }

        match self.fetcher.measure_latency(url, self.latency_timeout).await {
            Ok(latency) => {
                debug!(latency_ms = latency.as_millis() as u64, "estimated speed from latency");
                SpeedResult {
                    score: latency_score(latency),
                    source: SpeedSource::Latency,
                }
            }
            Err(e) => {
                debug!(error = %e, "latency check failed, using default speed score");
                SpeedResult {
                    score: DEFAULT_SPEED_SCORE,
                    source: SpeedSource::Default,
                }
            }
        }
    }
}
