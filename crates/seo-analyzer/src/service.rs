use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use html_parser::{analyze_markup, normalize_url, check_site, PageFetcher, TechnicalSignals};
use serde::{Deserialize, Serialize};
use seo_plugins::{
    calculate_score, generate_recommendations, AuditSignals, ContentSignals, Issue,
    PluginRegistry, Recommendation, ScoreBreakdown,
};
use seo_storage::{NewReport, SeoStore, WebsiteUpdate};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuditConfig;
use crate::content::{AnalysisSource, ContentAnalyzer};
use crate::error::AuditError;
use crate::providers::{build_provider, ContentProvider};
use crate::speed::{PageSpeedProvider, SpeedEstimator, SpeedProvider, SpeedSource};
use crate::tracker::{GracePeriods, IssueTracker, ReconcileOutcome};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    pub skip_issue_tracking: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub url: String,
    #[serde(default)]
    pub target_keywords: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub website_id: Option<String>,
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub url: String,
    pub score: u8,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
    pub page_speed_score: u8,
    pub speed_source: SpeedSource,
    pub technical_details: TechnicalSignals,
    pub content_analysis: ContentSignals,
    pub content_source: AnalysisSource,
    pub score_breakdown: ScoreBreakdown,
    pub tokens_used: Option<u32>,
    pub report_id: Option<Uuid>,
    pub tracking: Option<ReconcileOutcome>,
}

/// The audit engine. Built once with its collaborators and shared between
/// audits.
pub struct SeoAuditService {
    fetcher: PageFetcher,
    registry: PluginRegistry,
    content: ContentAnalyzer,
    speed: SpeedEstimator,
    store: Option<Arc<dyn SeoStore>>,
    tracker: Option<IssueTracker>,
    grace: GracePeriods,
    site_check_timeout: Duration,
    max_excerpt_chars: usize,
    latency_timeout: Duration,
}

impl SeoAuditService {
    /// A service with no content provider, no speed provider and no storage.
    pub fn new(config: &AuditConfig) -> Result<Self, AuditError> {
        let fetcher = PageFetcher::new(&config.fetch.fetch_options())?;
        Ok(Self {
            speed: SpeedEstimator::new(None, fetcher.clone(), config.fetch.latency_timeout()),
            fetcher,
            registry: PluginRegistry::with_config(config.rules.clone()),
            content: ContentAnalyzer::new(None, config.content.max_excerpt_chars),
            store: None,
            tracker: None,
            grace: GracePeriods::from(&config.tracking),
            site_check_timeout: config.fetch.site_check_timeout(),
            max_excerpt_chars: config.content.max_excerpt_chars,
            latency_timeout: config.fetch.latency_timeout(),
        })
    }

    /// Selects the content and speed providers named by the config.
    pub fn from_config(config: &AuditConfig) -> Result<Self, AuditError> {
        let mut service = Self::new(config)?;
        if let Some(provider) = &config.content.provider {
            match build_provider(provider) {
                Ok(provider) => service = service.with_content_provider(provider),
                Err(e) => warn!(error = %e, "content analysis disabled"),
            }
        }
        if config.speed.api_key.is_some() {
            match PageSpeedProvider::new(&config.speed) {
                Ok(provider) => service = service.with_speed_provider(Arc::new(provider)),
                Err(e) => warn!(error = %e, "speed measurement disabled"),
            }
        }
        Ok(service)
    }

    pub fn with_content_provider(mut self, provider: Arc<dyn ContentProvider>) -> Self {
        info!(provider = provider.name(), "content analysis provider selected");
        self.content = ContentAnalyzer::new(Some(provider), self.max_excerpt_chars);
        self
    }

    pub fn with_speed_provider(mut self, provider: Arc<dyn SpeedProvider>) -> Self {
        self.speed = SpeedEstimator::new(Some(provider), self.fetcher.clone(), self.latency_timeout);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn SeoStore>) -> Self {
        self.tracker = Some(IssueTracker::new(store.clone(), self.grace));
        self.store = Some(store);
        self
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AuditError> {
        if request.website_id.is_some() != request.user_id.is_some() {
            return Err(AuditError::InvalidRequest(
                "websiteId and userId must be given together".to_string(),
            ));
        }
        let url = normalize_url(&request.url)?;
        let page = self.fetcher.fetch(&url).await?;
        let mut technical = analyze_markup(&page.final_url, &page.html);

        let (site, content, speed) = tokio::join!(
            check_site(&self.fetcher, &page.final_url, self.site_check_timeout),
            self.content
                .analyze(&page.html, &technical.meta, &request.target_keywords),
            self.speed.estimate(&page.final_url)
        );
        technical.site = site;

        let issues = self
            .registry
            .detect(&AuditSignals::new(&technical, &content.signals));
        let breakdown = calculate_score(&issues, &technical, &content.signals, speed.score);
        let recommendations = generate_recommendations(&issues, &technical, &content.signals);
        info!(
            url = %page.final_url,
            score = breakdown.final_score,
            issues = issues.len(),
            "audit finished"
        );

        let mut result = AnalysisResult {
            url: page.final_url.to_string(),
            score: breakdown.final_score,
            issues,
            recommendations,
            page_speed_score: speed.score,
            speed_source: speed.source,
            technical_details: technical,
            content_analysis: content.signals,
            content_source: content.source,
            score_breakdown: breakdown,
            tokens_used: content.tokens_used,
            report_id: None,
            tracking: None,
        };

        if let (Some(website_id), Some(user_id)) = (&request.website_id, &request.user_id) {
            self.persist(website_id, user_id, &request.options, &mut result)
                .await;
        }
        Ok(result)
    }

    /// Best effort: storage failures are logged and the result is still returned.
    async fn persist(
        &self,
        website_id: &str,
        user_id: &str,
        options: &AnalysisOptions,
        result: &mut AnalysisResult,
    ) {
        let (Some(store), Some(tracker)) = (&self.store, &self.tracker) else {
            return;
        };
        if let Err(e) = store.get_website(website_id, user_id).await {
            warn!(website_id, error = %e, "skipping persistence");
            return;
        }

        let payload = match serde_json::to_value(&*result) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "could not serialize report");
                serde_json::Value::Null
            }
        };
        let report = NewReport {
            website_id: website_id.to_string(),
            user_id: user_id.to_string(),
            url: result.url.clone(),
            score: result.score,
            issue_count: result.issues.len(),
            payload,
        };
        match store.create_report(report).await {
            Ok(report) => {
                result.report_id = Some(report.id);
                let update = WebsiteUpdate {
                    last_score: Some(result.score),
                    last_analyzed_at: Some(report.created_at),
                };
                if let Err(e) = store.update_website(website_id, update).await {
                    warn!(website_id, error = %e, "failed to update website");
                }
            }
            Err(e) => warn!(website_id, error = %e, "failed to store report"),
        }

        if options.skip_issue_tracking {
            return;
        }
        match tracker
            .reconcile(website_id, user_id, result.report_id, &result.issues, Utc::now())
            .await
        {
            Ok(outcome) => result.tracking = Some(outcome),
            Err(e) => warn!(website_id, error = %e, "issue tracking failed"),
        }
    }
}
