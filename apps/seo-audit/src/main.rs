//! seo-audit: fetches one page, scores it and tracks its issues over time.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use seo_analyzer::{AnalysisRequest, AnalysisResult, AuditConfig, SeoAuditService};
use seo_storage::{IssueTrackingSummary, SeoStore, SqliteStore, StorageError, Website};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOCAL_USER: &str = "local";

#[derive(Parser)]
#[command(name = "seo-audit")]
#[command(about = "Audit a web page for on-page SEO issues")]
#[command(version)]
struct Cli {
    /// Page to audit; `https://` is assumed when no scheme is given
    url: String,

    /// Target keyword, may be repeated
    #[arg(short = 'k', long = "keyword")]
    keywords: Vec<String>,

    /// TOML configuration file
    #[arg(short, long, env = "SEO_AUDIT_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database keeping reports and issue history between runs
    #[arg(long)]
    state: Option<PathBuf>,

    /// Website the audit belongs to, defaults to the page's host
    #[arg(long, requires = "state")]
    website_id: Option<String>,

    /// Owner of the website
    #[arg(long, default_value = LOCAL_USER)]
    user_id: String,

    /// Store the report without updating issue history
    #[arg(long)]
    skip_tracking: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => AuditConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AuditConfig::default(),
    };
    config.apply_env();

    let mut service = SeoAuditService::from_config(&config)?;
    let mut request = AnalysisRequest::new(cli.url.clone());
    request.target_keywords = cli.keywords.clone();
    request.options.skip_issue_tracking = cli.skip_tracking;

    let mut store = None;
    if let Some(path) = &cli.state {
        let opened = Arc::new(
            SqliteStore::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?,
        );
        let website_id = match &cli.website_id {
            Some(id) => id.clone(),
            None => default_website_id(&cli.url)?,
        };
        ensure_website(&opened, &website_id, &cli.user_id, &cli.url).await?;
        request.website_id = Some(website_id.clone());
        request.user_id = Some(cli.user_id.clone());
        service = service.with_store(opened.clone());
        store = Some((opened, website_id));
    }

    let result = service.analyze(request).await?;

    let summary = match &store {
        Some((store, website_id)) => Some(
            store
                .get_issue_tracking_summary(website_id, &cli.user_id)
                .await?,
        ),
        None => None,
    };

    if cli.json {
        let mut output = serde_json::to_value(&result)?;
        if let Some(summary) = &summary {
            output["trackingSummary"] = serde_json::to_value(summary)?;
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&result);
        if let Some(summary) = &summary {
            print_summary(summary);
        }
    }
    Ok(())
}

fn default_website_id(raw: &str) -> Result<String> {
    let url = seo_analyzer::normalize_url(raw)?;
    url.host_str()
        .map(str::to_string)
        .context("URL has no host to derive a website id from")
}

async fn ensure_website(store: &SqliteStore, website_id: &str, user_id: &str, url: &str) -> Result<()> {
    match store.get_website(website_id, user_id).await {
        Ok(_) => Ok(()),
        Err(StorageError::NotFound { .. }) => {
            info!(website_id, "registering website");
            store
                .add_website(Website::new(website_id, user_id, url))
                .await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_report(result: &AnalysisResult) {
    let breakdown = &result.score_breakdown;
    println!("{}", result.url);
    println!("Score: {}/100", result.score);
    println!(
        "  base {:.0}  content {:.0}  technical {:.0}  speed {}",
        breakdown.base_score, breakdown.content_score, breakdown.technical_score, breakdown.speed_score
    );
    if let Some(tokens) = result.tokens_used {
        println!("  content analysis used {} tokens", tokens);
    }

    println!();
    println!("Issues ({}):", result.issues.len());
    for issue in &result.issues {
        println!(
            "  [{}] {}: {}",
            issue.severity.as_str(),
            issue.title,
            issue.description
        );
        if let Some(recommended) = &issue.recommended_value {
            println!("      recommended: {}", recommended);
        }
    }

    if !result.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for recommendation in &result.recommendations {
            println!(
                "  ({:?}) {}: {}",
                recommendation.priority, recommendation.title, recommendation.description
            );
        }
    }
}

fn print_summary(summary: &IssueTrackingSummary) {
    println!();
    println!("Issue history ({} tracked):", summary.total);
    for (status, count) in &summary.by_status {
        println!("  {:<10} {}", status, count);
    }
    println!("  open and auto-fixable: {}", summary.open_autofix_eligible);
    if let Some(at) = summary.last_status_change {
        println!("  last change: {}", at.to_rfc3339());
    }
}
