use html_parser::TechnicalSignals;
use serde::{Deserialize, Serialize};

use crate::utils::config::{RuleCategory, Severity};
use crate::utils::issue::Issue;
use crate::utils::signals::ContentSignals;

pub const MAX_RECOMMENDATIONS: usize = 12;
const MAX_CONTENT_GAPS: usize = 3;
const MAX_KEYWORDS_LISTED: usize = 5;
const IMPROVEMENT_THRESHOLD: u8 = 70;
const MIN_INTERNAL_LINKS: usize = 3;
const HEAVY_PAGE_BYTES: usize = 1_500_000;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: Priority,
    pub category: RuleCategory,
    pub title: String,
    pub description: String,
}

impl Recommendation {
    fn new(
        priority: Priority,
        category: RuleCategory,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            category,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Rollup naming every critical issue, `None` when there are none.
fn critical_rollup(issues: &[Issue]) -> Option<Recommendation> {
    let critical: Vec<&str> = issues
        .iter()
        .filter(|i| i.severity == Severity::Critical)
        .map(|i| i.title.as_str())
        .collect();
    if critical.is_empty() {
        return None;
    }
    Some(Recommendation::new(
        Priority::High,
        RuleCategory::Structure,
        "Fix critical SEO issues first",
        format!(
            "{} critical issue(s) are holding this page back: {}",
            critical.len(),
            critical.join(", ")
        ),
    ))
}

pub fn content_recommendations(content: &ContentSignals) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = content
        .content_gaps
        .iter()
        .take(MAX_CONTENT_GAPS)
        .map(|gap| {
            Recommendation::new(
                Priority::High,
                RuleCategory::Content,
                format!("Cover missing topic: {}", gap),
                format!("Add a section addressing \"{}\" to close this content gap", gap),
            )
        })
        .collect();

    if !content.missing_keywords.is_empty() {
        recommendations.push(Recommendation::new(
            Priority::High,
            RuleCategory::Content,
            "Add missing target keywords",
            format!(
                "Work these keywords into headings and body copy: {}",
                list(&content.missing_keywords)
            ),
        ));
    }

    let related: Vec<String> = content
        .semantic_keywords
        .iter()
        .chain(content.lsi_keywords.iter())
        .cloned()
        .collect();
    if !related.is_empty() {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            RuleCategory::Content,
            "Use related keywords",
            format!("Mention semantically related terms such as {}", list(&related)),
        ));
    }

    if content.eat.overall < IMPROVEMENT_THRESHOLD {
        recommendations.push(Recommendation::new(
            Priority::High,
            RuleCategory::Content,
            "Strengthen E-A-T signals",
            "Add author credentials, cite reputable sources and show contact or about details",
        ));
    }
    if content.uniqueness_score < IMPROVEMENT_THRESHOLD {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            RuleCategory::Content,
            "Make the content more unique",
            "Add original data, examples or opinions that other pages do not have",
        ));
    }
    if content.readability_score < IMPROVEMENT_THRESHOLD {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            RuleCategory::Content,
            "Improve readability",
            "Use shorter sentences, smaller paragraphs and descriptive subheadings",
        ));
    }
    if content.intent_alignment_score < IMPROVEMENT_THRESHOLD {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            RuleCategory::Content,
            "Align content with search intent",
            "Answer the question behind the target keywords early and directly",
        ));
    }
    recommendations
}

pub fn technical_recommendations(technical: &TechnicalSignals) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if !technical.schema.has_structured_data {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            RuleCategory::Schema,
            "Add structured data",
            "Describe the page with JSON-LD so search engines can show rich results",
        ));
    }
    if !technical.meta.has_open_graph() {
        recommendations.push(Recommendation::new(
            Priority::Low,
            RuleCategory::Meta,
            "Add Open Graph tags",
            "Set og:title, og:description and og:image to control social previews",
        ));
    }
    if technical.links.internal < MIN_INTERNAL_LINKS {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            RuleCategory::Links,
            "Add internal links",
            format!(
                "Link to at least {} related pages on the site (currently {})",
                MIN_INTERNAL_LINKS, technical.links.internal
            ),
        ));
    }
    if !technical.mobile.responsive {
        recommendations.push(Recommendation::new(
            Priority::High,
            RuleCategory::Mobile,
            "Make the page mobile responsive",
            "Add a viewport meta tag and use media queries or a flexible layout",
        ));
    }
    if technical.page_size_bytes > HEAVY_PAGE_BYTES {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            RuleCategory::Performance,
            "Reduce page size",
            format!(
                "The HTML is {:.1}MB; trim inline scripts, styles and embedded data",
                technical.page_size_bytes as f64 / 1_000_000.0
            ),
        ));
    }
    recommendations
}

/// At most [`MAX_RECOMMENDATIONS`], the critical rollup always first.
pub fn generate_recommendations(
    issues: &[Issue],
    technical: &TechnicalSignals,
    content: &ContentSignals,
) -> Vec<Recommendation> {
    let mut rest = content_recommendations(content);
    rest.extend(technical_recommendations(technical));
    rest.sort_by_key(|r| r.priority);

    critical_rollup(issues)
        .into_iter()
        .chain(rest)
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

fn list(keywords: &[String]) -> String {
    keywords
        .iter()
        .take(MAX_KEYWORDS_LISTED)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
