use crate::utils::{
    config::{CheckResult, Rule, RuleCategory, Severity},
    page_plugin::SeoPlugin,
};

pub const MAX_PAGE_SIZE_BYTES: usize = 3 * 1024 * 1024;

// SEO Basic Plugin
pub struct SeoBasicPlugin {}

impl Default for SeoBasicPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl SeoBasicPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for SeoBasicPlugin {
    fn name(&self) -> &str {
        "SEO Basic"
    }
    fn description(&self) -> &str {
        "Basic SEO checks for canonical, social and page weight"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "seo_basic.canonical",
                title: "Missing Canonical URL",
                description: "Checks if the page declares a canonical URL",
                default_severity: Severity::Warning,
                category: RuleCategory::Meta,
                element: Some("link[rel=\"canonical\"]"),
                check: |signals| {
                    let technical = signals.technical;
                    CheckResult::check(technical.meta.canonical.is_some(), || {
                        "No canonical link found, duplicate URLs may split ranking signals"
                            .to_string()
                    })
                    .recommended(technical.url.clone())
                },
            },
            Rule {
                id: "seo_basic.open_graph",
                title: "Missing Open Graph Tags",
                description: "Checks for og: meta tags used by social previews",
                default_severity: Severity::Info,
                category: RuleCategory::Meta,
                element: Some("meta[property^=\"og:\"]"),
                check: |signals| {
                    CheckResult::check(signals.technical.meta.has_open_graph(), || {
                        "No Open Graph tags found".to_string()
                    })
                    .recommended("og:title, og:description, og:image")
                },
            },
            Rule {
                id: "seo_basic.twitter_card",
                title: "Missing Twitter Card Tags",
                description: "Checks for twitter: meta tags",
                default_severity: Severity::Info,
                category: RuleCategory::Meta,
                element: Some("meta[name^=\"twitter:\"]"),
                check: |signals| {
                    CheckResult::check(signals.technical.meta.has_twitter_card(), || {
                        "No Twitter Card tags found".to_string()
                    })
                    .recommended("twitter:card, twitter:title, twitter:description")
                },
            },
            Rule {
                id: "seo_basic.page_size",
                title: "Large Page Size",
                description: "Checks the HTML document stays under 3MB",
                default_severity: Severity::Warning,
                category: RuleCategory::Performance,
                element: None,
                check: |signals| {
                    let size = signals.technical.page_size_bytes;
                    CheckResult::check(size <= MAX_PAGE_SIZE_BYTES, || {
                        format!("HTML document is {:.1}MB", size as f64 / (1024.0 * 1024.0))
                    })
                    .current(size)
                    .recommended("< 3MB")
                },
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::RuleConfig;
    use crate::utils::signals::{AuditSignals, ContentSignals};
    use crate::utils::test_support::healthy_technical;

    #[test]
    fn test_bare_page() {
        let mut technical = healthy_technical();
        technical.meta.canonical = None;
        technical.meta.og_tags.clear();
        technical.meta.twitter_tags.clear();
        technical.page_size_bytes = 4 * 1024 * 1024;
        let content = ContentSignals::default();
        let issues = SeoBasicPlugin::new()
            .analyze(&AuditSignals::new(&technical, &content), &RuleConfig::new());

        let titles: Vec<_> = issues.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Missing Canonical URL",
                "Missing Open Graph Tags",
                "Missing Twitter Card Tags",
                "Large Page Size"
            ]
        );
        assert_eq!(
            issues[0].recommended_value.as_deref(),
            Some("https://example.com/guide")
        );
        assert!(issues[0].autofix_eligible());
        assert!(!issues[3].autofix_eligible());
    }
}
