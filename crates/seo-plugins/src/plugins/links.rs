use crate::utils::{
    config::{CheckResult, Rule, RuleCategory, Severity},
    page_plugin::SeoPlugin,
};

pub const MIN_INTERNAL_LINKS: usize = 3;

pub struct LinksPlugin {}

impl Default for LinksPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl LinksPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for LinksPlugin {
    fn name(&self) -> &str {
        "Links"
    }
    fn description(&self) -> &str {
        "Internal linking and outbound link hygiene"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "links.internal",
                title: "Insufficient Internal Links",
                description: "Checks the page links to at least 3 other pages on the site",
                default_severity: Severity::Warning,
                category: RuleCategory::Links,
                element: Some("a[href]"),
                check: |signals| {
                    let internal = signals.technical.links.internal;
                    CheckResult::check(internal >= MIN_INTERNAL_LINKS, || {
                        format!("Page has only {} internal links", internal)
                    })
                    .current(internal)
                    .recommended(format!(">= {} internal links", MIN_INTERNAL_LINKS))
                },
            },
            Rule {
                id: "links.broken",
                title: "Broken Links Detected",
                description: "Checks for links pointing at error pages",
                default_severity: Severity::Warning,
                category: RuleCategory::Links,
                element: Some("a[href]"),
                check: |signals| {
                    let links = &signals.technical.links;
                    CheckResult::check(links.broken == 0, || {
                        format!(
                            "{} links look broken: {}",
                            links.broken,
                            links.broken_urls.join(", ")
                        )
                    })
                    .current(links.broken)
                    .recommended("0 broken links")
                },
            },
            Rule {
                id: "links.orphan",
                title: "Orphan Page",
                description: "Checks that something on the site links back to this page",
                default_severity: Severity::Warning,
                category: RuleCategory::Links,
                element: None,
                check: |signals| {
                    CheckResult::check(signals.technical.links.inbound > 0, || {
                        "No internal links point to this page".to_string()
                    })
                },
            },
            Rule {
                id: "links.unsafe_external",
                title: "Unsafe External Links",
                description: "Checks target=\"_blank\" links carry rel=\"noopener\"",
                default_severity: Severity::Info,
                category: RuleCategory::Links,
                element: Some("a[target=\"_blank\"]"),
                check: |signals| {
                    let count = signals.technical.links.unsafe_external;
                    CheckResult::check(count == 0, || {
                        format!("{} external links open a new tab without rel=\"noopener\"", count)
                    })
                    .current(count)
                    .recommended("rel=\"noopener noreferrer\"")
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
    fn test_link_rules() {
        let mut technical = healthy_technical();
        technical.links.internal = 1;
        technical.links.inbound = 0;
        technical.links.broken = 1;
        technical.links.broken_urls = vec!["https://example.com/404".to_string()];
        technical.links.unsafe_external = 2;
        let content = ContentSignals::default();
        let issues = LinksPlugin::new()
            .analyze(&AuditSignals::new(&technical, &content), &RuleConfig::new());

        let titles: Vec<_> = issues.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Insufficient Internal Links",
                "Broken Links Detected",
                "Orphan Page",
                "Unsafe External Links"
            ]
        );
        assert!(issues[1].description.contains("https://example.com/404"));
        assert_eq!(issues[3].severity, Severity::Info);
    }
}
