use crate::utils::{
    config::{CheckResult, Rule, RuleCategory, Severity},
    page_plugin::SeoPlugin,
};

pub struct SitePlugin {}

impl Default for SitePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl SitePlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for SitePlugin {
    fn name(&self) -> &str {
        "Site"
    }
    fn description(&self) -> &str {
        "Site-wide crawlability files"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "site.sitemap",
                title: "Missing XML Sitemap",
                description: "Checks /sitemap.xml is reachable",
                default_severity: Severity::Info,
                category: RuleCategory::Site,
                element: None,
                check: |signals| {
                    CheckResult::check(signals.technical.site.has_sitemap, || {
                        "No sitemap found at /sitemap.xml".to_string()
                    })
                    .recommended("/sitemap.xml")
                },
            },
            Rule {
                id: "site.robots",
                title: "Missing Robots.txt",
                description: "Checks /robots.txt is reachable",
                default_severity: Severity::Info,
                category: RuleCategory::Site,
                element: None,
                check: |signals| {
                    CheckResult::check(signals.technical.site.has_robots_txt, || {
                        "No robots.txt found".to_string()
                    })
                    .recommended("/robots.txt")
                },
            },
        ]
    }
}
