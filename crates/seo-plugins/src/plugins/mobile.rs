use crate::utils::{
    config::{CheckResult, Rule, RuleCategory, Severity},
    page_plugin::SeoPlugin,
};

pub struct MobilePlugin {}

impl Default for MobilePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl MobilePlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for MobilePlugin {
    fn name(&self) -> &str {
        "Mobile"
    }
    fn description(&self) -> &str {
        "Mobile friendliness checks"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "mobile.viewport",
                title: "Missing Viewport Meta Tag",
                description: "Checks the page declares a viewport",
                default_severity: Severity::Critical,
                category: RuleCategory::Mobile,
                element: Some("meta[name=\"viewport\"]"),
                check: |signals| {
                    CheckResult::check(signals.technical.mobile.has_viewport, || {
                        "Page has no viewport meta tag and will render zoomed out on phones"
                            .to_string()
                    })
                    .recommended("width=device-width, initial-scale=1")
                },
            },
            Rule {
                id: "mobile.responsive",
                title: "Not Mobile Responsive",
                description: "Checks for responsive layout signals",
                default_severity: Severity::Warning,
                category: RuleCategory::Mobile,
                element: None,
                check: |signals| {
                    let mobile = &signals.technical.mobile;
                    // A missing viewport is already reported above.
                    CheckResult::check(!mobile.has_viewport || mobile.responsive, || {
                        "No media queries, flex/grid layout or responsive framework detected"
                            .to_string()
                    })
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
    fn test_mobile_rules() {
        let content = ContentSignals::default();
        let mut technical = healthy_technical();
        technical.mobile = Default::default();
        let issues = MobilePlugin::new()
            .analyze(&AuditSignals::new(&technical, &content), &RuleConfig::new());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Missing Viewport Meta Tag");
        assert_eq!(issues[0].severity, Severity::Critical);

        technical.mobile.has_viewport = true;
        let issues = MobilePlugin::new()
            .analyze(&AuditSignals::new(&technical, &content), &RuleConfig::new());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Not Mobile Responsive");
    }
}
