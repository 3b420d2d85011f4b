use crate::utils::{
    config::{CheckResult, Rule, RuleCategory, Severity},
    page_plugin::SeoPlugin,
};

pub struct HeadingPlugin {}

impl Default for HeadingPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for HeadingPlugin {
    fn name(&self) -> &str {
        "Headings"
    }
    fn description(&self) -> &str {
        "Heading structure analysis"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "heading.h1_missing",
                title: "Missing H1 Tag",
                description: "Checks the page has a main heading",
                default_severity: Severity::Critical,
                category: RuleCategory::Structure,
                element: Some("h1"),
                check: |signals| {
                    CheckResult::check(signals.technical.headings.h1_count() > 0, || {
                        "Page has no H1 heading".to_string()
                    })
                    .current(0)
                    .recommended("Exactly one H1")
                },
            },
            Rule {
                id: "heading.h1_multiple",
                title: "Multiple H1 Tags",
                description: "Checks the page has a single main heading",
                default_severity: Severity::Warning,
                category: RuleCategory::Structure,
                element: Some("h1"),
                check: |signals| {
                    let count = signals.technical.headings.h1_count();
                    CheckResult::check(count <= 1, || format!("Page has {} H1 headings", count))
                        .current(count)
                        .recommended("Exactly one H1")
                },
            },
            Rule {
                id: "heading.hierarchy",
                title: "Broken Heading Hierarchy",
                description: "Checks headings never skip a level",
                default_severity: Severity::Warning,
                category: RuleCategory::Structure,
                element: Some("h1, h2, h3, h4, h5, h6"),
                check: |signals| {
                    CheckResult::check(signals.technical.headings.hierarchy_ok, || {
                        "Heading levels are skipped, e.g. an H2 followed by an H4".to_string()
                    })
                    .recommended("Sequential heading levels")
                },
            },
        ]
    }
}
