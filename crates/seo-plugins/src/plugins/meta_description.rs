use crate::utils::{
    config::{CheckResult, Rule, RuleCategory, Severity},
    page_plugin::SeoPlugin,
};

pub const MIN_DESCRIPTION_LENGTH: usize = 120;
pub const MAX_DESCRIPTION_LENGTH: usize = 160;

// Meta Description Plugin
pub struct MetaDescriptionPlugin {}

impl Default for MetaDescriptionPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaDescriptionPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for MetaDescriptionPlugin {
    fn name(&self) -> &str {
        "Meta Description"
    }

    fn description(&self) -> &str {
        "Validates meta description presence and length"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "meta_description.missing",
                title: "Missing Meta Description",
                description: "Checks if the page has a meta description",
                default_severity: Severity::Critical,
                category: RuleCategory::Meta,
                element: Some("meta[name=\"description\"]"),
                check: |signals| {
                    CheckResult::check(signals.technical.meta.has_description(), || {
                        "Page has no meta description, search engines will pick a snippet"
                            .to_string()
                    })
                    .recommended(format!(
                        "{}-{} characters summarising the page",
                        MIN_DESCRIPTION_LENGTH, MAX_DESCRIPTION_LENGTH
                    ))
                },
            },
            Rule {
                id: "meta_description.too_short",
                title: "Meta Description Too Short",
                description: "Checks the meta description has at least 120 characters",
                default_severity: Severity::Warning,
                category: RuleCategory::Meta,
                element: Some("meta[name=\"description\"]"),
                check: |signals| {
                    let meta = &signals.technical.meta;
                    CheckResult::check(
                        !meta.has_description() || meta.description_length >= MIN_DESCRIPTION_LENGTH,
                        || format!("Meta description is {} characters", meta.description_length),
                    )
                    .current(meta.description_length)
                    .recommended(format!(
                        "{}-{} characters",
                        MIN_DESCRIPTION_LENGTH, MAX_DESCRIPTION_LENGTH
                    ))
                },
            },
            Rule {
                id: "meta_description.too_long",
                title: "Meta Description Too Long",
                description: "Checks the meta description fits in 160 characters",
                default_severity: Severity::Warning,
                category: RuleCategory::Meta,
                element: Some("meta[name=\"description\"]"),
                check: |signals| {
                    let meta = &signals.technical.meta;
                    CheckResult::check(meta.description_length <= MAX_DESCRIPTION_LENGTH, || {
                        format!(
                            "Meta description is {} characters and will be truncated",
                            meta.description_length
                        )
                    })
                    .current(meta.description_length)
                    .recommended(format!(
                        "{}-{} characters",
                        MIN_DESCRIPTION_LENGTH, MAX_DESCRIPTION_LENGTH
                    ))
                },
            },
        ]
    }
}
