use crate::utils::{
    config::{CheckResult, Rule, RuleCategory, Severity},
    page_plugin::SeoPlugin,
};

pub const MIN_TITLE_LENGTH: usize = 10;
pub const MAX_TITLE_LENGTH: usize = 60;

// Title Plugin
pub struct TitlePlugin {}

impl Default for TitlePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl TitlePlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for TitlePlugin {
    fn name(&self) -> &str {
        "Title"
    }
    fn description(&self) -> &str {
        "The title tag of a web page is meant to be an accurate and concise description of
 a page's content. It is critical to both user experience and SEO."
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "title.missing",
                title: "Missing Page Title",
                description: "Checks if the page has a proper title tag",
                default_severity: Severity::Critical,
                category: RuleCategory::Meta,
                element: Some("head > title"),
                check: |signals| {
                    CheckResult::check(signals.technical.meta.has_title(), || {
                        "Page is missing a title tag".to_string()
                    })
                    .recommended(format!(
                        "A unique title of {}-{} characters",
                        MIN_TITLE_LENGTH, MAX_TITLE_LENGTH
                    ))
                },
            },
            Rule {
                id: "title.too_short",
                title: "Title Too Short",
                description: "Checks the title has at least 10 characters",
                default_severity: Severity::Warning,
                category: RuleCategory::Meta,
                element: Some("head > title"),
                check: |signals| {
                    let meta = &signals.technical.meta;
                    CheckResult::check(
                        !meta.has_title() || meta.title_length >= MIN_TITLE_LENGTH,
                        || format!("Title length is {} characters", meta.title_length),
                    )
                    .current(meta.title.clone().unwrap_or_default())
                    .recommended(format!("{}-{} characters", MIN_TITLE_LENGTH, MAX_TITLE_LENGTH))
                },
            },
            Rule {
                id: "title.too_long",
                title: "Title Too Long",
                description: "Checks the title fits in 60 characters",
                default_severity: Severity::Warning,
                category: RuleCategory::Meta,
                element: Some("head > title"),
                check: |signals| {
                    let meta = &signals.technical.meta;
                    CheckResult::check(meta.title_length <= MAX_TITLE_LENGTH, || {
                        format!(
                            "Title length is {} characters and will be truncated in results",
                            meta.title_length
                        )
                    })
                    .current(meta.title.clone().unwrap_or_default())
                    .recommended(format!("{}-{} characters", MIN_TITLE_LENGTH, MAX_TITLE_LENGTH))
                },
            },
        ]
    }
}
