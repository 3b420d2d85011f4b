use crate::utils::{
    config::{CheckResult, Rule, RuleCategory, Severity},
    page_plugin::SeoPlugin,
};

pub struct SchemaPlugin {}

impl Default for SchemaPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for SchemaPlugin {
    fn name(&self) -> &str {
        "Structured Data"
    }
    fn description(&self) -> &str {
        "Schema.org markup checks"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "schema.structured_data",
                title: "Missing Structured Data",
                description: "Checks for JSON-LD or microdata markup",
                default_severity: Severity::Warning,
                category: RuleCategory::Schema,
                element: Some("script[type=\"application/ld+json\"]"),
                check: |signals| {
                    CheckResult::check(signals.technical.schema.has_structured_data, || {
                        "No structured data found on the page".to_string()
                    })
                    .recommended("JSON-LD describing the page, e.g. Article or Organization")
                },
            },
            Rule {
                id: "schema.faq",
                title: "Missing FAQ Schema",
                description: "Checks for FAQPage markup",
                default_severity: Severity::Info,
                category: RuleCategory::Schema,
                element: Some("script[type=\"application/ld+json\"]"),
                check: |signals| {
                    let schema = &signals.technical.schema;
                    CheckResult::check(schema.has_faq_schema, || {
                        if schema.has_faq_content {
                            "Page has FAQ content without FAQPage markup".to_string()
                        } else {
                            "No FAQPage markup found".to_string()
                        }
                    })
                    .recommended("FAQPage JSON-LD")
                },
            },
            Rule {
                id: "schema.breadcrumbs",
                title: "Missing Breadcrumbs",
                description: "Checks for breadcrumb navigation or BreadcrumbList markup",
                default_severity: Severity::Info,
                category: RuleCategory::Schema,
                element: None,
                check: |signals| {
                    CheckResult::check(signals.technical.schema.has_breadcrumbs(), || {
                        "No breadcrumb navigation found".to_string()
                    })
                    .recommended("BreadcrumbList JSON-LD")
                },
            },
        ]
    }
}
