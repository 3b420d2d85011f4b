use crate::utils::{
    config::{CheckResult, Rule, RuleCategory, Severity},
    page_plugin::SeoPlugin,
};

// Image Plugin
pub struct ImagePlugin {}

impl Default for ImagePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagePlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl SeoPlugin for ImagePlugin {
    fn name(&self) -> &str {
        "Images"
    }
    fn description(&self) -> &str {
        "Image optimization analysis"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "images.alt_text",
                title: "Images Missing Alt Text",
                description: "Checks if all images have alt text attributes",
                default_severity: Severity::Warning,
                category: RuleCategory::Media,
                element: Some("img"),
                check: |signals| {
                    let images = &signals.technical.images;
                    CheckResult::check(images.missing_alt == 0, || {
                        format!(
                            "{} of {} images are missing alt text",
                            images.missing_alt, images.total
                        )
                    })
                    .current(images.missing_alt)
                    .recommended("0 images without alt text")
                },
            },
            Rule {
                id: "images.dimensions",
                title: "Images Missing Dimensions",
                description: "Checks images declare width and height to avoid layout shift",
                default_severity: Severity::Info,
                category: RuleCategory::Media,
                element: Some("img"),
                check: |signals| {
                    let images = &signals.technical.images;
                    CheckResult::check(images.missing_dimensions == 0, || {
                        format!(
                            "{} images have no width/height attributes",
                            images.missing_dimensions
                        )
                    })
                    .current(images.missing_dimensions)
                },
            },
            Rule {
                id: "images.lazy_loading",
                title: "Images Not Lazy Loaded",
                description: "Checks images below the fold use loading=\"lazy\"",
                default_severity: Severity::Info,
                category: RuleCategory::Media,
                element: Some("img"),
                check: |signals| {
                    let images = &signals.technical.images;
                    CheckResult::check(images.missing_lazy_loading == 0, || {
                        format!(
                            "{} images below the fold load eagerly",
                            images.missing_lazy_loading
                        )
                    })
                    .current(images.missing_lazy_loading)
                    .recommended("loading=\"lazy\"")
                },
            },
        ]
    }
}
