use crate::utils::{
    config::{CheckResult, Rule, RuleCategory, Severity},
    page_plugin::SeoPlugin,
};

pub const MIN_QUALITY_SCORE: u8 = 60;
pub const MIN_READABILITY_SCORE: u8 = 70;
pub const MIN_EAT_SCORE: u8 = 60;
pub const MAX_KEYWORD_DENSITY: f64 = 5.0;
pub const MIN_WORD_COUNT: usize = 300;
pub const MAX_DUPLICATE_RISK: u8 = 30;

// Content Plugin
pub struct ContentPlugin {}

impl Default for ContentPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

const PLUGIN_NAME: &str = "Content";

impl SeoPlugin for ContentPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }
    fn description(&self) -> &str {
        "Content quality signals reported by the content-analysis capability"
    }

    fn available_rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                id: "content.quality",
                title: "Low Content Quality",
                description: "Checks the overall content quality score",
                default_severity: Severity::Critical,
                category: RuleCategory::Content,
                element: None,
                check: |signals| {
                    let score = signals.content.quality_score;
                    CheckResult::check(score >= MIN_QUALITY_SCORE, || {
                        format!(
                            "Content quality score is {}/100, well below the {} needed to rank",
                            score, MIN_QUALITY_SCORE
                        )
                    })
                    .current(score)
                    .recommended(format!(">= {}", MIN_QUALITY_SCORE))
                },
            },
            Rule {
                id: "content.readability",
                title: "Poor Readability",
                description: "Checks the readability score of the main content",
                default_severity: Severity::Warning,
                category: RuleCategory::Content,
                element: None,
                check: |signals| {
                    let score = signals.content.readability_score;
                    CheckResult::check(score >= MIN_READABILITY_SCORE, || {
                        format!(
                            "Readability score is {}/100; shorter sentences and paragraphs help",
                            score
                        )
                    })
                    .current(score)
                    .recommended(format!(">= {}", MIN_READABILITY_SCORE))
                },
            },
            Rule {
                id: "content.eat",
                title: "Low E-A-T Score",
                description: "Checks expertise, authoritativeness and trustworthiness",
                default_severity: Severity::Warning,
                category: RuleCategory::Content,
                element: None,
                check: |signals| {
                    let eat = signals.content.eat;
                    CheckResult::check(eat.overall >= MIN_EAT_SCORE, || {
                        format!(
                            "E-A-T score is {}/100 (expertise {}, authority {}, trust {})",
                            eat.overall, eat.expertise, eat.authoritativeness, eat.trustworthiness
                        )
                    })
                    .current(eat.overall)
                    .recommended(format!(">= {}", MIN_EAT_SCORE))
                },
            },
            Rule {
                id: "content.keyword_density",
                title: "Keyword Over-Optimization",
                description: "Checks that target keywords are not stuffed into the content",
                default_severity: Severity::Warning,
                category: RuleCategory::Content,
                element: None,
                check: |signals| {
                    let density = signals.content.keyword_density;
                    CheckResult::check(density <= MAX_KEYWORD_DENSITY, || {
                        format!(
                            "Keyword density is {:.1}%, above the {:.0}% where it reads as stuffing",
                            density, MAX_KEYWORD_DENSITY
                        )
                    })
                    .current(format!("{:.1}%", density))
                    .recommended("1-3%")
                },
            },
            Rule {
                id: "content.word_count",
                title: "Thin Content",
                description: "Checks that the page has enough body copy",
                default_severity: Severity::Warning,
                category: RuleCategory::Content,
                element: None,
                check: |signals| {
                    let words = signals.content.word_count;
                    CheckResult::check(words >= MIN_WORD_COUNT, || {
                        format!(
                            "Page has only {} words of content; aim for at least {}",
                            words, MIN_WORD_COUNT
                        )
                    })
                    .current(words)
                    .recommended(format!(">= {} words", MIN_WORD_COUNT))
                },
            },
            Rule {
                id: "content.duplicate_risk",
                title: "Duplicate Content Risk",
                description: "Checks the likelihood that the content duplicates other pages",
                default_severity: Severity::Warning,
                category: RuleCategory::Content,
                element: None,
                check: |signals| {
                    let risk = signals.content.duplicate_risk;
                    CheckResult::check(risk <= MAX_DUPLICATE_RISK, || {
                        format!("Duplicate content risk is {}%", risk)
                    })
                    .current(risk)
                    .recommended(format!("<= {}", MAX_DUPLICATE_RISK))
                },
            },
        ]
    }
}
