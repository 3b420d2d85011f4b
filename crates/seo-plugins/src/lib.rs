pub mod plugins;
pub mod recommendations;
pub mod scoring;
pub mod utils;

pub use recommendations::{generate_recommendations, Priority, Recommendation};
pub use scoring::{calculate_score, ScoreBreakdown};
pub use utils::config::{RuleCategory, RuleConfig, Severity};
pub use utils::issue::Issue;
pub use utils::issue_type::normalize_issue_type;
pub use utils::registry::PluginRegistry;
pub use utils::signals::{AuditSignals, ContentSignals, EatScores, KeywordDistribution};

#[cfg(test)]
mod tests {
    use super::*;
    use html_parser::analyze_markup;
    use url::Url;

    #[test]
    fn test_markup_to_issues() {
        let html = r#"
        <html>
            <head>
                <meta name="viewport" content="width=device-width, initial-scale=1">
            </head>
            <body>
                <h1>Welcome</h1>
                <img src="/hero.jpg">
                <a href="/page1">Page 1</a>
                <a href="/page2">Page 2</a>
                <a href="https://external.com">External</a>
            </body>
        </html>
        "#;
        let url = Url::parse("https://example.com/").unwrap();
        let technical = analyze_markup(&url, html);
        let content = ContentSignals::fallback(120);

        let registry = PluginRegistry::default();
        let issues = registry.detect(&AuditSignals::new(&technical, &content));
        let find = |title: &str| issues.iter().find(|i| i.title == title);

        let missing_title = find("Missing Page Title").unwrap();
        assert_eq!(missing_title.severity, Severity::Critical);
        assert!(missing_title.autofix_eligible());
        assert_eq!(
            find("Missing Meta Description").map(|i| i.severity),
            Some(Severity::Critical)
        );
        assert_eq!(
            find("Images Missing Alt Text").map(|i| i.severity),
            Some(Severity::Warning)
        );
        assert!(find("Missing Viewport Meta Tag").is_none());
        assert!(find("Thin Content").is_some());

        let score = calculate_score(&issues, &technical, &content, 50);
        assert!(score.final_score < 100);
    }
}
