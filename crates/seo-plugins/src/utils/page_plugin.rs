use super::config::{Rule, RuleConfig};
use super::issue::Issue;
use super::signals::AuditSignals;

// Main plugin trait
pub trait SeoPlugin: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    // Get available rules this plugin can check
    fn available_rules(&self) -> Vec<Rule>;

    // Run enabled rules and turn each failed check into an issue
    fn analyze(&self, signals: &AuditSignals, config: &RuleConfig) -> Vec<Issue> {
        self.available_rules()
            .iter()
            .filter(|rule| config.is_rule_enabled(rule.id))
            .filter_map(|rule| {
                let result = (rule.check)(signals);
                if result.passed {
                    return None;
                }
                let mut issue = Issue::new(
                    rule.id,
                    rule.title,
                    config.get_severity(rule.id, rule.default_severity),
                    rule.category,
                    result.message,
                );
                issue.current_value = result.current_value;
                issue.recommended_value = result.recommended_value;
                issue.element = rule.element.map(|e| e.to_string());
                Some(issue)
            })
            .collect()
    }
}
