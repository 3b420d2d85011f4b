// Core rule types
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::signals::AuditSignals;

// Severity level of an SEO issue
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Points subtracted from the base score per issue.
    pub fn penalty(&self) -> f64 {
        match self {
            Severity::Critical => 12.0,
            Severity::Warning => 6.0,
            Severity::Info => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Content,
    Meta,
    Structure,
    Media,
    Links,
    Mobile,
    Schema,
    Site,
    Performance,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckResult {
    pub passed: bool,
    pub message: String,
    pub current_value: Option<String>,
    pub recommended_value: Option<String>,
}

impl CheckResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn current(mut self, value: impl ToString) -> Self {
        self.current_value = Some(value.to_string());
        self
    }

    pub fn recommended(mut self, value: impl Into<String>) -> Self {
        self.recommended_value = Some(value.into());
        self
    }

    /// `pass()` when `condition` holds, otherwise `fail(message())`.
    pub fn check(condition: bool, message: impl FnOnce() -> String) -> Self {
        if condition {
            Self::pass()
        } else {
            Self::fail(message())
        }
    }
}

// Rule definition
#[derive(Clone)]
pub struct Rule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub default_severity: Severity,
    pub category: RuleCategory,
    /// Path of the element the rule inspects, e.g. `head > title`.
    pub element: Option<&'static str>,
    pub check: fn(&AuditSignals) -> CheckResult,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RuleDisplay {
    pub id: String,
    pub title: String,
    pub description: String,
    pub plugin_name: String,
    pub default_severity: Severity,
    pub category: RuleCategory,
}

// Configuration for which rules to run. Every rule is enabled unless disabled here.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RuleConfig {
    disabled_rules: HashSet<String>,
    rule_severities: HashMap<String, Severity>,
}

impl RuleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_rule(&mut self, rule_id: &str) {
        self.disabled_rules.remove(rule_id);
    }

    pub fn disable_rule(&mut self, rule_id: &str) {
        self.disabled_rules.insert(rule_id.to_string());
    }

    pub fn set_severity(&mut self, rule_id: &str, severity: Severity) {
        self.rule_severities.insert(rule_id.to_string(), severity);
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.contains(rule_id)
    }

    pub fn get_severity(&self, rule_id: &str, default: Severity) -> Severity {
        self.rule_severities
            .get(rule_id)
            .copied()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_config_defaults_to_enabled() {
        let mut config = RuleConfig::new();
        assert!(config.is_rule_enabled("title.missing"));

        config.disable_rule("title.missing");
        assert!(!config.is_rule_enabled("title.missing"));

        config.enable_rule("title.missing");
        assert!(config.is_rule_enabled("title.missing"));
    }

    #[test]
    fn test_severity_override() {
        let mut config = RuleConfig::new();
        assert_eq!(
            config.get_severity("schema.faq", Severity::Info),
            Severity::Info
        );
        config.set_severity("schema.faq", Severity::Warning);
        assert_eq!(
            config.get_severity("schema.faq", Severity::Info),
            Severity::Warning
        );
    }

    #[test]
    fn test_rule_config_from_json() {
        let config: RuleConfig =
            serde_json::from_str(r#"{"disabled_rules": ["site.sitemap"]}"#).unwrap();
        assert!(!config.is_rule_enabled("site.sitemap"));
        assert!(config.is_rule_enabled("site.robots"));
    }

    #[test]
    fn test_penalties() {
        assert_eq!(Severity::Critical.penalty(), 12.0);
        assert_eq!(Severity::Warning.penalty(), 6.0);
        assert_eq!(Severity::Info.penalty(), 2.0);
    }
}
