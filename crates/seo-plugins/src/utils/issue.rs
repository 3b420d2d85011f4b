use serde::{Deserialize, Serialize};

use super::autofix::is_autofix_eligible;
use super::config::{RuleCategory, Severity};
use super::issue_type::normalize_issue_type;

/// One problem detected on this run. Mapped into a tracked issue afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub rule_id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: RuleCategory,
    pub affected_pages: u32,
    autofix_eligible: bool,
    pub current_value: Option<String>,
    pub recommended_value: Option<String>,
    pub element: Option<String>,
}

impl Issue {
    pub fn new(
        rule_id: impl Into<String>,
        title: impl Into<String>,
        severity: Severity,
        category: RuleCategory,
        description: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            rule_id: rule_id.into(),
            autofix_eligible: is_autofix_eligible(&title),
            title,
            description: description.into(),
            severity,
            category,
            affected_pages: 1,
            current_value: None,
            recommended_value: None,
            element: None,
        }
    }

    /// Marks an issue fixable even though its title is not in the autofix table.
    pub fn fixable(mut self) -> Self {
        self.autofix_eligible = true;
        self
    }

    pub fn autofix_eligible(&self) -> bool {
        self.autofix_eligible
    }

    pub fn issue_type(&self) -> String {
        normalize_issue_type(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autofix_flag_comes_from_title() {
        let issue = Issue::new(
            "title.missing",
            "Missing Page Title",
            Severity::Critical,
            RuleCategory::Meta,
            "The page has no title tag",
        );
        assert!(issue.autofix_eligible());
        assert_eq!(issue.issue_type(), "missing_title");

        let issue = Issue::new(
            "content.quality",
            "Low Content Quality",
            Severity::Critical,
            RuleCategory::Content,
            "",
        );
        assert!(!issue.autofix_eligible());
        assert!(issue.fixable().autofix_eligible());
    }
}
