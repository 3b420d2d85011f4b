use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use seo_plugins::{Issue, Severity};
use uuid::Uuid;

use crate::enums::{FixMethod, IssueStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub from: Option<IssueStatus>,
    pub to: IssueStatus,
    pub at: DateTime<Utc>,
    pub reason: String,
}

/// Persisted history of one issue type on one website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedIssue {
    pub id: Uuid,
    pub website_id: String,
    pub user_id: String,
    pub report_id: Option<Uuid>,
    pub issue_type: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: IssueStatus,
    pub autofix_eligible: bool,
    pub current_value: Option<String>,
    pub recommended_value: Option<String>,
    pub element_path: Option<String>,
    pub status_history: Vec<StatusChange>,
    pub first_detected_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub status_changed_at: DateTime<Utc>,
    pub fix_method: Option<FixMethod>,
    pub resolved_automatically: bool,
    pub previous_status: Option<IssueStatus>,
    pub hours_since_fix: Option<f64>,
}

impl TrackedIssue {
    /// A freshly detected issue.
    pub fn detected(
        website_id: &str,
        user_id: &str,
        report_id: Option<Uuid>,
        issue: &Issue,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            website_id: website_id.to_string(),
            user_id: user_id.to_string(),
            report_id,
            issue_type: issue.issue_type(),
            title: issue.title.clone(),
            description: issue.description.clone(),
            severity: issue.severity,
            status: IssueStatus::Detected,
            autofix_eligible: issue.autofix_eligible(),
            current_value: issue.current_value.clone(),
            recommended_value: issue.recommended_value.clone(),
            element_path: issue.element.clone(),
            status_history: vec![StatusChange {
                from: None,
                to: IssueStatus::Detected,
                at: now,
                reason: "first detected".to_string(),
            }],
            first_detected_at: now,
            last_seen_at: now,
            status_changed_at: now,
            fix_method: None,
            resolved_automatically: false,
            previous_status: None,
            hours_since_fix: None,
        }
    }

    /// Refreshes the descriptive fields from this run's issue without
    /// touching the lifecycle.
    pub fn observe(&mut self, issue: &Issue, report_id: Option<Uuid>, now: DateTime<Utc>) {
        self.title = issue.title.clone();
        self.description = issue.description.clone();
        self.severity = issue.severity;
        self.autofix_eligible = issue.autofix_eligible();
        self.current_value = issue.current_value.clone();
        self.recommended_value = issue.recommended_value.clone();
        self.element_path = issue.element.clone();
        if report_id.is_some() {
            self.report_id = report_id;
        }
        self.last_seen_at = now;
    }

    pub fn hours_in_status(&self, now: DateTime<Utc>) -> f64 {
        (now - self.status_changed_at).num_seconds() as f64 / 3600.0
    }
}

/// A status transition. Applied by the store, which records the history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: IssueStatus,
    pub at: DateTime<Utc>,
    pub reason: String,
    pub fix_method: Option<FixMethod>,
    pub resolved_automatically: bool,
    pub hours_since_fix: Option<f64>,
}

impl StatusUpdate {
    pub fn new(status: IssueStatus, at: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self {
            status,
            at,
            reason: reason.into(),
            fix_method: None,
            resolved_automatically: false,
            hours_since_fix: None,
        }
    }

    pub fn fix_method(mut self, method: FixMethod) -> Self {
        self.fix_method = Some(method);
        self
    }

    pub fn resolved_automatically(mut self) -> Self {
        self.resolved_automatically = true;
        self
    }

    pub fn hours_since_fix(mut self, hours: f64) -> Self {
        self.hours_since_fix = Some(hours);
        self
    }

    pub fn apply(&self, issue: &mut TrackedIssue) {
        issue.status_history.push(StatusChange {
            from: Some(issue.status),
            to: self.status,
            at: self.at,
            reason: self.reason.clone(),
        });
        issue.previous_status = Some(issue.status);
        issue.status = self.status;
        issue.status_changed_at = self.at;
        // Each fix or resolution records its own method, `None` included.
        if self.status.is_closed() || self.fix_method.is_some() {
            issue.fix_method = self.fix_method;
        }
        issue.resolved_automatically = self.resolved_automatically;
        issue.hours_since_fix = self.hours_since_fix;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub statuses: Option<Vec<IssueStatus>>,
    pub issue_type: Option<String>,
}

impl IssueFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_statuses(statuses: &[IssueStatus]) -> Self {
        Self {
            statuses: Some(statuses.to_vec()),
            issue_type: None,
        }
    }

    pub fn matches(&self, issue: &TrackedIssue) -> bool {
        let status_ok = self
            .statuses
            .as_ref()
            .is_none_or(|statuses| statuses.contains(&issue.status));
        let type_ok = self
            .issue_type
            .as_ref()
            .is_none_or(|issue_type| *issue_type == issue.issue_type);
        status_ok && type_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTrackingSummary {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<String, usize>,
    pub open_autofix_eligible: usize,
    pub last_status_change: Option<DateTime<Utc>>,
}

impl IssueTrackingSummary {
    pub fn from_issues<'a>(issues: impl IntoIterator<Item = &'a TrackedIssue>) -> Self {
        let mut summary = Self::default();
        for issue in issues {
            summary.total += 1;
            *summary
                .by_status
                .entry(issue.status.as_str().to_string())
                .or_default() += 1;
            *summary
                .by_severity
                .entry(issue.severity.as_str().to_string())
                .or_default() += 1;
            if issue.status.is_open() && issue.autofix_eligible {
                summary.open_autofix_eligible += 1;
            }
            summary.last_status_change = summary.last_status_change.max(Some(issue.status_changed_at));
        }
        summary
    }

    pub fn count(&self, status: IssueStatus) -> usize {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }
}
