use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::{
    IssueFilter, IssueTrackingSummary, NewReport, Report, StatusUpdate, TrackedIssue, Website,
    WebsiteUpdate,
};
use crate::error::StorageError;
use crate::SeoStore;

#[derive(Debug, Default)]
struct State {
    websites: HashMap<String, Website>,
    reports: Vec<Report>,
    issues: Vec<TrackedIssue>,
}

/// Volatile store for tests and one-off audits. Nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the website, replacing an existing record with the same id.
    pub async fn add_website(&self, website: Website) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        state.websites.insert(website.id.clone(), website);
        Ok(())
    }

    pub async fn reports(&self, website_id: &str) -> Vec<Report> {
        let state = self.state.read().await;
        state
            .reports
            .iter()
            .filter(|r| r.website_id == website_id)
            .cloned()
            .collect()
    }
}

fn owned_by(website: &Website, user_id: &str) -> bool {
    website.user_id == user_id
}

#[async_trait]
impl SeoStore for MemoryStore {
    async fn get_website(&self, website_id: &str, user_id: &str) -> Result<Website, StorageError> {
        let state = self.state.read().await;
        state
            .websites
            .get(website_id)
            .filter(|w| owned_by(w, user_id))
            .cloned()
            .ok_or_else(|| StorageError::not_found("website", website_id))
    }

    async fn create_report(&self, report: NewReport) -> Result<Report, StorageError> {
        let mut state = self.state.write().await;
        if !state.websites.contains_key(&report.website_id) {
            return Err(StorageError::not_found("website", &report.website_id));
        }
        let report = Report::from_new(report, Utc::now());
        state.reports.push(report.clone());
        Ok(report)
    }

    async fn update_website(
        &self,
        website_id: &str,
        update: WebsiteUpdate,
    ) -> Result<Website, StorageError> {
        let mut state = self.state.write().await;
        let website = state
            .websites
            .get_mut(website_id)
            .ok_or_else(|| StorageError::not_found("website", website_id))?;
        update.apply(website);
        let website = website.clone();
        Ok(website)
    }

    async fn get_tracked_issues(
        &self,
        website_id: &str,
        user_id: &str,
        filter: &IssueFilter,
    ) -> Result<Vec<TrackedIssue>, StorageError> {
        let state = self.state.read().await;
        Ok(state
            .issues
            .iter()
            .filter(|i| i.website_id == website_id && i.user_id == user_id)
            .filter(|i| filter.matches(i))
            .cloned()
            .collect())
    }

    async fn create_or_update_issue(
        &self,
        issue: TrackedIssue,
    ) -> Result<TrackedIssue, StorageError> {
        let mut state = self.state.write().await;
        let duplicate = state.issues.iter().any(|existing| {
            existing.id != issue.id
                && existing.website_id == issue.website_id
                && existing.issue_type == issue.issue_type
        });
        if duplicate {
            return Err(StorageError::Conflict(format!(
                "website {} already tracks {}",
                issue.website_id, issue.issue_type
            )));
        }
        match state.issues.iter_mut().find(|existing| existing.id == issue.id) {
            Some(existing) => *existing = issue.clone(),
            None => state.issues.push(issue.clone()),
        }
        Ok(issue)
    }

    async fn update_issue_status(
        &self,
        issue_id: Uuid,
        update: StatusUpdate,
    ) -> Result<TrackedIssue, StorageError> {
        let mut state = self.state.write().await;
        let issue = state
            .issues
            .iter_mut()
            .find(|i| i.id == issue_id)
            .ok_or_else(|| StorageError::not_found("issue", issue_id))?;
        update.apply(issue);
        let issue = issue.clone();
        Ok(issue)
    }

    async fn get_issue_tracking_summary(
        &self,
        website_id: &str,
        user_id: &str,
    ) -> Result<IssueTrackingSummary, StorageError> {
        let state = self.state.read().await;
        Ok(IssueTrackingSummary::from_issues(
            state
                .issues
                .iter()
                .filter(|i| i.website_id == website_id && i.user_id == user_id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{FixMethod, IssueStatus};
    use chrono::Duration;
    use seo_plugins::{Issue, RuleCategory, Severity};

    fn issue(title: &str, severity: Severity) -> Issue {
        Issue::new("test.rule", title, severity, RuleCategory::Meta, "description")
    }

    async fn store_with_site() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .add_website(Website::new("site-1", "user-1", "https://example.com"))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_website_ownership() {
        let store = store_with_site().await;
        assert!(store.get_website("site-1", "user-1").await.is_ok());
        assert!(matches!(
            store.get_website("site-1", "someone-else").await,
            Err(StorageError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_report_and_website_update() {
        let store = store_with_site().await;
        let report = store
            .create_report(NewReport {
                website_id: "site-1".to_string(),
                user_id: "user-1".to_string(),
                url: "https://example.com".to_string(),
                score: 81,
                issue_count: 3,
                payload: serde_json::json!({"score": 81}),
            })
            .await
            .unwrap();
        assert_eq!(store.reports("site-1").await, vec![report.clone()]);

        let website = store
            .update_website(
                "site-1",
                WebsiteUpdate {
                    last_score: Some(81),
                    last_analyzed_at: Some(report.created_at),
                },
            )
            .await
            .unwrap();
        assert_eq!(website.last_score, Some(81));
        assert_eq!(website.last_analyzed_at, Some(report.created_at));
    }

    #[tokio::test]
    async fn test_report_for_unknown_website() {
        let store = MemoryStore::new();
        let result = store
            .create_report(NewReport {
                website_id: "missing".to_string(),
                user_id: "user-1".to_string(),
                url: "https://example.com".to_string(),
                score: 50,
                issue_count: 0,
                payload: serde_json::Value::Null,
            })
            .await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_issue_status_history() {
        let store = store_with_site().await;
        let now = Utc::now();
        let tracked = TrackedIssue::detected(
            "site-1",
            "user-1",
            None,
            &issue("Missing Page Title", Severity::Critical),
            now,
        );
        let id = tracked.id;
        store.create_or_update_issue(tracked).await.unwrap();

        let later = now + Duration::hours(2);
        let updated = store
            .update_issue_status(
                id,
                StatusUpdate::new(IssueStatus::Fixed, later, "fixed by autofix")
                    .fix_method(FixMethod::Automatic),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, IssueStatus::Fixed);
        assert_eq!(updated.previous_status, Some(IssueStatus::Detected));
        assert_eq!(updated.fix_method, Some(FixMethod::Automatic));
        assert_eq!(updated.status_changed_at, later);
        assert_eq!(updated.status_history.len(), 2);

        let open = store
            .get_tracked_issues(
                "site-1",
                "user-1",
                &IssueFilter::with_statuses(&[IssueStatus::Detected]),
            )
            .await
            .unwrap();
        assert!(open.is_empty());
    }

    #[tokio::test]
    async fn test_one_record_per_issue_type() {
        let store = store_with_site().await;
        let now = Utc::now();
        let first = TrackedIssue::detected(
            "site-1",
            "user-1",
            None,
            &issue("Title Too Short", Severity::Warning),
            now,
        );
        store.create_or_update_issue(first).await.unwrap();
        let second = TrackedIssue::detected(
            "site-1",
            "user-1",
            None,
            &issue("Title Too Long", Severity::Warning),
            now,
        );
        assert!(matches!(
            store.create_or_update_issue(second).await,
            Err(StorageError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_tracking_summary() {
        let store = store_with_site().await;
        let now = Utc::now();
        for (title, severity) in [
            ("Missing Page Title", Severity::Critical),
            ("Missing XML Sitemap", Severity::Info),
            ("Low Content Quality", Severity::Critical),
        ] {
            let tracked =
                TrackedIssue::detected("site-1", "user-1", None, &issue(title, severity), now);
            store.create_or_update_issue(tracked).await.unwrap();
        }
        let summary = store
            .get_issue_tracking_summary("site-1", "user-1")
            .await
            .unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.count(IssueStatus::Detected), 3);
        assert_eq!(summary.by_severity.get("critical"), Some(&2));
        // Low Content Quality is not autofix eligible.
        assert_eq!(summary.open_autofix_eligible, 2);
        assert_eq!(summary.last_status_change, Some(now));
    }
}
