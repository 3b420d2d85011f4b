use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use seo_plugins::Issue;
use seo_storage::{
    FixMethod, IssueFilter, IssueStatus, SeoStore, StatusUpdate, StorageError, TrackedIssue,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::TrackingConfig;

/// How long a fixed issue may reappear before it is re-opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GracePeriods {
    pub automatic: Duration,
    pub manual: Duration,
}

impl GracePeriods {
    /// Auto-resolved issues carry no fix method and get the manual window.
    pub fn for_method(&self, method: Option<FixMethod>) -> Duration {
        match method {
            Some(FixMethod::Automatic) => self.automatic,
            _ => self.manual,
        }
    }
}

impl From<&TrackingConfig> for GracePeriods {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            automatic: Duration::hours(i64::from(config.auto_fix_grace_hours)),
            manual: Duration::hours(i64::from(config.manual_fix_grace_hours)),
        }
    }
}

impl Default for GracePeriods {
    fn default() -> Self {
        Self::from(&TrackingConfig::default())
    }
}

/// Transitions applied by one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    pub created: usize,
    pub refreshed: usize,
    pub suppressed: usize,
    pub reappeared: usize,
    pub reset: usize,
    pub resolved: usize,
}

pub struct IssueTracker {
    store: Arc<dyn SeoStore>,
    grace: GracePeriods,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl IssueTracker {
    pub fn new(store: Arc<dyn SeoStore>, grace: GracePeriods) -> Self {
        Self {
            store,
            grace,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn website_lock(&self, website_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .lock()
            .entry(website_id.to_string())
            .or_default()
            .clone()
    }

    /// Reconciles this run's issues with the website's tracked issues.
    /// Runs for the same website are serialized.
    pub async fn reconcile(
        &self,
        website_id: &str,
        user_id: &str,
        report_id: Option<Uuid>,
        issues: &[Issue],
        now: DateTime<Utc>,
    ) -> Result<ReconcileOutcome, StorageError> {
        let lock = self.website_lock(website_id);
        let _guard = lock.lock().await;

        let mut existing: HashMap<String, TrackedIssue> = self
            .store
            .get_tracked_issues(website_id, user_id, &IssueFilter::all())
            .await?
            .into_iter()
            .map(|issue| (issue.issue_type.clone(), issue))
            .collect();

        let mut outcome = ReconcileOutcome::default();
        let mut seen = HashSet::new();

        for issue in issues {
            let issue_type = issue.issue_type();
            if !seen.insert(issue_type.clone()) {
                continue;
            }

            let Some(mut tracked) = existing.remove(&issue_type) else {
                let tracked = TrackedIssue::detected(website_id, user_id, report_id, issue, now);
                debug!(website_id, issue_type = %tracked.issue_type, "tracking new issue");
                self.store.create_or_update_issue(tracked).await?;
                outcome.created += 1;
                continue;
            };

            tracked.observe(issue, report_id, now);
            let previous = tracked.status;
            let id = tracked.id;
            let fix_method = tracked.fix_method;
            let hours = tracked.hours_in_status(now);
            let in_grace = now - tracked.status_changed_at < self.grace.for_method(fix_method);
            self.store.create_or_update_issue(tracked).await?;

            match previous {
                IssueStatus::Fixed | IssueStatus::Resolved if in_grace => {
                    debug!(website_id, %issue_type, hours, "reappearance suppressed within grace period");
                    outcome.suppressed += 1;
                }
                IssueStatus::Fixed | IssueStatus::Resolved => {
                    info!(website_id, %issue_type, %previous, hours, "issue reappeared");
                    let update = StatusUpdate::new(
                        IssueStatus::Reappeared,
                        now,
                        format!("detected again {:.1}h after being {}", hours, previous),
                    )
                    .hours_since_fix(hours);
                    self.store.update_issue_status(id, update).await?;
                    outcome.reappeared += 1;
                }
                IssueStatus::Fixing => {
                    info!(website_id, %issue_type, "stale fix attempt reset to detected");
                    let update = StatusUpdate::new(
                        IssueStatus::Detected,
                        now,
                        "fix attempt superseded by a new audit",
                    );
                    self.store.update_issue_status(id, update).await?;
                    outcome.reset += 1;
                }
                IssueStatus::Detected | IssueStatus::Reappeared => {
                    outcome.refreshed += 1;
                }
            }
        }

        for tracked in existing.values().filter(|t| t.status.is_open()) {
            info!(website_id, issue_type = %tracked.issue_type, "issue no longer detected, resolving");
            let update = StatusUpdate::new(IssueStatus::Resolved, now, "no longer detected")
                .resolved_automatically();
            self.store.update_issue_status(tracked.id, update).await?;
            outcome.resolved += 1;
        }

        Ok(outcome)
    }
}
