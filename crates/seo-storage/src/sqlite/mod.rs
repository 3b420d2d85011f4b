use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{
    IssueFilter, IssueTrackingSummary, NewReport, Report, StatusUpdate, TrackedIssue, Website,
    WebsiteUpdate,
};
use crate::error::StorageError;
use crate::SeoStore;

mod report;
mod tracked_issue;
mod website;

/// SQLite-backed store. The schema is migrated on connect.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let mut options = ConnectOptions::new(url.to_string());
        // SQLite has a single writer; one connection also keeps `:memory:`
        // databases alive across queries.
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await?;
        Migrator::up(&db, None).await?;
        debug!(url, "store migrated");
        Ok(Self { db })
    }

    /// Opens the database file at `path`, creating it when missing.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::connect(&format!("sqlite://{}?mode=rwc", path.as_ref().display())).await
    }

    pub async fn in_memory() -> Result<Self, StorageError> {
        Self::connect("sqlite::memory:").await
    }

    /// Registers the website, replacing an existing record with the same id.
    pub async fn add_website(&self, website: Website) -> Result<(), StorageError> {
        let exists = website::Entity::find_by_id(website.id.clone())
            .one(&self.db)
            .await?
            .is_some();
        let active = website::ActiveModel {
            id: Set(website.id),
            user_id: Set(website.user_id),
            url: Set(website.url),
            name: Set(website.name),
            last_score: Set(website.last_score.map(i32::from)),
            last_analyzed_at: Set(website.last_analyzed_at),
            created_at: Set(website.created_at),
        };
        if exists {
            active.update(&self.db).await?;
        } else {
            active.insert(&self.db).await?;
        }
        Ok(())
    }

    pub async fn reports(&self, website_id: &str) -> Result<Vec<Report>, StorageError> {
        report::Entity::find()
            .filter(report::Column::WebsiteId.eq(website_id))
            .order_by_asc(report::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Report::try_from)
            .collect()
    }

    async fn find_issue(&self, id: &str) -> Result<Option<tracked_issue::Model>, StorageError> {
        Ok(tracked_issue::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?)
    }

    async fn save_issue(&self, issue: &TrackedIssue, exists: bool) -> Result<(), StorageError> {
        let active = tracked_issue::ActiveModel {
            id: Set(issue.id.to_string()),
            website_id: Set(issue.website_id.clone()),
            user_id: Set(issue.user_id.clone()),
            issue_type: Set(issue.issue_type.clone()),
            status: Set(issue.status.as_str().to_string()),
            first_detected_at: Set(issue.first_detected_at),
            data: Set(serde_json::to_value(issue)?),
        };
        if exists {
            active.update(&self.db).await?;
        } else {
            active.insert(&self.db).await?;
        }
        Ok(())
    }
}

impl From<website::Model> for Website {
    fn from(model: website::Model) -> Self {
        Website {
            id: model.id,
            user_id: model.user_id,
            url: model.url,
            name: model.name,
            last_score: model.last_score.and_then(|s| u8::try_from(s).ok()),
            last_analyzed_at: model.last_analyzed_at,
            created_at: model.created_at,
        }
    }
}

impl TryFrom<report::Model> for Report {
    type Error = StorageError;

    fn try_from(model: report::Model) -> Result<Self, Self::Error> {
        Ok(Report {
            id: parse_id(&model.id)?,
            website_id: model.website_id,
            user_id: model.user_id,
            url: model.url,
            score: u8::try_from(model.score)
                .map_err(|_| StorageError::InvalidRecord(format!("report score {}", model.score)))?,
            issue_count: usize::try_from(model.issue_count).unwrap_or_default(),
            payload: model.payload,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<tracked_issue::Model> for TrackedIssue {
    type Error = StorageError;

    fn try_from(model: tracked_issue::Model) -> Result<Self, Self::Error> {
        Ok(serde_json::from_value(model.data)?)
    }
}

fn parse_id(id: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(id).map_err(|e| StorageError::InvalidRecord(format!("id {}: {}", id, e)))
}

#[async_trait]
impl SeoStore for SqliteStore {
    async fn get_website(&self, website_id: &str, user_id: &str) -> Result<Website, StorageError> {
        website::Entity::find_by_id(website_id.to_string())
            .filter(website::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map(Website::from)
            .ok_or_else(|| StorageError::not_found("website", website_id))
    }

    async fn create_report(&self, report: NewReport) -> Result<Report, StorageError> {
        if website::Entity::find_by_id(report.website_id.clone())
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(StorageError::not_found("website", &report.website_id));
        }

        let report = Report::from_new(report, Utc::now());
        report::ActiveModel {
            id: Set(report.id.to_string()),
            website_id: Set(report.website_id.clone()),
            user_id: Set(report.user_id.clone()),
            url: Set(report.url.clone()),
            score: Set(i32::from(report.score)),
            issue_count: Set(i64::try_from(report.issue_count).unwrap_or(i64::MAX)),
            payload: Set(report.payload.clone()),
            created_at: Set(report.created_at),
        }
        .insert(&self.db)
        .await?;
        Ok(report)
    }

    async fn update_website(
        &self,
        website_id: &str,
        update: WebsiteUpdate,
    ) -> Result<Website, StorageError> {
        let model = website::Entity::find_by_id(website_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| StorageError::not_found("website", website_id))?;
        let mut website = Website::from(model.clone());
        update.apply(&mut website);

        let mut active: website::ActiveModel = model.into();
        active.last_score = Set(website.last_score.map(i32::from));
        active.last_analyzed_at = Set(website.last_analyzed_at);
        active.update(&self.db).await?;
        Ok(website)
    }

    async fn get_tracked_issues(
        &self,
        website_id: &str,
        user_id: &str,
        filter: &IssueFilter,
    ) -> Result<Vec<TrackedIssue>, StorageError> {
        let mut query = tracked_issue::Entity::find()
            .filter(tracked_issue::Column::WebsiteId.eq(website_id))
            .filter(tracked_issue::Column::UserId.eq(user_id));
        if let Some(statuses) = &filter.statuses {
            query = query.filter(
                tracked_issue::Column::Status.is_in(statuses.iter().map(|s| s.as_str())),
            );
        }
        if let Some(issue_type) = &filter.issue_type {
            query = query.filter(tracked_issue::Column::IssueType.eq(issue_type.as_str()));
        }

        query
            .order_by_asc(tracked_issue::Column::FirstDetectedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(TrackedIssue::try_from)
            .collect()
    }

    async fn create_or_update_issue(
        &self,
        issue: TrackedIssue,
    ) -> Result<TrackedIssue, StorageError> {
        let id = issue.id.to_string();
        let duplicate = tracked_issue::Entity::find()
            .filter(tracked_issue::Column::WebsiteId.eq(issue.website_id.as_str()))
            .filter(tracked_issue::Column::IssueType.eq(issue.issue_type.as_str()))
            .filter(tracked_issue::Column::Id.ne(id.as_str()))
            .one(&self.db)
            .await?;
        if duplicate.is_some() {
            return Err(StorageError::Conflict(format!(
                "website {} already tracks {}",
                issue.website_id, issue.issue_type
            )));
        }

        let exists = self.find_issue(&id).await?.is_some();
        self.save_issue(&issue, exists).await?;
        Ok(issue)
    }

    async fn update_issue_status(
        &self,
        issue_id: Uuid,
        update: StatusUpdate,
    ) -> Result<TrackedIssue, StorageError> {
        let model = self
            .find_issue(&issue_id.to_string())
            .await?
            .ok_or_else(|| StorageError::not_found("issue", issue_id))?;
        let mut issue = TrackedIssue::try_from(model)?;
        update.apply(&mut issue);
        self.save_issue(&issue, true).await?;
        Ok(issue)
    }

    async fn get_issue_tracking_summary(
        &self,
        website_id: &str,
        user_id: &str,
    ) -> Result<IssueTrackingSummary, StorageError> {
        let issues = self
            .get_tracked_issues(website_id, user_id, &IssueFilter::all())
            .await?;
        Ok(IssueTrackingSummary::from_issues(&issues))
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

    async fn store_with_site() -> SqliteStore {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .add_website(Website::new("site-1", "user-1", "https://example.com"))
            .await
            .unwrap();
        store
    }

    fn new_report(website_id: &str, score: u8) -> NewReport {
        NewReport {
            website_id: website_id.to_string(),
            user_id: "user-1".to_string(),
            url: "https://example.com".to_string(),
            score,
            issue_count: 3,
            payload: serde_json::json!({"score": score}),
        }
    }

    #[tokio::test]
    async fn test_website_ownership() {
        let store = store_with_site().await;
        let website = store.get_website("site-1", "user-1").await.unwrap();
        assert_eq!(website.url, "https://example.com");
        assert!(matches!(
            store.get_website("site-1", "someone-else").await,
            Err(StorageError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_report_and_website_update() {
        let store = store_with_site().await;
        let report = store.create_report(new_report("site-1", 81)).await.unwrap();

        let reports = store.reports("site-1").await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, report.id);
        assert_eq!(reports[0].payload["score"], 81);

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
        let stored = store.get_website("site-1", "user-1").await.unwrap();
        assert_eq!(stored.last_score, Some(81));
        assert!(stored.last_analyzed_at.is_some());
    }

    #[tokio::test]
    async fn test_report_for_unknown_website() {
        let store = SqliteStore::in_memory().await.unwrap();
        let result = store.create_report(new_report("missing", 50)).await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_issue_status_and_filters() {
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
        store.create_or_update_issue(tracked.clone()).await.unwrap();
        let stored = store
            .get_tracked_issues("site-1", "user-1", &IssueFilter::all())
            .await
            .unwrap();
        assert_eq!(stored, vec![tracked]);

        let updated = store
            .update_issue_status(
                id,
                StatusUpdate::new(IssueStatus::Fixed, now + Duration::hours(2), "fixed by autofix")
                    .fix_method(FixMethod::Automatic),
            )
            .await
            .unwrap();
        assert_eq!(updated.previous_status, Some(IssueStatus::Detected));
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
        let fixed = store
            .get_tracked_issues(
                "site-1",
                "user-1",
                &IssueFilter::with_statuses(&[IssueStatus::Fixed]),
            )
            .await
            .unwrap();
        assert_eq!(fixed, vec![updated]);
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
        store.create_or_update_issue(first.clone()).await.unwrap();
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

        // Saving the same record again is an update.
        let mut first = first;
        first.last_seen_at = now + Duration::hours(1);
        store.create_or_update_issue(first.clone()).await.unwrap();
        let stored = store
            .get_tracked_issues("site-1", "user-1", &IssueFilter::all())
            .await
            .unwrap();
        assert_eq!(stored, vec![first]);
    }

    #[tokio::test]
    async fn test_tracking_summary() {
        let store = store_with_site().await;
        let now = Utc::now();
        for (title, severity) in [
            ("Missing Page Title", Severity::Critical),
            ("Missing XML Sitemap", Severity::Info),
        ] {
            let tracked =
                TrackedIssue::detected("site-1", "user-1", None, &issue(title, severity), now);
            store.create_or_update_issue(tracked).await.unwrap();
        }
        let summary = store
            .get_issue_tracking_summary("site-1", "user-1")
            .await
            .unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.count(IssueStatus::Detected), 2);
        assert_eq!(summary.by_severity.get("critical"), Some(&1));
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.db");

        let store = SqliteStore::open(&path).await.unwrap();
        store
            .add_website(Website::new("site-1", "user-1", "https://example.com"))
            .await
            .unwrap();
        let tracked = TrackedIssue::detected(
            "site-1",
            "user-1",
            None,
            &issue("Missing H1 Tag", Severity::Critical),
            Utc::now(),
        );
        store.create_or_update_issue(tracked.clone()).await.unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).await.unwrap();
        let issues = reopened
            .get_tracked_issues("site-1", "user-1", &IssueFilter::all())
            .await
            .unwrap();
        assert_eq!(issues, vec![tracked]);
    }
}
