pub mod entities;
pub mod enums;
mod error;
mod memory;
mod sqlite;

use async_trait::async_trait;
use uuid::Uuid;

pub use entities::{
    IssueFilter, IssueTrackingSummary, NewReport, Report, StatusChange, StatusUpdate, TrackedIssue,
    Website, WebsiteUpdate,
};
pub use enums::{FixMethod, IssueStatus};
pub use error::StorageError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence used by the audit engine. Implementations must be safe to
/// share between concurrent audits.
#[async_trait]
pub trait SeoStore: Send + Sync {
    async fn get_website(&self, website_id: &str, user_id: &str) -> Result<Website, StorageError>;

    async fn create_report(&self, report: NewReport) -> Result<Report, StorageError>;

    async fn update_website(
        &self,
        website_id: &str,
        update: WebsiteUpdate,
    ) -> Result<Website, StorageError>;

    async fn get_tracked_issues(
        &self,
        website_id: &str,
        user_id: &str,
        filter: &IssueFilter,
    ) -> Result<Vec<TrackedIssue>, StorageError>;

    /// Inserts the issue, or replaces the record with the same id.
    async fn create_or_update_issue(&self, issue: TrackedIssue)
        -> Result<TrackedIssue, StorageError>;

    async fn update_issue_status(
        &self,
        issue_id: Uuid,
        update: StatusUpdate,
    ) -> Result<TrackedIssue, StorageError>;

    async fn get_issue_tracking_summary(
        &self,
        website_id: &str,
        user_id: &str,
    ) -> Result<IssueTrackingSummary, StorageError>;
}
