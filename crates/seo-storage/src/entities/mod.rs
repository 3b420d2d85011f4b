mod report;
mod tracked_issue;
mod website;

pub use report::{NewReport, Report};
pub use tracked_issue::{IssueFilter, IssueTrackingSummary, StatusChange, StatusUpdate, TrackedIssue};
pub use website::{Website, WebsiteUpdate};
