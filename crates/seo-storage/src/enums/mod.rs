mod issue_status;

pub use issue_status::{FixMethod, IssueStatus};
