use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a tracked issue.
///
/// `Fixing` is only ever set from outside the audit engine. `Fixed` and
/// `Resolved` are quiescent but can be re-opened as `Reappeared`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Detected,
    Fixing,
    Fixed,
    Resolved,
    Reappeared,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 5] = [
        IssueStatus::Detected,
        IssueStatus::Fixing,
        IssueStatus::Fixed,
        IssueStatus::Resolved,
        IssueStatus::Reappeared,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Detected => "detected",
            IssueStatus::Fixing => "fixing",
            IssueStatus::Fixed => "fixed",
            IssueStatus::Resolved => "resolved",
            IssueStatus::Reappeared => "reappeared",
        }
    }

    /// Still needs attention.
    pub fn is_open(&self) -> bool {
        matches!(self, IssueStatus::Detected | IssueStatus::Reappeared)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, IssueStatus::Fixed | IssueStatus::Resolved)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a closed issue got fixed. Picks the grace window on re-detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixMethod {
    Automatic,
    Manual,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_groups() {
        let open: Vec<_> = IssueStatus::ALL.iter().filter(|s| s.is_open()).collect();
        assert_eq!(open, vec![&IssueStatus::Detected, &IssueStatus::Reappeared]);
        assert!(IssueStatus::Resolved.is_closed());
        assert!(!IssueStatus::Fixing.is_open());
        assert!(!IssueStatus::Fixing.is_closed());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&IssueStatus::Reappeared).unwrap(),
            "\"reappeared\""
        );
        assert_eq!(IssueStatus::Fixed.to_string(), "fixed");
    }
}
