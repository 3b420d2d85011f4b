pub mod config;
pub mod content;
mod error;
pub mod providers;
pub mod service;
pub mod speed;
pub mod tracker;

pub use config::{AuditConfig, ConfigError, ProviderConfig, ProviderKind};
pub use error::AuditError;
pub use html_parser::normalize_url;
pub use providers::{ContentProvider, ProviderError, ProviderResponse};
pub use service::{AnalysisOptions, AnalysisRequest, AnalysisResult, SeoAuditService};
pub use speed::{SpeedProvider, SpeedResult, Strategy};
pub use tracker::{GracePeriods, IssueTracker, ReconcileOutcome};
