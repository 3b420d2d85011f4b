use html_parser::FetchError;
use thiserror::Error;

/// Errors that abort an audit. Everything else degrades to defaults.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
