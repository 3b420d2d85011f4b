use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub website_id: String,
    pub user_id: String,
    pub url: String,
    pub score: u8,
    pub issue_count: usize,
    /// The serialized analysis result.
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub website_id: String,
    pub user_id: String,
    pub url: String,
    pub score: u8,
    pub issue_count: usize,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn from_new(report: NewReport, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            website_id: report.website_id,
            user_id: report.user_id,
            url: report.url,
            score: report.score,
            issue_count: report.issue_count,
            payload: report.payload,
            created_at,
        }
    }
}
