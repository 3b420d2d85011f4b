use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: String,
    pub user_id: String,
    pub url: String,
    pub name: String,
    pub last_score: Option<u8>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Website {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            name: url.clone(),
            url,
            last_score: None,
            last_analyzed_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Fields written back after each audit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebsiteUpdate {
    pub last_score: Option<u8>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
}

impl WebsiteUpdate {
    pub fn apply(&self, website: &mut Website) {
        if let Some(score) = self.last_score {
            website.last_score = Some(score);
        }
        if let Some(at) = self.last_analyzed_at {
            website.last_analyzed_at = Some(at);
        }
    }
}
