use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub use database::common::timestamp;

/// One recorded page view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitTrack {
    pub id: String,
    /// Stable per browser via the `visitor_id` cookie
    pub visitor_id: String,
    pub page: String,
    pub user_agent: String,
    pub ip_address: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl VisitTrack {
    pub fn new(
        visitor_id: impl Into<String>,
        page: impl Into<String>,
        user_agent: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            visitor_id: visitor_id.into(),
            page: page.into(),
            user_agent: user_agent.into(),
            ip_address: ip_address.into(),
            timestamp: timestamp::now(),
            session_id: None,
            user_id: None,
        }
    }
}

/// Views per page, as grouped by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageViews {
    #[serde(rename = "_id")]
    pub page: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VisitorTotals {
    pub total: u64,
    pub unique: u64,
}
