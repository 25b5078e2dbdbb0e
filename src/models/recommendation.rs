use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MemberId, NewsArticle};

/// Response body for a member's news recommendations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub member_id: MemberId,
    /// True when the member had no row in the engine and the popularity
    /// fallback was used
    pub cold_start: bool,
    pub recommendations: Vec<NewsArticle>,
}

/// Summary of the currently loaded engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub members: usize,
    pub articles: usize,
    pub keywords: usize,
    pub seed: Option<u64>,
    pub built_at: DateTime<Utc>,
}
