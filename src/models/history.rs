use serde::{Deserialize, Serialize};

use super::{KeywordId, MemberId};

/// A single read-count observation for a (member, keyword) pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReadObservation {
    pub member_id: MemberId,
    pub keyword_id: KeywordId,
    pub read_count: i32,
}

/// Result of recording an observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordOutcome {
    /// The observation was stored
    Recorded,
    /// A row for the same (member, keyword) already existed; nothing was written
    Duplicate,
}
