//! The unit of output: one normalized job listing
//!
//! Listings from every source share this shape; per-source differences are
//! resolved by the adapters before a listing is emitted.

use serde::{Deserialize, Serialize};

/// One normalized job listing
///
/// `title` is never empty in an emitted record. `salary` distinguishes
/// "absent" from "empty". `posted_days_ago` is a recency score used as the
/// ranking key: 0 means today, `None` means unknown and ranks after every
/// real value. `posted` is the display string the score generated; the
/// score is a sort key, not a fact to present beyond that string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub description: String,
    pub url: String,
    pub posted: String,
    pub posted_days_ago: Option<u32>,
    #[serde(rename = "type")]
    pub contract: String,
    pub source: String,
}

impl JobListing {
    /// Ranking key: lower is more recent, unknown ranks last
    pub fn recency_rank(&self) -> u32 {
        self.posted_days_ago.unwrap_or(u32::MAX)
    }
}

/// Stable-sort listings ascending by recency
///
/// Stability matters: each source's own list is already in page-extraction
/// order, which is a meaningful secondary ordering for ties.
pub fn rank_by_recency(listings: &mut [JobListing]) {
    listings.sort_by_key(JobListing::recency_rank);
}
