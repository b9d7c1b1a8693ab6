//! Wire shapes for the serving layer
//!
//! The HTTP layer that fronts the aggregator is an external collaborator;
//! these types define the JSON it returns so every embedding serializes the
//! same shape.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregationResult;
use crate::listing::JobListing;

/// Successful response: `{success, count, perSourceCounts, jobs}`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsResponse {
    pub success: bool,
    pub count: usize,
    pub per_source_counts: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub per_source_errors: BTreeMap<String, String>,
    pub jobs: Vec<JobListing>,
}

impl From<AggregationResult> for ListingsResponse {
    fn from(result: AggregationResult) -> Self {
        Self {
            success: true,
            count: result.records.len(),
            per_source_counts: result.per_source_counts,
            per_source_errors: result.per_source_errors,
            jobs: result.records,
        }
    }
}

/// Total-failure response: `{success: false, error}`
///
/// Only malformed request parameters produce this; per-source failures are
/// partial results, not errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Display) -> Self {
        Self {
            success: false,
            error: error.to_string(),
        }
    }
}
