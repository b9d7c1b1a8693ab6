//! Multi-source aggregation: fan-out, merge, rank
//!
//! Runs one fetch task per source adapter, joins them, concatenates their
//! results and stable-sorts by recency. Sources are isolated: one source's
//! total failure never affects another's results or the overall success of
//! the request.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::fetch::{
    FetchOrchestrator, JitterPacer, NoopPacer, PagePacer, DEFAULT_PAGE_TIMEOUT,
};
use crate::listing::{rank_by_recency, JobListing};
use crate::render::Renderer;
use crate::source::{RandomRecency, RecencySampler, Source, SourceAdapter};

/// The combined outcome of one aggregation request
///
/// Constructed once per request and immutable afterwards. Maps are ordered
/// so serialization is deterministic.
#[derive(Debug, Serialize)]
pub struct AggregationResult {
    /// All listings, ranked ascending by recency (unknown last)
    pub records: Vec<JobListing>,
    /// Listings contributed per source, including zero for failed sources
    pub per_source_counts: BTreeMap<String, usize>,
    /// Error summary per source; every failure appears here at least once,
    /// recovered ones included
    pub per_source_errors: BTreeMap<String, String>,
}

/// Aggregates listings across source adapters
///
/// Built through [`Aggregator::builder`]; the builder validates its
/// configuration. Production defaults: jittered pacing, random recency
/// sampling, 30s per-page timeout.
pub struct Aggregator {
    orchestrator: Arc<FetchOrchestrator>,
}

impl Aggregator {
    /// Create an aggregator with default settings
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self::builder(renderer)
            .build()
            .expect("default aggregator configuration is valid")
    }

    /// Create a builder for custom configuration
    pub fn builder(renderer: Arc<dyn Renderer>) -> AggregatorBuilder {
        AggregatorBuilder::new(renderer)
    }

    /// Fetch listings from a single configured source
    pub async fn fetch_listings(
        &self,
        source: Source,
        query: &str,
        location: &str,
        max_pages: u32,
    ) -> Result<AggregationResult, ConfigError> {
        self.aggregate(vec![source.adapter()], query, location, max_pages)
            .await
    }

    /// Fetch listings from every configured source concurrently
    pub async fn fetch_all_listings(
        &self,
        query: &str,
        location: &str,
        max_pages: u32,
    ) -> Result<AggregationResult, ConfigError> {
        let adapters = Source::all().iter().map(|source| source.adapter()).collect();
        self.aggregate(adapters, query, location, max_pages).await
    }

    /// Fan out over the given adapters, then merge and rank
    ///
    /// One task per adapter, each accumulating into its own buffer; results
    /// are joined in adapter order, concatenated (no cross-source dedup;
    /// records are source-scoped) and stable-sorted by recency so ties keep
    /// their page-extraction order.
    pub async fn aggregate(
        &self,
        adapters: Vec<SourceAdapter>,
        query: &str,
        location: &str,
        max_pages: u32,
    ) -> Result<AggregationResult, ConfigError> {
        if max_pages == 0 {
            return Err(ConfigError::InvalidMaxPages(max_pages));
        }

        info!(
            query,
            location,
            max_pages,
            sources = adapters.len(),
            "starting aggregation"
        );

        let mut names = Vec::with_capacity(adapters.len());
        let mut handles = Vec::with_capacity(adapters.len());
        for adapter in adapters {
            names.push(adapter.name().to_string());
            let orchestrator = Arc::clone(&self.orchestrator);
            let query = query.to_string();
            let location = location.to_string();
            handles.push(tokio::spawn(async move {
                orchestrator
                    .fetch_source(&adapter, &query, &location, max_pages)
                    .await
            }));
        }

        let mut records = Vec::new();
        let mut per_source_counts = BTreeMap::new();
        let mut per_source_errors = BTreeMap::new();

        for (name, joined) in names.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(outcome) => {
                    per_source_counts.insert(name.clone(), outcome.records.len());
                    if let Some(error) = outcome.error {
                        per_source_errors.insert(name, error);
                    }
                    records.extend(outcome.records);
                }
                Err(e) => {
                    // A crashed branch degrades to an empty source, exactly
                    // like a source that failed on every page.
                    warn!(source = %name, error = %e, "source task did not complete");
                    per_source_counts.insert(name.clone(), 0);
                    per_source_errors.insert(name, format!("task failed: {e}"));
                }
            }
        }

        rank_by_recency(&mut records);

        info!(total = records.len(), "aggregation finished");

        Ok(AggregationResult {
            records,
            per_source_counts,
            per_source_errors,
        })
    }
}

/// Builder for configuring an [`Aggregator`]
pub struct AggregatorBuilder {
    renderer: Arc<dyn Renderer>,
    pacer: Arc<dyn PagePacer>,
    sampler: Arc<dyn RecencySampler>,
    page_timeout: Duration,
}

impl AggregatorBuilder {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            pacer: Arc::new(JitterPacer::default()),
            sampler: Arc::new(RandomRecency),
            page_timeout: DEFAULT_PAGE_TIMEOUT,
        }
    }

    /// Replace the inter-page pacing strategy
    pub fn pacer(mut self, pacer: Arc<dyn PagePacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Disable inter-page pacing; intended for tests
    pub fn no_pacing(self) -> Self {
        self.pacer(Arc::new(NoopPacer))
    }

    /// Replace the recency sampler
    pub fn recency_sampler(mut self, sampler: Arc<dyn RecencySampler>) -> Self {
        self.sampler = sampler;
        self
    }

    /// Set the per-page render timeout (default: 30s)
    pub fn page_timeout(mut self, page_timeout: Duration) -> Self {
        self.page_timeout = page_timeout;
        self
    }

    /// Build the aggregator, validating the configuration
    pub fn build(self) -> Result<Aggregator, ConfigError> {
        if self.page_timeout.is_zero() {
            return Err(ConfigError::InvalidPageTimeout);
        }
        Ok(Aggregator {
            orchestrator: Arc::new(FetchOrchestrator::new(
                self.renderer,
                self.pacer,
                self.sampler,
                self.page_timeout,
            )),
        })
    }
}
