//! Per-source fetch orchestration
//!
//! Drives one source adapter across its result pages: per-page timeout,
//! per-page failure isolation, randomized inter-page pacing, and a render
//! session that is released unconditionally at the end. The orchestrator
//! never raises past its own boundary: total failure is zero records plus
//! an error summary, and partial results are always returned.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::error::RenderError;
use crate::listing::JobListing;
use crate::render::{RenderSession, Renderer};
use crate::source::{RecencySampler, SourceAdapter};

// Pacing and timeout defaults
pub(crate) const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_PACING_BASE: Duration = Duration::from_secs(2);
pub(crate) const DEFAULT_PACING_JITTER: Duration = Duration::from_secs(2);

/// Trait for pacing strategies between pages of one source
#[async_trait]
pub trait PagePacer: Send + Sync {
    /// Wait before the next page of the same source is requested
    async fn pause(&self);
}

/// Randomized inter-page delay: base plus up to `jitter` extra
///
/// Paces the request rate against one source to reduce the chance of being
/// blocked. The jitter keeps the interval from being a fixed fingerprint;
/// it is not cosmetic.
pub struct JitterPacer {
    base: Duration,
    jitter: Duration,
}

impl JitterPacer {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }
}

impl Default for JitterPacer {
    fn default() -> Self {
        Self::new(DEFAULT_PACING_BASE, DEFAULT_PACING_JITTER)
    }
}

#[async_trait]
impl PagePacer for JitterPacer {
    async fn pause(&self) {
        let extra = self.jitter.mul_f64(fastrand::f64());
        sleep(self.base + extra).await;
    }
}

/// Pacer that does not wait; for deterministic tests
pub struct NoopPacer;

#[async_trait]
impl PagePacer for NoopPacer {
    async fn pause(&self) {}
}

/// Everything one source fetch produced
///
/// `error` summarizes every page failure, recovered ones included; a
/// source that failed on all pages has an empty `records` and a populated
/// summary, never a propagated error.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: String,
    pub records: Vec<JobListing>,
    pub pages_attempted: u32,
    pub error: Option<String>,
}

/// Drives one source adapter across its pages
pub struct FetchOrchestrator {
    renderer: Arc<dyn Renderer>,
    pacer: Arc<dyn PagePacer>,
    sampler: Arc<dyn RecencySampler>,
    page_timeout: Duration,
}

impl FetchOrchestrator {
    pub fn new(
        renderer: Arc<dyn Renderer>,
        pacer: Arc<dyn PagePacer>,
        sampler: Arc<dyn RecencySampler>,
        page_timeout: Duration,
    ) -> Self {
        Self {
            renderer,
            pacer,
            sampler,
            page_timeout,
        }
    }

    /// Fetch up to `max_pages` pages from one source
    ///
    /// Pages are fetched strictly sequentially so the pacing delay holds.
    /// A failed page is logged and skipped; the loop continues with the
    /// next page. The render session opened at the start is closed on
    /// every exit path.
    pub async fn fetch_source(
        &self,
        adapter: &SourceAdapter,
        query: &str,
        location: &str,
        max_pages: u32,
    ) -> SourceOutcome {
        let mut records = Vec::new();
        let mut failures: Vec<String> = Vec::new();

        let mut session = match self.renderer.open_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(source = adapter.name(), error = %e, "could not open render session");
                return SourceOutcome {
                    source: adapter.name().to_string(),
                    records,
                    pages_attempted: 0,
                    error: Some(format!("session: {e}")),
                };
            }
        };

        for page_index in 0..max_pages {
            let url = adapter.build_page_request(query, location, page_index);
            debug!(
                source = adapter.name(),
                page = page_index + 1,
                total = max_pages,
                %url,
                "fetching page"
            );

            match self.fetch_page(session.as_mut(), adapter, &url).await {
                Ok(page_records) => {
                    debug!(
                        source = adapter.name(),
                        count = page_records.len(),
                        "extracted listings from page"
                    );
                    records.extend(page_records);
                    if page_index + 1 < max_pages {
                        self.pacer.pause().await;
                    }
                }
                Err(e) => {
                    warn!(
                        source = adapter.name(),
                        page = page_index + 1,
                        error = %e,
                        "page failed, continuing with next page"
                    );
                    failures.push(format!("page {}: {e}", page_index + 1));
                }
            }
        }

        // Page failures never escape the loop above, so this close runs on
        // success and failure alike.
        session.close().await;

        info!(
            source = adapter.name(),
            records = records.len(),
            failed_pages = failures.len(),
            "source fetch finished"
        );

        SourceOutcome {
            source: adapter.name().to_string(),
            records,
            pages_attempted: max_pages,
            error: if failures.is_empty() {
                None
            } else {
                Some(failures.join("; "))
            },
        }
    }

    /// Render one page and extract its listings
    ///
    /// The parsed document stays inside this function: it is not `Send`
    /// and must not be held across the caller's suspension points.
    async fn fetch_page(
        &self,
        session: &mut dyn RenderSession,
        adapter: &SourceAdapter,
        url: &str,
    ) -> Result<Vec<JobListing>, RenderError> {
        match timeout(self.page_timeout, session.render(url, adapter.render_options())).await {
            Err(_) => Err(RenderError::Timeout {
                url: url.to_string(),
                seconds: self.page_timeout.as_secs(),
            }),
            Ok(Err(e)) => Err(e),
            Ok(Ok(document)) => Ok(adapter.parse_page(&document, self.sampler.as_ref())),
        }
    }
}
