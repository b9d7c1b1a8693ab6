//! Job listing aggregation from rendered-HTML job boards
//!
//! Several boards expose listings only as rendered HTML with frequently
//! changing markup. This crate turns those pages into a uniform, ranked
//! record set. Per-field selector cascades absorb markup drift, and each
//! board is one configuration of a shared adapter type rather than its own
//! scraping routine. The aggregator fans out across sources and keeps
//! partial results when individual sources fail.
//!
//! Rendering is a capability, not a dependency: the aggregator consumes
//! `render(url) → Document` through the [`Renderer`] traits and never
//! launches a browser itself.

// Core modules
mod aggregate;
mod card;
mod cascade;
mod document;
mod error;
mod fetch;
mod listing;
mod render;
mod response;
mod source;

// Public exports
pub use aggregate::{AggregationResult, Aggregator, AggregatorBuilder};
pub use card::{CardConfig, CardExtractor, RawCard};
pub use cascade::{truncate, Capture, SelectorCascade};
pub use document::{Document, Element};
pub use error::{ConfigError, ExtractionError, RenderError};
pub use fetch::{FetchOrchestrator, JitterPacer, NoopPacer, PagePacer, SourceOutcome};
pub use listing::{rank_by_recency, JobListing};
pub use render::{
    HttpRenderer, RenderOptions, RenderSession, Renderer, StaticRenderer, WaitStrategy,
    DEFAULT_RENDER_TIMEOUT, DESKTOP_USER_AGENT,
};
pub use response::{ErrorResponse, ListingsResponse};
pub use source::{
    FixedRecency, Pagination, RandomRecency, RecencySampler, Source, SourceAdapter, SourceConfig,
    DEFAULT_DESCRIPTION_BUDGET,
};
