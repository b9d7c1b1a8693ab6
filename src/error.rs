//! Error types for extraction and rendering operations
//!
//! Extraction errors surface at adapter construction time (bad selector
//! configuration); render errors surface at the page boundary and are
//! recovered by the fetch orchestrator rather than propagated.

/// Errors that can occur while building extraction configuration
///
/// Selector lists are compiled once when a source adapter is constructed,
/// so a malformed selector fails fast instead of silently matching nothing
/// on every page.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// Failed to parse a CSS selector
    #[error("Failed to parse selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// A field cascade was configured without any usable selector
    ///
    /// Raised when every entry in a non-empty rule list failed to compile.
    /// An empty rule list is legal (the field always falls back), but a list
    /// where all entries are malformed is a configuration bug.
    #[error("No usable selector for field '{field}': all {count} rules failed to compile")]
    EmptyCascade { field: String, count: usize },
}

/// Errors in caller-supplied request parameters or aggregator configuration
///
/// The only failures a caller of the aggregation API ever sees; everything
/// else is recovered internally and reported through per-source error
/// summaries.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// maxPages must be at least 1
    #[error("maxPages must be at least 1, got {0}")]
    InvalidMaxPages(u32),

    /// Per-page timeout must be non-zero
    #[error("Page timeout must be non-zero")]
    InvalidPageTimeout,

    /// The requested source is not configured
    #[error("Unknown source '{0}'")]
    UnknownSource(String),
}

/// Errors that can occur while rendering a page
///
/// These are recovered at the page boundary: the orchestrator logs the
/// failure, records it in the source's error summary, and continues with
/// the next page.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Navigation to the page failed
    #[error("Navigation to '{url}' failed: {message}")]
    Navigation { url: String, message: String },

    /// The render did not complete within the per-page timeout
    #[error("Rendering '{url}' timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    /// The render session could not be opened or has gone away
    #[error("Render session unavailable: {message}")]
    Session { message: String },
}
