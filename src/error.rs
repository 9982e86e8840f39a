//! Error taxonomy for the pipeline.
//!
//! Failures fall into three buckets with different blast radii:
//! - [`ProviderError`]: news discovery is unreachable or rejected the query.
//!   Fatal to the current run; surfaced to the user as rendered text.
//! - [`ExtractionError`]: one article could not be fetched or parsed.
//!   Recovered per-item by substituting the placeholder summary.
//! - [`SummarizeError`]: one completion call failed. Recovered per-item by
//!   substituting the error sentinel.

use thiserror::Error;

/// News discovery provider failure. Propagates to the caller; never
/// recovered per-item because without discovery there are no items.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("news search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("news search returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("news feed could not be parsed: {0}")]
    Feed(String),
}

/// Per-item content fetch or parse failure.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("fetch returned status {0}")]
    Status(reqwest::StatusCode),

    /// The document fetched fine but yielded no usable text. Treated as
    /// "fetch failed", not as "article has no content".
    #[error("no usable text extracted")]
    EmptyBody,

    /// The reader relay response omitted one of its section markers.
    /// A missing marker is a definitive failure, not a best-effort slice.
    #[error("reader response missing `{0}` marker")]
    MissingMarker(&'static str),
}

/// Completion API failure for a single summarization call.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion API returned status {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("completion response had no choices")]
    NoChoices,
}
