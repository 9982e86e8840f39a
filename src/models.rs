//! Data models carried through the pipeline.
//!
//! - [`NewsItem`]: a discovered headline with its source URL
//! - [`ExtractedContent`]: cleaned article text ready for summarization
//! - [`ItemSummary`]: the per-item outcome, failure states included
//! - [`PipelineOutput`]: the assembled three-tier result

use std::fmt;

/// Substituted when content extraction produced nothing usable.
pub const PLACEHOLDER_SUMMARY: &str = "Try something else or change the trace back period";

/// Substituted when the summarization call itself failed.
pub const SUMMARY_SENTINEL: &str = "Error generating summary";

/// A candidate news item as returned by the discovery provider.
#[derive(Debug, Clone)]
pub struct NewsItem {
    /// Headline, with any trailing publisher attribution stripped.
    pub title: String,
    /// URL of the underlying article.
    pub url: String,
}

/// Cleaned article text produced by a content extractor.
///
/// A successful extraction always carries a non-empty `body`; extractors
/// classify an empty document as a failure rather than returning it.
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    pub title: String,
    pub source_url: String,
    pub body: String,
}

/// Outcome of one unit of pipeline work.
///
/// Failure states are typed rather than threaded through as magic strings;
/// `Display` renders the fixed placeholder/sentinel text the user sees, so
/// aggregation and the final digest always have a value to operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSummary {
    /// Summarization succeeded.
    Done(String),
    /// Extraction yielded no usable text; summarization was skipped.
    NoContent,
    /// Extraction succeeded but the completion call failed.
    Failed,
}

impl fmt::Display for ItemSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemSummary::Done(text) => f.write_str(text),
            ItemSummary::NoContent => f.write_str(PLACEHOLDER_SUMMARY),
            ItemSummary::Failed => f.write_str(SUMMARY_SENTINEL),
        }
    }
}

/// Terminal result of a pipeline run. Rendered and discarded.
///
/// Invariant: `summaries.len() == source_urls.len()`, with entry `i` of each
/// referring to the same input item. Failed items occupy their slot with
/// placeholder text; they are never omitted.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Top-level summary of all per-item summaries.
    pub digest: String,
    /// One rendered summary per input item, in input order.
    pub summaries: Vec<String>,
    /// One source URL per input item, in input order.
    pub source_urls: Vec<String>,
}
