//! Pipeline orchestration: fan out extraction + summarization over all
//! candidate items, join the results positionally, then fold everything
//! into one top-level digest.
//!
//! Workers complete in arbitrary order; each completion carries its
//! submission index and is written back into the slot matching its source
//! item, so `summaries[i]` always pairs with `source_urls[i]`. A failure in
//! one unit of work never aborts the others: extraction failures become the
//! placeholder entry, summarization failures the sentinel entry.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use crate::api::Summarize;
use crate::extract::ContentExtractor;
use crate::models::{ItemSummary, NewsItem, PipelineOutput, SUMMARY_SENTINEL};

/// Fixed worker-pool bound for concurrent extraction + summarization.
pub const MAX_CONCURRENT: usize = 5;

/// Run the full pipeline over `items`.
///
/// Phase 1 dispatches one unit of work per item into a bounded pool,
/// phase 2 joins completions into input order, phase 3 summarizes the
/// newline-joined per-item summaries (placeholders included) into the
/// digest.
#[instrument(level = "info", skip_all, fields(items = items.len()))]
pub async fn run<E, S>(items: Vec<NewsItem>, extractor: &E, summarizer: &S) -> PipelineOutput
where
    E: ContentExtractor,
    S: Summarize,
{
    let total = items.len();
    let source_urls: Vec<String> = items.iter().map(|i| i.url.clone()).collect();

    if total == 0 {
        info!("no items to process");
        return PipelineOutput {
            digest: String::new(),
            summaries: Vec::new(),
            source_urls,
        };
    }

    let completions: Vec<(usize, ItemSummary)> = stream::iter(items.iter().enumerate())
        .map(|(i, item)| async move {
            debug!(index = i, url = %item.url, "processing item");
            (i, process_item(item, extractor, summarizer).await)
        })
        .buffer_unordered(MAX_CONCURRENT)
        .collect()
        .await;

    // Indexed slot assignment: completion order is arbitrary.
    let mut slots: Vec<ItemSummary> = vec![ItemSummary::NoContent; total];
    for (i, outcome) in completions {
        slots[i] = outcome;
    }

    let failed = slots.iter().filter(|s| !matches!(s, ItemSummary::Done(_))).count();
    info!(total, failed, "per-item processing complete");

    let summaries: Vec<String> = slots.iter().map(|s| s.to_string()).collect();

    let digest = match summarizer.summarize(&summaries.join("\n")).await {
        Ok(d) => d,
        Err(e) => {
            warn!(error = %e, "digest summarization failed");
            SUMMARY_SENTINEL.to_string()
        }
    };

    PipelineOutput {
        digest,
        summaries,
        source_urls,
    }
}

/// One unit of work: extract, then summarize. Extraction failure
/// short-circuits to [`ItemSummary::NoContent`] without touching the
/// completion API.
async fn process_item<E, S>(item: &NewsItem, extractor: &E, summarizer: &S) -> ItemSummary
where
    E: ContentExtractor,
    S: Summarize,
{
    let content = match extractor.extract(&item.url).await {
        Ok(content) => content,
        Err(e) => {
            warn!(url = %item.url, error = %e, "extraction failed");
            return ItemSummary::NoContent;
        }
    };

    // Discovered items carry their headline; pasted links rely on the
    // title the extractor recovered.
    let title = if item.title.is_empty() {
        content.title.as_str()
    } else {
        item.title.as_str()
    };
    let text = format!("{} {}", title, content.body);

    match summarizer.summarize(&text).await {
        Ok(s) => ItemSummary::Done(s),
        Err(e) => {
            warn!(url = %item.url, error = %e, "summarization failed");
            ItemSummary::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, SummarizeError};
    use crate::models::{ExtractedContent, PLACEHOLDER_SUMMARY};
    use std::collections::HashSet;
    use std::time::Duration;

    struct StubExtractor {
        fail_urls: HashSet<String>,
        /// Per-call artificial latency, keyed by URL. Lets tests force
        /// out-of-submission-order completion.
        delays_ms: Vec<(String, u64)>,
    }

    impl StubExtractor {
        fn new() -> Self {
            Self {
                fail_urls: HashSet::new(),
                delays_ms: Vec::new(),
            }
        }

        fn failing_on(mut self, url: &str) -> Self {
            self.fail_urls.insert(url.to_string());
            self
        }

        fn delayed(mut self, url: &str, ms: u64) -> Self {
            self.delays_ms.push((url.to_string(), ms));
            self
        }
    }

    impl ContentExtractor for StubExtractor {
        async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError> {
            if let Some((_, ms)) = self.delays_ms.iter().find(|(u, _)| u == url) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.fail_urls.contains(url) {
                return Err(ExtractionError::EmptyBody);
            }
            Ok(ExtractedContent {
                title: format!("title of {url}"),
                source_url: url.to_string(),
                body: format!("body of {url}"),
            })
        }
    }

    struct StubSummarizer {
        fail_all: bool,
    }

    impl Summarize for StubSummarizer {
        async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
            if self.fail_all {
                return Err(SummarizeError::NoChoices);
            }
            Ok(format!("sum[{text}]"))
        }
    }

    fn item(url: &str) -> NewsItem {
        NewsItem {
            title: format!("headline {url}"),
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_lengths_match_regardless_of_failures() {
        let items = vec![item("https://a"), item("https://b"), item("https://c")];
        let extractor = StubExtractor::new().failing_on("https://b");
        let summarizer = StubSummarizer { fail_all: false };

        let out = run(items, &extractor, &summarizer).await;
        assert_eq!(out.summaries.len(), 3);
        assert_eq!(out.source_urls.len(), 3);
    }

    #[tokio::test]
    async fn test_extraction_failure_yields_placeholder_not_sentinel() {
        let items = vec![item("https://good"), item("https://bad")];
        let extractor = StubExtractor::new().failing_on("https://bad");
        let summarizer = StubSummarizer { fail_all: false };

        let out = run(items, &extractor, &summarizer).await;
        assert!(out.summaries[0].starts_with("sum["));
        assert_eq!(out.summaries[1], PLACEHOLDER_SUMMARY);
    }

    #[tokio::test]
    async fn test_summarization_failure_yields_sentinel() {
        let items = vec![item("https://a")];
        let extractor = StubExtractor::new();
        let summarizer = StubSummarizer { fail_all: true };

        let out = run(items, &extractor, &summarizer).await;
        assert_eq!(out.summaries[0], SUMMARY_SENTINEL);
        // The digest call fails too, so the digest is the sentinel as well.
        assert_eq!(out.digest, SUMMARY_SENTINEL);
    }

    #[tokio::test]
    async fn test_positional_order_survives_out_of_order_completion() {
        let items = vec![item("https://slow"), item("https://mid"), item("https://fast")];
        let extractor = StubExtractor::new()
            .delayed("https://slow", 60)
            .delayed("https://mid", 30)
            .delayed("https://fast", 1);
        let summarizer = StubSummarizer { fail_all: false };

        let out = run(items, &extractor, &summarizer).await;
        assert!(out.summaries[0].contains("https://slow"));
        assert!(out.summaries[1].contains("https://mid"));
        assert!(out.summaries[2].contains("https://fast"));
        assert_eq!(out.source_urls[0], "https://slow");
        assert_eq!(out.source_urls[2], "https://fast");
    }

    #[tokio::test]
    async fn test_digest_covers_joined_summaries() {
        let items = vec![item("https://a"), item("https://b")];
        let extractor = StubExtractor::new();
        let summarizer = StubSummarizer { fail_all: false };

        let out = run(items, &extractor, &summarizer).await;
        // The digest input is the newline-joined per-item summaries.
        assert!(out.digest.contains('\n'));
        assert!(out.digest.contains("https://a"));
        assert!(out.digest.contains("https://b"));
    }

    #[tokio::test]
    async fn test_placeholder_entries_feed_the_digest() {
        let items = vec![item("https://bad")];
        let extractor = StubExtractor::new().failing_on("https://bad");
        let summarizer = StubSummarizer { fail_all: false };

        let out = run(items, &extractor, &summarizer).await;
        assert!(out.digest.contains(PLACEHOLDER_SUMMARY));
    }

    #[tokio::test]
    async fn test_empty_input_produces_empty_output() {
        let extractor = StubExtractor::new();
        let summarizer = StubSummarizer { fail_all: false };

        let out = run(Vec::new(), &extractor, &summarizer).await;
        assert!(out.summaries.is_empty());
        assert!(out.source_urls.is_empty());
        assert!(out.digest.is_empty());
    }

    #[tokio::test]
    async fn test_pasted_link_uses_extracted_title() {
        let items = vec![NewsItem {
            title: String::new(),
            url: "https://pasted".to_string(),
        }];
        let extractor = StubExtractor::new();
        let summarizer = StubSummarizer { fail_all: false };

        let out = run(items, &extractor, &summarizer).await;
        assert!(out.summaries[0].contains("title of https://pasted"));
    }
}
