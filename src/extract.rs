//! Article content extraction.
//!
//! Two interchangeable strategies, selected once per run:
//!
//! - [`DirectExtractor`] downloads the page and parses the article body out
//!   of the HTML itself.
//! - [`ProxyExtractor`] asks a reader relay (Jina-style, `GET <base>/<url>`)
//!   to render the page to plain text and parses its three section markers.
//!
//! Both classify an empty body as a failure: the caller must never mistake
//! "fetch failed" for "article has no content". No retries; the shared HTTP
//! client carries an explicit bounded timeout.

use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

use crate::error::ExtractionError;
use crate::models::ExtractedContent;

const TITLE_MARKER: &str = "Title:";
const URL_MARKER: &str = "URL Source:";
const CONTENT_MARKER: &str = "Markdown Content:";

/// A strategy for turning a URL into cleaned article text.
pub trait ContentExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError>;
}

/// Fetches the page and parses the article out of its own HTML.
pub struct DirectExtractor {
    client: reqwest::Client,
}

impl DirectExtractor {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ContentExtractor for DirectExtractor {
    #[instrument(level = "info", skip(self))]
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            warn!(%url, status = %resp.status(), "article fetch rejected");
            return Err(ExtractionError::Status(resp.status()));
        }
        let html = resp.text().await?;

        let (title, body) = parse_article_html(&html);
        if body.trim().is_empty() {
            warn!(%url, "article parse produced no text");
            return Err(ExtractionError::EmptyBody);
        }

        info!(%url, bytes = body.len(), "extracted article");
        Ok(ExtractedContent {
            title,
            source_url: url.to_string(),
            body,
        })
    }
}

/// Pull a title and the paragraph text out of an HTML document.
fn parse_article_html(html: &str) -> (String, String) {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("title").unwrap();
    let h1_selector = Selector::parse("h1").unwrap();
    let paragraph_selector = Selector::parse("p").unwrap();

    let title = document
        .select(&h1_selector)
        .chain(document.select(&title_selector))
        .next()
        .map(|e| e.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .unwrap_or_default();

    let body = document
        .select(&paragraph_selector)
        .map(|e| e.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    (title, body)
}

/// Extracts through a plain-text reader relay.
///
/// The relay answers `GET <base>/<original-url>` with a text document
/// containing `Title:`, `URL Source:` and `Markdown Content:` sections in
/// that order. The relay has no structured response option, so the
/// positional-marker contract is all there is; a missing or reordered
/// marker is treated as definitive failure.
pub struct ProxyExtractor {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyExtractor {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl ContentExtractor for ProxyExtractor {
    #[instrument(level = "info", skip(self))]
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError> {
        let relay_url = format!("{}/{}", self.base_url.trim_end_matches('/'), url);
        debug!(%relay_url, "fetching via reader relay");

        let resp = self.client.get(&relay_url).send().await?;
        if !resp.status().is_success() {
            warn!(%url, status = %resp.status(), "reader relay rejected request");
            return Err(ExtractionError::Status(resp.status()));
        }
        let text = resp.text().await?;

        let content = parse_reader_response(url, &text)?;
        info!(%url, bytes = content.body.len(), "extracted article via relay");
        Ok(content)
    }
}

/// Slice a relay response into title, canonical source URL and body using
/// the three literal section markers. Markers must all be present and in
/// order; the body must be non-empty.
fn parse_reader_response(url: &str, text: &str) -> Result<ExtractedContent, ExtractionError> {
    let title_at = text
        .find(TITLE_MARKER)
        .ok_or(ExtractionError::MissingMarker(TITLE_MARKER))?;
    let after_title = title_at + TITLE_MARKER.len();

    let url_rel = text[after_title..]
        .find(URL_MARKER)
        .ok_or(ExtractionError::MissingMarker(URL_MARKER))?;
    let url_at = after_title + url_rel;
    let after_url = url_at + URL_MARKER.len();

    let content_rel = text[after_url..]
        .find(CONTENT_MARKER)
        .ok_or(ExtractionError::MissingMarker(CONTENT_MARKER))?;
    let content_at = after_url + content_rel;
    let after_content = content_at + CONTENT_MARKER.len();

    // The relay may emit extra header lines (e.g. `Published Time:`)
    // between the markers; title and source are the rest of their line.
    let title = first_line(&text[after_title..url_at]);
    let mut source_url = first_line(&text[after_url..content_at]);
    if source_url.is_empty() {
        source_url = url.to_string();
    }
    let body = text[after_content..].trim().to_string();

    if body.is_empty() {
        return Err(ExtractionError::EmptyBody);
    }

    Ok(ExtractedContent {
        title,
        source_url,
        body,
    })
}

fn first_line(s: &str) -> String {
    s.trim().lines().next().unwrap_or("").trim().to_string()
}

/// The strategy picked for a run. Wraps both implementations so the
/// orchestrator can stay generic while the choice happens exactly once.
pub enum Extractor {
    Direct(DirectExtractor),
    Proxy(ProxyExtractor),
}

impl ContentExtractor for Extractor {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError> {
        match self {
            Extractor::Direct(e) => e.extract(url).await,
            Extractor::Proxy(e) => e.extract(url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READER_RESPONSE: &str = "Title: An Example Article\n\
URL Source: https://example.com/article\n\
Published Time: 2024-06-01\n\
Markdown Content:\n\
First paragraph of the article.\n\nSecond paragraph.";

    #[test]
    fn test_reader_response_parses_sections() {
        let content =
            parse_reader_response("https://example.com/article", READER_RESPONSE).unwrap();
        assert_eq!(content.title, "An Example Article");
        assert_eq!(content.source_url, "https://example.com/article");
        assert!(content.body.starts_with("First paragraph"));
        assert!(content.body.ends_with("Second paragraph."));
    }

    #[test]
    fn test_reader_response_missing_title_marker() {
        let text = "URL Source: https://x\nMarkdown Content:\nbody";
        let err = parse_reader_response("https://x", text).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingMarker(m) if m == TITLE_MARKER));
    }

    #[test]
    fn test_reader_response_reordered_markers_fail() {
        // URL Source before Title means no URL marker *after* the title,
        // which is a failure, not a garbage slice.
        let text = "URL Source: https://x\nTitle: t\nMarkdown Content:\nbody";
        let err = parse_reader_response("https://x", text).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingMarker(m) if m == URL_MARKER));
    }

    #[test]
    fn test_reader_response_empty_body_fails() {
        let text = "Title: t\nURL Source: https://x\nMarkdown Content:\n   ";
        let err = parse_reader_response("https://x", text).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyBody));
    }

    #[test]
    fn test_reader_response_blank_source_falls_back_to_request_url() {
        let text = "Title: t\nURL Source:\nMarkdown Content:\nbody text";
        let content = parse_reader_response("https://orig.example/a", text).unwrap();
        assert_eq!(content.source_url, "https://orig.example/a");
    }

    #[test]
    fn test_parse_article_html() {
        let html = r#"<html><head><title>Page Title</title></head>
            <body><h1>Headline</h1><p>One.</p><p>Two.</p><p>  </p></body></html>"#;
        let (title, body) = parse_article_html(html);
        assert_eq!(title, "Headline");
        assert_eq!(body, "One.\nTwo.");
    }

    #[test]
    fn test_parse_article_html_without_paragraphs() {
        let html = "<html><body><div>nothing here</div></body></html>";
        let (_, body) = parse_article_html(html);
        assert!(body.trim().is_empty());
    }
}
