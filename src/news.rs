//! News discovery via the Google News RSS search endpoint.
//!
//! The only logic here is parameter translation (a day count picked by the
//! user maps to one of seven canonical period codes) and capping the result
//! count. Provider failures propagate; there is nothing useful to do locally
//! without a result list.

use quick_xml::Reader;
use quick_xml::events::{BytesRef, Event};
use std::fmt;
use tracing::{debug, info, instrument};

use crate::error::ProviderError;
use crate::models::NewsItem;

/// Maximum number of candidate items returned per query.
pub const MAX_RESULTS: usize = 5;

const GOOGLE_NEWS_RSS: &str = "https://news.google.com/rss/search";

/// Lookback window for a news search, expressed as the provider's
/// canonical period codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneDay,
    OneWeek,
    TwoWeeks,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Period {
    /// The provider-side period code.
    pub fn as_code(self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::OneWeek => "7d",
            Period::TwoWeeks => "14d",
            Period::OneMonth => "1m",
            Period::ThreeMonths => "3m",
            Period::SixMonths => "6m",
            Period::OneYear => "1y",
        }
    }

    /// Map a day count from the UI selector onto a canonical period.
    /// Only the seven selector values are accepted.
    pub fn from_days(days: u32) -> Option<Period> {
        match days {
            1 => Some(Period::OneDay),
            7 => Some(Period::OneWeek),
            14 => Some(Period::TwoWeeks),
            30 => Some(Period::OneMonth),
            90 => Some(Period::ThreeMonths),
            180 => Some(Period::SixMonths),
            365 => Some(Period::OneYear),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Client for the news discovery provider.
pub struct NewsFinder {
    client: reqwest::Client,
    base_url: String,
}

impl NewsFinder {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: GOOGLE_NEWS_RSS.to_string(),
        }
    }

    /// Point the finder at a different endpoint. Used by tests.
    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Search for news matching `query` within the lookback `period`,
    /// capped at [`MAX_RESULTS`] items.
    #[instrument(level = "info", skip(self))]
    pub async fn find(&self, query: &str, period: Period) -> Result<Vec<NewsItem>, ProviderError> {
        let q = format!("{} when:{}", query, period.as_code());
        let url = format!(
            "{}?q={}&hl=en-US&gl=US&ceid=US:en",
            self.base_url,
            urlencoding::encode(&q)
        );
        debug!(%url, "fetching news feed");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status()));
        }
        let body = resp.text().await?;

        let mut items = parse_feed(&body)?;
        items.truncate(MAX_RESULTS);
        info!(count = items.len(), query, period = %period, "news search completed");
        Ok(items)
    }
}

/// Parse an RSS 2.0 document into news items.
///
/// Only `<title>` and `<link>` inside `<item>` are of interest; the
/// channel-level title is skipped. Items without a link are dropped.
///
/// Text arrives split across `Text`, `CData` and `GeneralRef` events
/// (`&amp;` is its own event), so each active field accumulates pieces
/// and is only trimmed once the item closes — trimming per piece would
/// eat the spaces around an entity reference.
fn parse_feed(xml: &str) -> Result<Vec<NewsItem>, ProviderError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Field {
        Title,
        Link,
    }

    let mut reader = Reader::from_str(xml);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut field: Option<Field> = None;
    let mut title = String::new();
    let mut link = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ProviderError::Feed(e.to_string()))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"item" => {
                    in_item = true;
                    title.clear();
                    link.clear();
                }
                b"title" if in_item => field = Some(Field::Title),
                b"link" if in_item => field = Some(Field::Link),
                _ => field = None,
            },
            Event::Text(t) => {
                if in_item {
                    let text = t.decode().map_err(|e| ProviderError::Feed(e.to_string()))?;
                    match field {
                        Some(Field::Title) => title.push_str(&text),
                        Some(Field::Link) => link.push_str(&text),
                        None => {}
                    }
                }
            }
            Event::CData(t) => {
                if in_item {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    match field {
                        Some(Field::Title) => title.push_str(&text),
                        Some(Field::Link) => link.push_str(&text),
                        None => {}
                    }
                }
            }
            Event::GeneralRef(r) => {
                if in_item && field.is_some() {
                    let resolved = resolve_entity(&r)?;
                    match field {
                        Some(Field::Title) => title.push(resolved),
                        Some(Field::Link) => link.push(resolved),
                        None => {}
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"item" => {
                    in_item = false;
                    let url = link.trim();
                    if !url.is_empty() {
                        items.push(NewsItem {
                            title: strip_source_suffix(title.trim()),
                            url: url.to_string(),
                        });
                    }
                }
                b"title" | b"link" => field = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

/// Resolve one entity reference event: numeric character references plus
/// the five predefined XML entities. Anything else makes the feed invalid.
fn resolve_entity(r: &BytesRef) -> Result<char, ProviderError> {
    if let Some(ch) = r
        .resolve_char_ref()
        .map_err(|e| ProviderError::Feed(e.to_string()))?
    {
        return Ok(ch);
    }
    let name = r.decode().map_err(|e| ProviderError::Feed(e.to_string()))?;
    match name.as_ref() {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        other => Err(ProviderError::Feed(format!(
            "unresolved entity reference `&{other};`"
        ))),
    }
}

/// Google News titles end with `" - Publisher"`; keep just the headline.
fn strip_source_suffix(title: &str) -> String {
    match title.rfind(" - ") {
        Some(pos) => title[..pos].trim().to_string(),
        None => title.trim().to_string(),
    }
}
