//! Command-line interface definitions.
//!
//! All options can be given as flags; the completion API settings can also
//! come from environment variables. The API key is deliberately not
//! validated locally — a missing key surfaces as an authentication failure
//! from the provider.

use clap::{Parser, ValueEnum};

use crate::news::Period;

/// Which content-extraction strategy to use for discovered news items.
/// Pasted links always go through the reader relay.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractorKind {
    /// Fetch the page and parse the article HTML locally.
    Direct,
    /// Fetch through the plain-text reader relay.
    Proxy,
}

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Search mode with a 14 day lookback
/// newsbrief -p 14
///
/// # Route discovered articles through the reader relay too
/// newsbrief --extractor proxy
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Trace back period in days (one of 1, 7, 14, 30, 90, 180, 365)
    #[arg(short, long, default_value = "7", value_parser = parse_period)]
    pub period: Period,

    /// Extraction strategy for discovered news items
    #[arg(short = 'x', long, value_enum, default_value = "direct")]
    pub extractor: ExtractorKind,

    /// Base URL of the plain-text reader relay
    #[arg(long, default_value = "https://r.jina.ai")]
    pub proxy_url: String,

    /// Chat-completions endpoint of the summarization API
    #[arg(
        long,
        env = "LLM_API_URL",
        default_value = "https://open.bigmodel.cn/api/paas/v4/chat/completions"
    )]
    pub api_url: String,

    /// API key for the summarization API
    #[arg(long, env = "LLM_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Model name sent with each completion request
    #[arg(long, env = "LLM_MODEL", default_value = "glm-4")]
    pub model: String,
}

fn parse_period(s: &str) -> Result<Period, String> {
    let days: u32 = s
        .parse()
        .map_err(|_| format!("`{s}` is not a number of days"))?;
    Period::from_days(days)
        .ok_or_else(|| format!("`{days}` is not a valid period; use 1, 7, 14, 30, 90, 180 or 365"))
}
