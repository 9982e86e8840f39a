use clap::Parser;
use std::error::Error;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use newsbrief::api::Summarizer;
use newsbrief::cli::{Cli, ExtractorKind};
use newsbrief::extract::{DirectExtractor, Extractor, ProxyExtractor};
use newsbrief::models::NewsItem;
use newsbrief::news::NewsFinder;
use newsbrief::{links, output, pipeline};

/// Bounded timeout for every outbound HTTP call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(period = %args.period, extractor = ?args.extractor, "parsed CLI arguments");

    // Shared handles, built once and read-only afterwards.
    let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let finder = NewsFinder::new(client.clone());
    let summarizer = Summarizer::new(
        client.clone(),
        args.api_url.clone(),
        args.api_key.clone(),
        args.model.clone(),
    );

    // The strategy for discovered items is chosen once per run. Pasted
    // links always take the relay, which needs no per-site parsing.
    let news_extractor = match args.extractor {
        ExtractorKind::Direct => Extractor::Direct(DirectExtractor::new(client.clone())),
        ExtractorKind::Proxy => {
            Extractor::Proxy(ProxyExtractor::new(client.clone(), args.proxy_url.clone()))
        }
    };
    let link_extractor = Extractor::Proxy(ProxyExtractor::new(client.clone(), args.proxy_url));

    info!(period = %args.period, "newsbrief ready");
    println!("Type keywords to search the news, or paste links. Empty line quits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            break;
        }

        let (is_link_mode, pasted) = links::detect(input);
        let items: Vec<NewsItem> = if is_link_mode {
            info!(count = pasted.len(), "link mode");
            pasted
                .into_iter()
                .map(|url| NewsItem {
                    title: String::new(),
                    url,
                })
                .collect()
        } else {
            match finder.find(input, args.period).await {
                Ok(items) => items,
                Err(e) => {
                    error!(error = %e, "news discovery failed");
                    println!("News search failed: {e}");
                    continue;
                }
            }
        };

        if items.is_empty() {
            println!("Nothing found. Try something else or change the trace back period.");
            continue;
        }

        let extractor = if is_link_mode {
            &link_extractor
        } else {
            &news_extractor
        };
        let result = pipeline::run(items, extractor, &summarizer).await;
        println!("\n{}", output::render(&result));
    }

    info!("bye");
    Ok(())
}
