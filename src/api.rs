//! Chat-completion API client used for summarization.
//!
//! Speaks the OpenAI-compatible `/chat/completions` wire format: every call
//! sends a fixed system instruction plus the user-supplied text as a
//! two-message conversation.
//!
//! # Retry Strategy
//!
//! The raw client makes a single attempt; [`RetryComplete`] decorates any
//! [`CompleteAsync`] with bounded exponential backoff:
//!
//! - Maximum 3 retry attempts
//! - Delay doubles from 1 second, capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd
//!
//! Callers of [`Summarizer`] receive a `Result`; converting a failure into
//! the rendered sentinel text is the orchestrator's job, so one failed item
//! never aborts a batch.

use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::error::SummarizeError;

/// Fixed system instruction sent with every summarization request.
pub const SYSTEM_PROMPT: &str = "You are a text interpretation assistant. Read the \
provided text and produce one concise summary paragraph, written in the same \
language as the text.";

/// One attempt at a chat completion.
pub trait CompleteAsync {
    async fn complete(&self, text: &str) -> Result<String, SummarizeError>;
}

/// Summarization interface consumed by the pipeline. Implemented by
/// [`Summarizer`] for real runs and by stubs in tests.
pub trait Summarize {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Bare chat-completions client. Single attempt, no backoff.
pub struct ChatClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn request_body(&self, text: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
        }
    }
}

impl CompleteAsync for ChatClient {
    #[instrument(level = "info", skip_all)]
    async fn complete(&self, text: &str) -> Result<String, SummarizeError> {
        let t0 = Instant::now();
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(text))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u128, "completion API rejected request");
            return Err(SummarizeError::Api { status, body });
        }

        let parsed: ChatResponse = resp.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(SummarizeError::NoChoices)?;
        Ok(choice.message.content)
    }
}

/// Decorator adding bounded exponential backoff to any [`CompleteAsync`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryComplete<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryComplete<T>
where
    T: CompleteAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl<T> CompleteAsync for RetryComplete<T>
where
    T: CompleteAsync,
{
    #[instrument(level = "info", skip_all)]
    async fn complete(&self, text: &str) -> Result<String, SummarizeError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.complete(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u128,
                            error = %e,
                            "completion exhausted retries"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "completion attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// The summarizer handed to the orchestrator: a chat client with retry.
pub struct Summarizer {
    chat: RetryComplete<ChatClient>,
}

impl Summarizer {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            chat: RetryComplete::new(
                ChatClient::new(client, api_url, api_key, model),
                3,
                Duration::from_secs(1),
            ),
        }
    }
}

impl Summarize for Summarizer {
    #[instrument(level = "info", skip_all)]
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let t0 = Instant::now();
        let res = self.chat.complete(text).await;
        match &res {
            Ok(_) => info!(
                elapsed_ms_total = t0.elapsed().as_millis() as u128,
                "summarize succeeded"
            ),
            Err(e) => error!(
                elapsed_ms_total = t0.elapsed().as_millis() as u128,
                error = %e,
                "summarize failed"
            ),
        }
        res
    }
}
