//! # newsbrief
//!
//! An interactive news digest tool. Type keywords and it searches recent
//! news, pulls each article's text, summarizes every article through a
//! chat-completion API, and folds the results into a single top-level
//! brief. Paste URLs instead and it skips discovery and summarizes exactly
//! those pages.
//!
//! ## Pipeline
//!
//! 1. **Detect**: classify the input as a keyword query or a link list
//! 2. **Discover**: keyword queries go through Google News RSS search
//! 3. **Extract + summarize**: one bounded-concurrency unit of work per
//!    item; failed items degrade to fixed placeholder text
//! 4. **Digest**: one more summarization pass over all per-item summaries
//!
//! Output is three tiers of Markdown: the digest, the per-item summaries,
//! and the clickable source links.

pub mod api;
pub mod cli;
pub mod error;
pub mod extract;
pub mod links;
pub mod models;
pub mod news;
pub mod output;
pub mod pipeline;
