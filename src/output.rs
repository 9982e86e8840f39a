//! Render a pipeline result as three-tier Markdown text.
//!
//! Top to bottom: the digest, the per-item summaries, the source links.
//! The result is printed to the terminal and discarded; nothing persists.

use crate::models::PipelineOutput;

/// Render the digest / summaries / sources sections.
pub fn render(output: &PipelineOutput) -> String {
    let mut md = String::new();

    md.push_str("# In Seconds\n\n");
    md.push_str(&output.digest);
    md.push_str("\n\n# Less than a Minute\n\n");
    for (i, summary) in output.summaries.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, summary));
    }
    md.push_str("\n### Check out the Source\n\n");
    for url in &output.source_urls {
        md.push_str(&format!("- [{url}]({url})\n"));
    }

    md
}
