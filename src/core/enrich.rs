//! Enrichment pipeline: search, then fetch content per hit
//!
//! Both `/search` and `/ask` share one algorithm shape: run the
//! upstream search tool, fetch full source text for the top hits via
//! `open_file`, and assemble a composite text block. A failed per-hit
//! fetch substitutes empty content for that hit only; a failed search
//! propagates verbatim.

use serde_json::{json, Value};
use tracing::warn;

use crate::core::error::Result;
use crate::core::types::{EnrichedHit, SearchHit, SearchHits};
use crate::mcp::McpClient;

/// Default number of hits requested from the search tool
pub const DEFAULT_SEARCH_K: usize = 3;

/// At most this many hits are enriched, in search order
pub const MAX_ENRICHED_HITS: usize = 3;

/// Character cap passed to `open_file`
pub const MAX_CONTENT_CHARS: usize = 3000;

/// Line bounds used when a `"lines"` span lacks explicit values
const DEFAULT_START_LINE: i64 = 1;
const DEFAULT_END_LINE: i64 = 100;

/// Run the search tool and fetch content for the top hits.
///
/// Hits are enriched in the order the search returned them (assumed
/// relevance-descending; the bridge does not re-sort). A failed
/// search or a malformed structured payload aborts the request; a
/// failed `open_file` for one hit yields empty content for that hit
/// and the pipeline continues.
///
/// # Arguments
///
/// * `mcp` - Shared upstream client
/// * `query` - Search query text (already validated non-empty)
/// * `k` - Number of hits to request upstream
pub async fn search_and_enrich(
    mcp: &McpClient,
    query: &str,
    k: usize,
) -> Result<Vec<EnrichedHit>> {
    let result = mcp
        .call_tool("dir2mcp.search", json!({"query": query, "k": k}))
        .await?;

    let hits: SearchHits = match result.structured {
        Some(structured) => serde_json::from_value(structured)?,
        None => SearchHits::default(),
    };

    let mut enriched = Vec::new();
    for hit in hits.hits.into_iter().take(MAX_ENRICHED_HITS) {
        let content = match mcp
            .call_tool("dir2mcp.open_file", open_file_args(&hit))
            .await
        {
            Ok(result) => result.text,
            Err(err) => {
                warn!(
                    file = %hit.rel_path,
                    error = %err,
                    "Content fetch failed, continuing with empty content"
                );
                String::new()
            }
        };

        enriched.push(EnrichedHit {
            file: hit.rel_path,
            score: hit.score,
            content,
        });
    }

    Ok(enriched)
}

/// Build `open_file` arguments for a hit.
///
/// Line bounds are attached only for `"lines"` spans; absent bounds
/// default to lines 1-100.
fn open_file_args(hit: &SearchHit) -> Value {
    let mut args = json!({
        "rel_path": hit.rel_path,
        "max_chars": MAX_CONTENT_CHARS,
    });
    if hit.span.kind == "lines" {
        args["start_line"] = hit.span.start_line.unwrap_or(DEFAULT_START_LINE).into();
        args["end_line"] = hit.span.end_line.unwrap_or(DEFAULT_END_LINE).into();
    }
    args
}

/// Render enriched hits for the `/search` route.
///
/// One block per hit, scores as whole percentages, blocks separated
/// by a blank line.
pub fn render_search_results(hits: &[EnrichedHit]) -> String {
    hits.iter()
        .map(|hit| {
            format!(
                "=== {} (relevance: {:.0}%) ===\n{}",
                hit.file,
                hit.score * 100.0,
                hit.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render enriched hits for the `/ask` route.
///
/// Prefixes the original question and labels each block as a source,
/// so the downstream agent's language model can synthesize the answer
/// from raw text; the bridge itself never answers.
pub fn render_ask_context(question: &str, hits: &[EnrichedHit]) -> String {
    let context = hits
        .iter()
        .map(|hit| format!("=== Source: {} ===\n{}", hit.file, hit.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Question: {question}\n\nRelevant document content:\n\n{context}")
}
