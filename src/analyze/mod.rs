// src/analyze/mod.rs
//! Abstract analysis entry: segment, extract numbers, compose the reader texts.

pub mod compose;
pub mod extract;
pub mod hints;
pub mod segment;

pub use crate::analyze::compose::{compose, StructuredSummary};
pub use crate::analyze::extract::{extract_dosage, extract_stats};
pub use crate::analyze::hints::{detect_hints, TopicHint};
pub use crate::analyze::segment::{segment, split_sentences, Segments};

use crate::config::CategoryProfile;
use crate::ingest::collapse_whitespace;
use crate::relevance::{anon_hash, dev_logging_enabled};

/// Full summary for one abstract. `category` supplies the fallback guidance
/// when no topic hint is detected.
pub fn summarize(abstract_text: &str, category: Option<&CategoryProfile>) -> StructuredSummary {
    let text = collapse_whitespace(abstract_text);
    if text.is_empty() {
        return StructuredSummary::unavailable();
    }

    let seg = segment(&text);
    let stats = extract_stats(&text);
    let dosage = extract_dosage(&text);
    let lower = text.to_lowercase();

    if dev_logging_enabled() {
        tracing::info!(
            target: "analyze",
            id = %anon_hash(&text),
            category = category.map(|c| c.name.as_str()).unwrap_or("-"),
            hints = ?detect_hints(&lower).iter().map(|h| h.tag()).collect::<Vec<_>>(),
            has_stats = !stats.is_empty(),
            has_dosage = !dosage.is_empty(),
            "summarized"
        );
    }

    compose(
        &seg,
        &stats,
        &dosage,
        category.and_then(|c| c.generic_advice.as_deref()),
        &lower,
    )
}
