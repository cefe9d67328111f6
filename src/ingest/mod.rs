// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{ArticleMeta, Candidate};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use std::collections::HashMap;

/// One-time metrics registration.
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_requests_total",
            "E-utilities requests issued (esearch/esummary/efetch)."
        );
        describe_counter!(
            "ingest_request_errors_total",
            "E-utilities transport or status errors."
        );
        describe_counter!(
            "ingest_missing_abstract_total",
            "Candidates fetched without abstract text."
        );
        describe_histogram!("ingest_parse_ms", "Response parse time in milliseconds.");
    });
}

/// Normalize text: decode entities, strip tags, fold quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags (titles carry <i>, <sup> etc.)
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[a-z][^>]*>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace (incl. NBSP)
    collapse_whitespace(&out)
}

/// Collapse any whitespace run into one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(s, " ").trim().to_string()
}

/// Join metadata and abstracts into candidates, in the order of `ids`.
/// Ids without metadata still yield a candidate (empty title/venue), like the
/// source's own ranking would present them.
pub fn assemble_candidates(
    ids: &[String],
    mut meta: HashMap<String, ArticleMeta>,
    mut abstracts: HashMap<String, String>,
) -> Vec<Candidate> {
    ensure_metrics_described();

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let m = meta.remove(id).unwrap_or_default();
        let abstract_text = abstracts.remove(id).unwrap_or_default();
        if abstract_text.is_empty() {
            counter!("ingest_missing_abstract_total").increment(1);
        }
        out.push(Candidate {
            id: id.clone(),
            title: m.title,
            venue: m.venue,
            pub_date: m.pub_date,
            abstract_text,
            doi: m.doi,
            pmcid: m.pmcid,
        });
    }
    out
}
