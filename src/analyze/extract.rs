// src/analyze/extract.rs
//! Pattern libraries that pull reported numbers out of abstract text.
//! Output is pattern-major (all hits of the first pattern, then the next),
//! deduplicated case-insensitively, capped at ten, joined with ", ".

use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::HashSet;

use crate::ingest::collapse_whitespace;

const MAX_HITS: usize = 10;

const STATS_PATTERNS: &[&str] = &[
    r"(?i)\bn\s*=\s*\d+\b",
    r"(?i)\b\d+(?:\.\d+)?\s*%",
    r"(?i)\bp\s*[<=>]\s*0\.\d+\b",
    r"(?i)\b95%\s*CI\s*[: ]\s*\[?\(?\s*\d+(?:\.\d+)?\s*[-–]\s*\d+(?:\.\d+)?\s*\)?\]?",
    // ratios stay case-sensitive so "or 3 weeks" in prose is not an odds ratio
    r"\b(?:OR|RR|HR)\s*[:=]?\s*\d+(?:\.\d+)?\b",
    r"(?i)\b\d+(?:\.\d+)?\s*(?:weeks|week|months|month|days|day)\b",
];

const DOSAGE_PATTERNS: &[&str] = &[
    // frequency
    r"(?i)\b\d+\s*(?:x|×)\s*(?:/|per)\s*week\b",
    r"(?i)\b\d+\s*times\s*(?:a|per)\s*week\b",
    r"(?i)\b\d+\s*sessions?\s*(?:/|per)\s*week\b",
    r"(?i)\b(?:once|twice)\s*(?:a|per)\s*week\b",
    // session length
    r"(?i)\b\d+\s*(?:to|-)\s*\d+\s*min(?:ute)?s?\b",
    r"(?i)\b\d+\s*min(?:ute)?s?\b",
    r"(?i)\b\d+\s*(?:to|-)\s*\d+\s*hours?\b",
    r"(?i)\b\d+\s*hours?\b",
    // program duration
    r"(?i)\b\d+\s*(?:to|-)\s*\d+\s*weeks?\b",
    r"(?i)\b\d+\s*weeks?\b",
    r"(?i)\b\d+\s*(?:to|-)\s*\d+\s*months?\b",
    r"(?i)\b\d+\s*months?\b",
    // sets / reps
    r"(?i)\b\d+\s*sets?\s*of\s*\d+\s*reps?\b",
    r"(?i)\b\d+\s*sets?\b",
    r"(?i)\b\d+\s*(?:reps?|repetitions?)\b",
    r"(?i)\b\d+\s*(?:to|-)\s*\d+\s*reps?\b",
    // intensity
    r"(?i)\b\d+\s*RM\b",
    r"(?i)\b\d+\s*%\s*1RM\b",
    r"(?i)\bRPE\s*\d+(?:\.\d+)?\b",
    r"(?i)\bBorg\s*\d+(?:\.\d+)?\b",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

fn stats_res() -> &'static [Regex] {
    static RES: OnceCell<Vec<Regex>> = OnceCell::new();
    RES.get_or_init(|| compile(STATS_PATTERNS))
}

fn dosage_res() -> &'static [Regex] {
    static RES: OnceCell<Vec<Regex>> = OnceCell::new();
    RES.get_or_init(|| compile(DOSAGE_PATTERNS))
}

fn collect_hits(text: &str, res: &[Regex]) -> String {
    let t = collapse_whitespace(text);
    let mut seen = HashSet::new();
    let mut out: Vec<&str> = Vec::new();
    for re in res {
        for m in re.find_iter(&t) {
            let hit = m.as_str().trim();
            if !hit.is_empty() && seen.insert(hit.to_lowercase()) {
                out.push(hit);
            }
        }
    }
    out.truncate(MAX_HITS);
    out.join(", ")
}

/// Sample sizes, percentages, p-values, confidence intervals, ratios and
/// follow-up durations. Empty string when nothing matches.
pub fn extract_stats(text: &str) -> String {
    collect_hits(text, stats_res())
}

/// Training dose as reported: frequency, session length, program length,
/// sets/reps and intensity markers. Empty string when nothing matches.
pub fn extract_dosage(text: &str) -> String {
    collect_hits(text, dosage_res())
}
