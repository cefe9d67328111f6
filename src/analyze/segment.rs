// src/analyze/segment.rs
//! Split an abstract into objective / methods / results / conclusion.
//!
//! Labeled abstracts ("OBJECTIVE: ... RESULTS: ...") are cut at the next
//! ALL-CAPS label. Unlabeled prose falls back to sentence positions.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::ingest::collapse_whitespace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    pub objective: String,
    pub methods: String,
    pub results: String,
    pub conclusion: String,
}

impl Segments {
    pub fn is_empty(&self) -> bool {
        self.objective.is_empty()
            && self.methods.is_empty()
            && self.results.is_empty()
            && self.conclusion.is_empty()
    }
}

// Priority order matters: the first label with text wins.
const OBJECTIVE_LABELS: &[&str] = &["OBJECTIVES?", "PURPOSE", "AIMS?", "BACKGROUND"];
const METHODS_LABELS: &[&str] = &[
    "METHODS?",
    r"DESIGN(?:,? SETTINGS?)?(?:,? AND (?:PARTICIPANTS|SETTINGS?|METHODS))?",
];
const RESULTS_LABELS: &[&str] = &["RESULTS?"];
const CONCLUSION_LABELS: &[&str] = &["CONCLUSIONS?(?: AND RELEVANCE)?"];

fn label_regex(label: &str) -> Regex {
    // Label lists are static; patterns are known-good.
    Regex::new(&format!(r"(?i)\b(?:{label})\s*:\s*")).unwrap()
}

fn label_regexes(
    labels: &'static [&'static str],
    cell: &'static OnceCell<Vec<Regex>>,
) -> &'static [Regex] {
    cell.get_or_init(|| labels.iter().map(|l| label_regex(l)).collect())
}

// Case-sensitive: prose like "Results were clear:" must not cut a section.
// Commas and slashes occur in compound labels ("DESIGN, SETTING, AND PARTICIPANTS").
fn next_label_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"[A-Z][A-Z ,/\-]{2,}\s*:").unwrap())
}

fn outcome_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:significant(?:ly)?|improv\w*|reduc\w*|increas\w*|difference\w*|effects?|associated|odds|risks?|CI)\b|\bp\s*[<=>]",
        )
        .unwrap()
    })
}

/// Text after the first occurrence of `re` up to the next ALL-CAPS label.
fn grab(text: &str, re: &Regex) -> String {
    let Some(m) = re.find(text) else {
        return String::new();
    };
    let rest = &text[m.end()..];
    let end = next_label_re()
        .find(rest)
        .map(|n| n.start())
        .unwrap_or(rest.len());
    collapse_whitespace(&rest[..end])
}

fn first_labeled(text: &str, regexes: &[Regex]) -> String {
    regexes
        .iter()
        .map(|re| grab(text, re))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// Sentences split after runs of `.`, `!` or `?` followed by whitespace.
/// Punctuation stays with its sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"[.!?]+\s+").unwrap());

    let mut out = Vec::new();
    let mut start = 0;
    for m in re.find_iter(text) {
        let end = m.start() + m.as_str().trim_end().len();
        let s = text[start..end].trim();
        if !s.is_empty() {
            out.push(s.to_string());
        }
        start = m.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail.to_string());
    }
    out
}

pub fn segment(abstract_text: &str) -> Segments {
    static OBJ: OnceCell<Vec<Regex>> = OnceCell::new();
    static METH: OnceCell<Vec<Regex>> = OnceCell::new();
    static RES: OnceCell<Vec<Regex>> = OnceCell::new();
    static CON: OnceCell<Vec<Regex>> = OnceCell::new();

    let text = abstract_text.trim();
    let mut seg = Segments {
        objective: first_labeled(text, label_regexes(OBJECTIVE_LABELS, &OBJ)),
        methods: first_labeled(text, label_regexes(METHODS_LABELS, &METH)),
        results: first_labeled(text, label_regexes(RESULTS_LABELS, &RES)),
        conclusion: first_labeled(text, label_regexes(CONCLUSION_LABELS, &CON)),
    };

    if seg.objective.is_empty() && seg.results.is_empty() && seg.conclusion.is_empty() {
        sentence_fallback(&collapse_whitespace(text), &mut seg);
    }
    seg
}

fn sentence_fallback(text: &str, seg: &mut Segments) {
    let sents = split_sentences(text);
    if sents.is_empty() {
        return;
    }

    seg.objective = sents[..sents.len().min(2)].join(" ");

    let outcome: Vec<&str> = sents
        .iter()
        .filter(|s| outcome_re().is_match(s))
        .take(3)
        .map(String::as_str)
        .collect();
    seg.results = if !outcome.is_empty() {
        outcome.join(" ")
    } else if sents.len() > 3 {
        sents[2..sents.len().min(5)].join(" ")
    } else {
        String::new()
    };

    seg.conclusion = sents.last().cloned().unwrap_or_default();
}
