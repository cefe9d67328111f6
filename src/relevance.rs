// src/relevance.rs
//! Relevance scoring for candidate articles: red flags, required domain signal,
//! category bans, then additive boosts (preferred venue, must/boost terms, study design).
//!
//! All matching is case-insensitive substring containment. That is deliberately
//! simple and has known false positives ("hip" inside "hippocampus").

use crate::config::{CategoryProfile, ScoringRules};
use tracing::info;

// Dev logging gate: LITERATURE_DEV_LOG=1 AND a debug build (or LITERATURE_ENV in {local,development,dev})
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var("LITERATURE_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("LITERATURE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// First 12 hex chars of SHA-256; stable id for log correlation without raw text.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    Sha256::digest(text.as_bytes())
        .iter()
        .take(6)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Minimal, anonymized dev logger for scoring events.
fn dev_log_relevance(event: &str, category: &str, text: &str, reasons: &[String], score: i32) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(text);
    let reasons_short = truncate_vec(reasons, 5);
    // Never log raw text. Only hashed id + short lists.
    info!(
        target: "relevance",
        %id, %score, category, event,
        reasons = ?reasons_short
    );
}

pub(crate) fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}

/// Outcome of scoring one candidate against one category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relevance {
    pub score: i32,
    pub reasons: Vec<String>,
}

/// Stateless scorer over an immutable rule set.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceScorer<'a> {
    rules: &'a ScoringRules,
}

impl<'a> RelevanceScorer<'a> {
    pub fn new(rules: &'a ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        self.rules
    }

    /// Integer score for `text` (title + venue + abstract) in `profile`.
    pub fn score(&self, text: &str, profile: &CategoryProfile, venue: &str) -> i32 {
        self.score_detailed(text, profile, venue).score
    }

    /// Same as `score`, with the list of signals that produced the number.
    pub fn score_detailed(&self, text: &str, profile: &CategoryProfile, venue: &str) -> Relevance {
        let t = text.to_lowercase();
        let r = self.rules;
        let mut rel = Relevance::default();

        // 1) Global red flags: clearly off-topic regardless of anything else
        if let Some(bad) = r.red_flags.iter().find(|w| t.contains(w.as_str())) {
            rel.score = r.rejected_score;
            rel.reasons.push(format!("red_flag:{bad}"));
            dev_log_relevance("rejected", &profile.name, text, &rel.reasons, rel.score);
            return rel;
        }

        // 2) Require at least one domain signal
        let required = if profile.required_terms.is_empty() {
            &r.required_terms
        } else {
            &profile.required_terms
        };
        if !required.is_empty() && !required.iter().any(|w| t.contains(w.as_str())) {
            rel.score = r.weak_signal_score;
            rel.reasons.push("missing_required".into());
            dev_log_relevance("weak_signal", &profile.name, text, &rel.reasons, rel.score);
            return rel;
        }

        // 3) Category bans
        if let Some(bad) = profile.banned_terms.iter().find(|w| t.contains(w.as_str())) {
            rel.score = r.rejected_score;
            rel.reasons.push(format!("banned:{bad}"));
            dev_log_relevance("banned", &profile.name, text, &rel.reasons, rel.score);
            return rel;
        }

        // 4) Additive signals
        let v = venue.to_lowercase();
        let mut score = 0i32;
        for pj in &profile.preferred_sources {
            if v.contains(pj.to_lowercase().as_str()) {
                score += r.preferred_source_weight;
                rel.reasons.push(format!("preferred:{pj}"));
            }
        }
        for w in &profile.must_terms {
            if t.contains(w.as_str()) {
                score += r.must_term_weight;
                rel.reasons.push(format!("must:{w}"));
            }
        }
        for w in &profile.boost_terms {
            if t.contains(w.as_str()) {
                score += r.boost_term_weight;
                rel.reasons.push(format!("boost:{w}"));
            }
        }
        if r.study_design_terms.iter().any(|k| t.contains(k.as_str())) {
            score += r.study_design_weight;
            rel.reasons.push("study_design".into());
        }

        rel.score = score;
        dev_log_relevance("scored", &profile.name, text, &rel.reasons, score);
        rel
    }
}
