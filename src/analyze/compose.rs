// src/analyze/compose.rs
//! Build the three reader-facing texts from segments, extracted numbers and hints.

use serde::Serialize;

use crate::analyze::hints::{detect_hints, TopicHint};
use crate::analyze::segment::Segments;

pub const NO_ABSTRACT_SUMMARY: &str = "No abstract was available in the PubMed record for this article. Review the full text (if available) for methods, results, and clinical takeaways.";
pub const NO_ABSTRACT_EXPLANATION: &str = "This paper is about helping people move and feel better. We\u{2019}d need the full paper to know exactly what they found.";
pub const NO_ABSTRACT_GUIDANCE: &str = "If this topic matches your caseload, review the full text when possible. Then select appropriate outcome measures and apply the intervention principles (dose, frequency, progression) while monitoring tolerance and safety.";

pub const GENERIC_EXPLANATION: &str = "They wanted to learn what kind of practice helps people move better. They tried a plan and checked if it helped. The results can help therapists choose better exercises for people.";
pub const DEFAULT_ADVICE: &str = "Match the study population to your patient (diagnosis, age, stage of recovery, and goals), translate the main intervention into a measurable plan (frequency, intensity, time/sets/reps, and progression), and track change with objective measures.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredSummary {
    pub summary: String,
    pub explanation: String,
    pub guidance: String,
}

impl StructuredSummary {
    /// The fixed texts used when there is no abstract to work from.
    pub fn unavailable() -> Self {
        Self {
            summary: NO_ABSTRACT_SUMMARY.to_string(),
            explanation: NO_ABSTRACT_EXPLANATION.to_string(),
            guidance: NO_ABSTRACT_GUIDANCE.to_string(),
        }
    }
}

/// `category_advice` is the category's fallback guidance when no hint matches.
pub fn compose(
    seg: &Segments,
    stats: &str,
    dosage: &str,
    category_advice: Option<&str>,
    abstract_lower: &str,
) -> StructuredSummary {
    if abstract_lower.trim().is_empty() {
        return StructuredSummary::unavailable();
    }

    let mut sentences: Vec<String> = [
        ("This article examined", &seg.objective),
        ("The researchers used", &seg.methods),
        ("They found that", &seg.results),
        ("Overall,", &seg.conclusion),
    ]
    .into_iter()
    .filter(|(_, frag)| !frag.trim().is_empty())
    .map(|(opener, frag)| terminate(&format!("{opener} {}", lower_first(frag.trim()))))
    .collect();
    if !stats.is_empty() {
        sentences.push(format!(
            "Key numbers reported in the abstract include: {stats}."
        ));
    }

    let hints = detect_hints(abstract_lower);
    let explanation = hints
        .first()
        .map(|h| h.explanation())
        .unwrap_or(GENERIC_EXPLANATION)
        .to_string();

    let mut guidance: Vec<&str> = hints.iter().map(|h| TopicHint::advisory(*h)).collect();
    if guidance.is_empty() {
        guidance.push(
            category_advice
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_ADVICE),
        );
    }
    let dosage_line = (!dosage.is_empty())
        .then(|| format!("Study-reported dosage from the abstract: {dosage}."));
    let mut guidance = guidance.join(" ");
    if let Some(line) = dosage_line {
        guidance.push(' ');
        guidance.push_str(&line);
    }

    StructuredSummary {
        summary: sentences.join(" "),
        explanation,
        guidance,
    }
}

/// Lower-case the first letter unless the first word looks like an acronym
/// ("ACL", "MRI", "T2DM").
fn lower_first(s: &str) -> String {
    let first_word = s.split_whitespace().next().unwrap_or_default();
    let letters: Vec<char> = first_word.chars().filter(|c| c.is_alphanumeric()).collect();
    let acronym = letters.len() >= 2
        && letters
            .iter()
            .skip(1)
            .any(|c| c.is_uppercase() || c.is_ascii_digit());
    if acronym {
        return s.to_string();
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn terminate(s: &str) -> String {
    let t = s.trim_end();
    if t.ends_with(['.', '!', '?']) {
        t.to_string()
    } else {
        format!("{t}.")
    }
}
