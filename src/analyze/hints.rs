// src/analyze/hints.rs
//! Topic hints: an ordered rule table over the lowercased abstract.
//! Earlier rules win; at most `MAX_HINTS` distinct hints are kept.

pub const MAX_HINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicHint {
    Acl,
    Tendinopathy,
    LowBackPain,
    KneeOsteoarthritis,
    Shoulder,
    StrokeWalking,
    Parkinson,
    FallsBalance,
    Concussion,
}

/// (hint, any-of keywords). Order is priority. A keyword wrapped in spaces
/// must stand as a whole word; punctuation counts as a boundary.
const HINT_RULES: &[(TopicHint, &[&str])] = &[
    (
        TopicHint::Acl,
        &["anterior cruciate", "acl reconstruction", "acl injur", "acl-r", " acl "],
    ),
    (
        TopicHint::Tendinopathy,
        &["tendinopathy", "tendinitis", "tendinosis", "achilles", "patellar tendon"],
    ),
    (
        TopicHint::LowBackPain,
        &["low back", "low-back", "lumbar", "spine", "spinal pain"],
    ),
    (
        TopicHint::KneeOsteoarthritis,
        &["knee osteoarthritis", "knee oa", "osteoarthritis of the knee"],
    ),
    (
        TopicHint::Shoulder,
        &["rotator cuff", "shoulder pain", "subacromial", "frozen shoulder"],
    ),
    (
        TopicHint::StrokeWalking,
        &["stroke", "poststroke", "hemipare"],
    ),
    (TopicHint::Parkinson, &["parkinson"]),
    (
        TopicHint::FallsBalance,
        &["fall risk", "falls", "fall prevention", "balance", "postural control"],
    ),
    (TopicHint::Concussion, &["concussion", "mild traumatic brain"]),
];

impl TopicHint {
    pub fn tag(self) -> &'static str {
        match self {
            TopicHint::Acl => "acl",
            TopicHint::Tendinopathy => "tendinopathy",
            TopicHint::LowBackPain => "low back pain",
            TopicHint::KneeOsteoarthritis => "knee osteoarthritis",
            TopicHint::Shoulder => "shoulder",
            TopicHint::StrokeWalking => "stroke walking",
            TopicHint::Parkinson => "parkinson",
            TopicHint::FallsBalance => "falls/balance",
            TopicHint::Concussion => "concussion",
        }
    }

    /// Plain-language explanation used when this is the top hint.
    pub fn explanation(self) -> &'static str {
        match self {
            TopicHint::Acl => {
                "The ACL is a strong band inside the knee that keeps it steady. \
                 This study looked at how people get their knee strong and stable again. \
                 It helps therapists plan safe steps back to running and sports."
            }
            TopicHint::Tendinopathy => {
                "Tendons connect muscles to bones, and they can get sore when overworked. \
                 This study checked ways to help a sore tendon get strong again. \
                 It helps therapists pick the right amount of exercise for healing."
            }
            TopicHint::LowBackPain => {
                "Lots of people have back pain that makes moving hard. \
                 This study tested ways to help backs feel better and move more. \
                 It helps therapists choose treatments that get people active again."
            }
            TopicHint::KneeOsteoarthritis => {
                "Knees can get stiff and achy as the cushion inside wears down. \
                 This study looked at exercises and care to help achy knees. \
                 It helps therapists keep people walking with less pain."
            }
            TopicHint::Shoulder => {
                "The shoulder has small muscles that help lift the arm. \
                 This study looked at ways to help a painful shoulder move better. \
                 It helps therapists choose exercises for reaching and lifting."
            }
            TopicHint::StrokeWalking => {
                "A stroke can make one side of the body weak and walking hard. \
                 This study tried practice that helps people walk again. \
                 It helps therapists plan lots of safe walking practice."
            }
            TopicHint::Parkinson => {
                "Parkinson's disease can make movements small, slow, or shaky. \
                 This study tested practice to help people move bigger and steadier. \
                 It helps therapists keep people moving safely every day."
            }
            TopicHint::FallsBalance => {
                "Good balance helps people stay on their feet. \
                 This study tested ways to make balance better so people fall less. \
                 It helps therapists keep older adults safe and independent."
            }
            TopicHint::Concussion => {
                "A concussion is a brain bump that can cause headaches and dizziness. \
                 This study looked at how to safely get back to normal activity. \
                 It helps therapists guide a step-by-step return to school, work, and sport."
            }
        }
    }

    /// One guidance sentence for clinicians.
    pub fn advisory(self) -> &'static str {
        match self {
            TopicHint::Acl => {
                "For ACL rehab, use criteria-based progression (quadriceps strength symmetry, hop testing, landing quality) rather than time alone before return-to-sport."
            }
            TopicHint::Tendinopathy => {
                "For tendinopathy, progress tendon loading (isometric to heavy slow resistance to energy storage) guided by the 24-hour pain response."
            }
            TopicHint::LowBackPain => {
                "For low back pain, combine graded activity and exercise with reassurance and pain education, and track function with a validated measure such as the ODI."
            }
            TopicHint::KneeOsteoarthritis => {
                "For knee osteoarthritis, prioritize progressive strengthening and aerobic activity with education on load management, and track pain and function together."
            }
            TopicHint::Shoulder => {
                "For shoulder pain, progress rotator cuff and scapular loading within tolerance and reassess range of motion and function regularly."
            }
            TopicHint::StrokeWalking => {
                "For post-stroke walking, emphasize task-specific, high-repetition gait practice at an appropriate intensity with safety setup and cueing."
            }
            TopicHint::Parkinson => {
                "For Parkinson's disease, use amplitude-focused and cueing-based practice and progress dual-task demands while monitoring fatigue and freezing."
            }
            TopicHint::FallsBalance => {
                "For fall-risk reduction, progress balance training from static to dynamic to dual-task alongside strengthening, and track gait speed, TUG, and sit-to-stand."
            }
            TopicHint::Concussion => {
                "For concussion, use a graded, symptom-limited return to activity and address vestibular and cervical contributors when present."
            }
        }
    }
}

/// Hints found in `lower` (already lowercased), in rule order, at most three.
pub fn detect_hints(lower: &str) -> Vec<TopicHint> {
    HINT_RULES
        .iter()
        .filter(|(_, words)| words.iter().any(|w| keyword_matches(lower, w)))
        .map(|(hint, _)| *hint)
        .take(MAX_HINTS)
        .collect()
}

fn keyword_matches(text: &str, keyword: &str) -> bool {
    match keyword.strip_prefix(' ').and_then(|k| k.strip_suffix(' ')) {
        Some(word) => contains_word(text, word),
        None => text.contains(keyword),
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    let is_word_char = |c: char| c.is_alphanumeric();
    text.match_indices(word).any(|(i, _)| {
        let before = text[..i].chars().next_back();
        let after = text[i + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_is_priority_order() {
        let text = "balance training after stroke in adults with low back pain and acl reconstruction";
        assert_eq!(
            detect_hints(text),
            vec![TopicHint::Acl, TopicHint::LowBackPain, TopicHint::StrokeWalking]
        );
    }

    #[test]
    fn standalone_acl_word_only() {
        assert_eq!(detect_hints("acl"), vec![TopicHint::Acl]);
        assert!(detect_hints("oracle software").is_empty());
        assert!(detect_hints("aclidinium inhaler").is_empty());
    }

    #[test]
    fn acl_next_to_punctuation() {
        for text in [
            "outcomes after acl. return to sport",
            "after acl, athletes",
            "ligament (acl) tears",
            "acl/mcl injuries",
        ] {
            assert_eq!(detect_hints(text), vec![TopicHint::Acl], "{text}");
        }
    }

    #[test]
    fn every_hint_has_text() {
        for (hint, _) in HINT_RULES {
            assert!(!hint.tag().is_empty());
            assert!(hint.explanation().ends_with('.'));
            assert!(hint.advisory().starts_with("For "));
        }
    }
}
