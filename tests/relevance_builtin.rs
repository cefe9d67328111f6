// tests/relevance_builtin.rs
// Hand-picked scoring cases against the shipped category file.

use literature_digest::{CategoryConfig, RelevanceScorer};

struct Case {
    category: &'static str,
    text: &'static str,
    venue: &'static str,
    expect: i32,
    why: &'static str,
}

const CASES: &[Case] = &[
    Case {
        category: "Sports",
        text: "ACL rehabilitation and return to sport in athletes: a randomized trial of plyometric and landing training",
        venue: "Am J Sports Med",
        // 25 venue + 4 must (rehabilitation, return to sport, athlete, acl) + 2 boosts + design
        expect: 25 + 32 + 6 + 4,
        why: "all additive signals",
    },
    Case {
        category: "Neurological",
        text: "Rehabilitation after endovascular thrombectomy for stroke",
        venue: "Stroke",
        expect: -999,
        why: "global red flag",
    },
    Case {
        category: "Geriatrics",
        text: "Hearing aids and balance training in older adults",
        venue: "J Geriatr Phys Ther",
        expect: -999,
        why: "red flag beats preferred venue",
    },
    Case {
        category: "Orthopedics",
        text: "Lumbar fusion outcomes at one year",
        venue: "Spine",
        expect: -200,
        why: "no PT signal",
    },
    Case {
        category: "Orthopedics",
        text: "Physical therapy cost-effectiveness for knee osteoarthritis",
        venue: "Phys Ther",
        expect: -999,
        why: "category ban",
    },
    Case {
        category: "Orthopedics",
        text: "Physiotherapy and the therapeutic relationship",
        venue: "Other",
        // "hip" inside "relationship": substring matching is kept as-is
        expect: 8 + 3,
        why: "substring boost",
    },
];

#[test]
fn handpicked_cases() {
    let cfg = CategoryConfig::builtin().expect("embedded config");
    let scorer = RelevanceScorer::new(&cfg.scoring);

    let mut failures = Vec::new();
    for c in CASES {
        let p = cfg.category(c.category).expect("known category");
        let got = scorer.score_detailed(c.text, p, c.venue);
        if got.score != c.expect {
            failures.push(format!(
                "[{}] {} ({}): expected {}, got {} {:?}",
                c.category, c.text, c.why, c.expect, got.score, got.reasons
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn threshold_is_eighteen_by_default() {
    let cfg = CategoryConfig::builtin().unwrap();
    assert_eq!(cfg.scoring.min_score, 18);
}
