// tests/selection_scenarios.rs
// Scoring + selection scenarios over a small inline category profile.

use literature_digest::{
    select, Candidate, CategoryConfig, RelevanceScorer, Selection,
};
use std::collections::HashSet;

const TEST_TOML: &str = r#"
[scoring]
min_score = 18
required_terms = ["rehabilitation", "physical therapy", "exercise"]
red_flags = ["cochlear"]
study_design_terms = ["randomized", "cohort"]

[[categories]]
name = "Neurological"
query = "stroke rehabilitation"
preferred_sources = ["J Neurol Phys Ther"]
must_terms = ["stroke", "gait", "walking"]
boost_terms = ["treadmill", "balance", "cueing"]
banned_terms = ["thrombectomy"]
"#;

fn cfg() -> CategoryConfig {
    CategoryConfig::from_toml_str(TEST_TOML).expect("test config")
}

fn cand(id: &str, title: &str) -> Candidate {
    Candidate {
        id: id.into(),
        title: title.into(),
        venue: "Some Journal".into(),
        ..Default::default()
    }
}

fn no_history() -> HashSet<&'static str> {
    HashSet::new()
}

#[test]
fn a_category_ban_rejects_despite_boosts() {
    let c = cfg();
    let scorer = RelevanceScorer::new(&c.scoring);
    let p = c.category("Neurological").unwrap();
    let text = "Rehabilitation after thrombectomy: treadmill balance cueing for stroke gait";
    assert_eq!(scorer.score(text, p, "J Neurol Phys Ther"), -999);
}

#[test]
fn b_missing_required_never_beats_a_required_candidate() {
    let c = cfg();
    let scorer = RelevanceScorer::new(&c.scoring);
    let p = c.category("Neurological").unwrap();

    let weak = cand("1", "Stroke gait walking treadmill balance cueing");
    assert_eq!(scorer.score(&weak.scoring_text(), p, &weak.venue), -200);

    let plain = cand("2", "Rehabilitation services survey");
    let strong = cand("3", "Stroke gait walking rehabilitation");

    // best below threshold is still the required-term candidate
    match select(&[weak.clone(), plain.clone()], p, &no_history(), &scorer, 25) {
        Selection::NoStrongMatch { best: Some(b) } => {
            assert_eq!(b.candidate.id, "2");
            assert_eq!(b.score, 0);
        }
        other => panic!("unexpected {other:?}"),
    }

    let sel = select(&[weak, strong], p, &no_history(), &scorer, 25);
    assert_eq!(sel.selected().unwrap().candidate.id, "3");
}

#[test]
fn c_ties_keep_pool_order() {
    let c = cfg();
    let scorer = RelevanceScorer::new(&c.scoring);
    let p = c.category("Neurological").unwrap();
    let text = "Rehabilitation stroke gait walking treadmill balance";
    let first = cand("10", text);
    let second = cand("11", text);
    assert_eq!(scorer.score(&first.scoring_text(), p, &first.venue), 30);

    let sel = select(&[first, second], p, &no_history(), &scorer, 25);
    let w = sel.selected().expect("30 clears threshold");
    assert_eq!(w.candidate.id, "10");
    assert_eq!(w.score, 30);
}

#[test]
fn d_just_below_threshold_is_no_strong_match() {
    let c = cfg();
    let scorer = RelevanceScorer::new(&c.scoring);
    let p = c.category("Neurological").unwrap();
    let only = cand("20", "Rehabilitation stroke treadmill balance cueing");
    match select(&[only], p, &no_history(), &scorer, 25) {
        Selection::NoStrongMatch { best: Some(b) } => assert_eq!(b.score, 17),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn history_excludes_seen_unless_pool_would_be_empty() {
    let c = cfg();
    let scorer = RelevanceScorer::new(&c.scoring);
    let p = c.category("Neurological").unwrap();
    let text = "Rehabilitation stroke gait walking treadmill balance";
    let pool = vec![cand("1", text), cand("2", text)];

    let seen: HashSet<&str> = ["1"].into_iter().collect();
    let sel = select(&pool, p, &seen, &scorer, 25);
    assert_eq!(sel.selected().unwrap().candidate.id, "2");

    let all: HashSet<&str> = ["1", "2"].into_iter().collect();
    let sel = select(&pool, p, &all, &scorer, 25);
    assert_eq!(sel.selected().unwrap().candidate.id, "1");
}

#[test]
fn empty_pool_is_no_candidates() {
    let c = cfg();
    let scorer = RelevanceScorer::new(&c.scoring);
    let p = c.category("Neurological").unwrap();
    assert_eq!(select(&[], p, &no_history(), &scorer, 25), Selection::NoCandidates);
}

#[test]
fn max_candidates_bounds_the_pool() {
    let c = cfg();
    let scorer = RelevanceScorer::new(&c.scoring);
    let p = c.category("Neurological").unwrap();
    let pool = vec![
        cand("1", "Rehabilitation survey"),
        cand("2", "Rehabilitation stroke gait walking treadmill balance"),
    ];
    assert!(matches!(
        select(&pool, p, &no_history(), &scorer, 1),
        Selection::NoStrongMatch { .. }
    ));
}
