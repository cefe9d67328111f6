// src/selector.rs
//! Per-category winner selection: drop already-featured ids, score what is
//! left, keep the first highest score, apply the acceptance threshold.

use std::collections::HashSet;

use crate::config::CategoryProfile;
use crate::ingest::types::Candidate;
use crate::relevance::RelevanceScorer;

pub const DEFAULT_MAX_CANDIDATES: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected(ScoredCandidate),
    NoCandidates,
    /// Nothing reached the threshold; `best` is the top scorer for diagnostics.
    NoStrongMatch { best: Option<ScoredCandidate> },
}

impl Selection {
    pub fn selected(&self) -> Option<&ScoredCandidate> {
        match self {
            Selection::Selected(s) => Some(s),
            _ => None,
        }
    }
}

/// Items whose key is not in `seen`, in order, at most `max`. When every item
/// has been seen the unfiltered pool is used instead.
pub fn filter_unseen<T, F>(pool: &[T], seen: &HashSet<&str>, max: usize, key: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let fresh: Vec<T> = pool
        .iter()
        .filter(|c| !seen.contains(key(c)))
        .take(max)
        .cloned()
        .collect();
    if fresh.is_empty() {
        pool.iter().take(max).cloned().collect()
    } else {
        fresh
    }
}

/// First candidate with the strictly highest score.
pub fn select_best(scored: Vec<ScoredCandidate>) -> Option<ScoredCandidate> {
    let mut best: Option<ScoredCandidate> = None;
    for sc in scored {
        match &best {
            Some(b) if sc.score <= b.score => {}
            _ => best = Some(sc),
        }
    }
    best
}

pub fn score_pool(
    pool: Vec<Candidate>,
    profile: &CategoryProfile,
    scorer: &RelevanceScorer<'_>,
) -> Vec<ScoredCandidate> {
    pool.into_iter()
        .map(|c| {
            let score = scorer.score(&c.scoring_text(), profile, &c.venue);
            ScoredCandidate {
                candidate: c,
                score,
            }
        })
        .collect()
}

pub fn select(
    pool: &[Candidate],
    profile: &CategoryProfile,
    history: &HashSet<&str>,
    scorer: &RelevanceScorer<'_>,
    max_candidates: usize,
) -> Selection {
    let pool = filter_unseen(pool, history, max_candidates, |c| c.id.as_str());
    if pool.is_empty() {
        return Selection::NoCandidates;
    }

    let considered = pool.len();
    let best = select_best(score_pool(pool, profile, scorer));
    let threshold = scorer.rules().min_score;

    match best {
        Some(b) if b.score >= threshold => {
            tracing::debug!(
                target: "selector",
                category = %profile.name,
                id = %b.candidate.id,
                score = b.score,
                considered,
                "selected"
            );
            Selection::Selected(b)
        }
        best => {
            tracing::debug!(
                target: "selector",
                category = %profile.name,
                best_score = best.as_ref().map(|b| b.score),
                threshold,
                considered,
                "no candidate reached threshold"
            );
            Selection::NoStrongMatch { best }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(id: &str) -> Candidate {
        Candidate {
            id: id.into(),
            ..Default::default()
        }
    }

    #[test]
    fn filter_prefers_unseen_and_falls_back() {
        let pool: Vec<Candidate> = ["1", "2", "3"].iter().map(|i| cand(i)).collect();
        let seen: HashSet<&str> = ["1", "3"].into_iter().collect();
        let got = filter_unseen(&pool, &seen, 25, |c| c.id.as_str());
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "2");

        let all: HashSet<&str> = ["1", "2", "3"].into_iter().collect();
        let got = filter_unseen(&pool, &all, 2, |c| c.id.as_str());
        let ids: Vec<&str> = got.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn select_best_keeps_first_on_ties() {
        let scored = vec![
            ScoredCandidate {
                candidate: cand("a"),
                score: 5,
            },
            ScoredCandidate {
                candidate: cand("b"),
                score: 9,
            },
            ScoredCandidate {
                candidate: cand("c"),
                score: 9,
            },
        ];
        assert_eq!(select_best(scored).unwrap().candidate.id, "b");
        assert!(select_best(Vec::new()).is_none());
    }
}
