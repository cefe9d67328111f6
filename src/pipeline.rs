// src/pipeline.rs
//! One refresh run: per category search → history filter → fetch → score →
//! select → summarize → record, then render the page, inject it and persist
//! history. Categories run sequentially; callers must not run two refreshes
//! against the same history file at once.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};

use crate::analyze::summarize;
use crate::config::{CategoryConfig, CategoryProfile, RunConfig};
use crate::history::HistoryStore;
use crate::ingest::assemble_candidates;
use crate::ingest::providers::PubMedSource;
use crate::ingest::types::{CandidateSource, DateWindow};
use crate::relevance::RelevanceScorer;
use crate::render::{self, CardContent, CategoryCard, PreviousItem, PREVIOUS_SHOWN};
use crate::selector::{filter_unseen, select, Selection};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "literature_candidates_total",
            "Candidates fetched and scored, per category."
        );
        describe_counter!(
            "literature_selected_total",
            "Categories that produced a featured article."
        );
        describe_counter!(
            "literature_no_match_total",
            "Categories where no candidate reached the threshold."
        );
        describe_counter!(
            "literature_no_candidates_total",
            "Categories whose search returned nothing."
        );
        describe_gauge!(
            "literature_last_run_ts",
            "Unix timestamp of the last completed refresh run."
        );
    });
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub cards: Vec<CategoryCard>,
    /// Markup for between the page markers.
    pub html: String,
}

impl RunReport {
    pub fn selected_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|c| matches!(c.content, CardContent::Featured { .. }))
            .count()
    }
}

/// Run every category against `source`, updating `history` in memory.
/// Nothing is written to disk here.
pub async fn run_once<S>(
    source: &S,
    cfg: &CategoryConfig,
    run: &RunConfig,
    history: &mut HistoryStore,
    now: DateTime<Utc>,
) -> Result<RunReport>
where
    S: CandidateSource + Sync + ?Sized,
{
    ensure_metrics_described();
    let scorer = RelevanceScorer::new(&cfg.scoring);
    let window = DateWindow::days_back_from(now.date_naive(), run.days_back);

    let mut cards = Vec::with_capacity(cfg.categories.len());
    for profile in &cfg.categories {
        let content = run_category(source, profile, &scorer, window, run, history)
            .await
            .with_context(|| format!("category `{}`", profile.name))?;
        cards.push(CategoryCard {
            category: profile.name.clone(),
            content,
        });
    }

    attach_previous(source, &mut cards, history).await;

    let html = render::render_page(&cards, now, run.days_back);
    gauge!("literature_last_run_ts").set(now.timestamp() as f64);
    Ok(RunReport { cards, html })
}

async fn run_category<S>(
    source: &S,
    profile: &CategoryProfile,
    scorer: &RelevanceScorer<'_>,
    window: DateWindow,
    run: &RunConfig,
    history: &mut HistoryStore,
) -> Result<CardContent>
where
    S: CandidateSource + Sync + ?Sized,
{
    let name = profile.name.as_str();
    let ids = source
        .search_ids(&profile.query, window, run.retmax)
        .await
        .context("esearch")?;
    if ids.is_empty() {
        counter!("literature_no_candidates_total", "category" => name.to_string()).increment(1);
        tracing::info!(target: "pipeline", category = name, "search returned no ids");
        return Ok(CardContent::NoCandidates);
    }

    // Filter on ids first so metadata is only fetched for what can be scored.
    let selection = {
        let seen = history.id_set(name);
        let candidate_ids = filter_unseen(&ids, &seen, run.score_top_n, |s| s.as_str());

        let meta = source
            .fetch_summaries(&candidate_ids)
            .await
            .context("esummary")?;
        let abstracts = source
            .fetch_abstracts(&candidate_ids)
            .await
            .context("efetch")?;
        let pool = assemble_candidates(&candidate_ids, meta, abstracts);
        counter!("literature_candidates_total", "category" => name.to_string())
            .increment(pool.len() as u64);
        tracing::debug!(
            target: "pipeline",
            category = name,
            found = ids.len(),
            fresh = pool.len(),
            source = source.name(),
            "candidates fetched"
        );

        select(&pool, profile, &seen, scorer, run.score_top_n)
    };

    match selection {
        Selection::Selected(winner) => {
            history.record(name, &winner.candidate.id);
            counter!("literature_selected_total", "category" => name.to_string()).increment(1);
            tracing::info!(
                target: "pipeline",
                category = name,
                id = %winner.candidate.id,
                score = winner.score,
                "featured article selected"
            );
            let summary = summarize(&winner.candidate.abstract_text, Some(profile));
            Ok(CardContent::Featured {
                article: winner.candidate,
                summary,
                score: winner.score,
                previous: Vec::new(),
            })
        }
        Selection::NoStrongMatch { best } => {
            counter!("literature_no_match_total", "category" => name.to_string()).increment(1);
            tracing::info!(
                target: "pipeline",
                category = name,
                best_score = best.as_ref().map(|b| b.score),
                threshold = scorer.rules().min_score,
                "no strong match"
            );
            Ok(CardContent::NoStrongMatch)
        }
        Selection::NoCandidates => {
            counter!("literature_no_candidates_total", "category" => name.to_string()).increment(1);
            Ok(CardContent::NoCandidates)
        }
    }
}

/// Fill "previously featured" for featured cards: earlier history entries,
/// excluding this run's winner, titled via one batched summary lookup.
/// A failed lookup only costs the titles.
async fn attach_previous<S>(source: &S, cards: &mut [CategoryCard], history: &HistoryStore)
where
    S: CandidateSource + Sync + ?Sized,
{
    let mut wanted: Vec<String> = Vec::new();
    let mut per_card: Vec<Vec<String>> = Vec::with_capacity(cards.len());
    for card in cards.iter() {
        let ids: Vec<String> = match &card.content {
            CardContent::Featured { article, .. } => history
                .previous(&card.category, 1, PREVIOUS_SHOWN + 1)
                .into_iter()
                .filter(|id| *id != article.id)
                .take(PREVIOUS_SHOWN)
                .collect(),
            _ => Vec::new(),
        };
        wanted.extend(ids.iter().cloned());
        per_card.push(ids);
    }

    let mut unique = HashSet::new();
    wanted.retain(|id| unique.insert(id.clone()));

    let titles: HashMap<String, String> = if wanted.is_empty() {
        HashMap::new()
    } else {
        match source.fetch_summaries(&wanted).await {
            Ok(meta) => meta.into_iter().map(|(id, m)| (id, m.title)).collect(),
            Err(e) => {
                tracing::warn!(target: "pipeline", error = ?e, "previous titles lookup failed");
                HashMap::new()
            }
        }
    };

    for (card, ids) in cards.iter_mut().zip(per_card) {
        if let CardContent::Featured { previous, .. } = &mut card.content {
            *previous = ids
                .into_iter()
                .map(|id| PreviousItem {
                    title: titles.get(&id).filter(|t| !t.is_empty()).cloned(),
                    id,
                })
                .collect();
        }
    }
}

/// Full refresh against PubMed. See [`run_with_source`].
pub async fn run(cfg: &CategoryConfig, run_cfg: &RunConfig) -> Result<bool> {
    let source = PubMedSource::from_config(run_cfg)?;
    run_with_source(&source, cfg, run_cfg).await
}

/// Load history, run, inject the page, then save history. Any failure before
/// injection leaves both files untouched; missing page markers abort before
/// history is saved. Returns whether the page changed.
pub async fn run_with_source<S>(
    source: &S,
    cfg: &CategoryConfig,
    run_cfg: &RunConfig,
) -> Result<bool>
where
    S: CandidateSource + Sync + ?Sized,
{
    let names = cfg.names();
    let mut history =
        HistoryStore::load_or_default(&run_cfg.history_path, &names, run_cfg.max_history);

    let report = run_once(source, cfg, run_cfg, &mut history, Utc::now()).await?;
    let changed = render::inject_into_file(&run_cfg.page_path, &report.html)?;
    history
        .save(&run_cfg.history_path)
        .context("saving history")?;

    tracing::info!(
        target: "pipeline",
        source = source.name(),
        categories = report.cards.len(),
        selected = report.selected_count(),
        changed,
        "refresh finished"
    );
    Ok(changed)
}
