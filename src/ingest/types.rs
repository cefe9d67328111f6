// src/ingest/types.rs
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

/// Per-article metadata as returned by a summary lookup.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ArticleMeta {
    pub title: String,
    pub venue: String, // journal abbreviation, e.g. "J Orthop Sports Phys Ther"
    pub pub_date: String,
    pub doi: Option<String>,
    pub pmcid: Option<String>,
}

/// One fetched article, eligible for scoring during a single selection pass.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub venue: String,
    pub pub_date: String,
    pub abstract_text: String, // may be empty
    pub doi: Option<String>,
    pub pmcid: Option<String>,
}

impl Candidate {
    /// Text the scorer looks at: title, venue and abstract.
    pub fn scoring_text(&self) -> String {
        format!("{} {} {}", self.title, self.venue, self.abstract_text)
    }
}

/// Inclusive publication-date window for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn days_back_from(end: NaiveDate, days_back: i64) -> Self {
        Self {
            start: end - Duration::days(days_back.max(0)),
            end,
        }
    }

    /// `YYYY/MM/DD` pair as E-utilities expects.
    pub fn as_query_dates(&self) -> (String, String) {
        (
            self.start.format("%Y/%m/%d").to_string(),
            self.end.format("%Y/%m/%d").to_string(),
        )
    }
}

/// Literature source adapter. Ids come back most-recent-first; lookups tolerate
/// partial results (missing ids are simply absent from the map).
#[async_trait::async_trait]
pub trait CandidateSource {
    async fn search_ids(&self, query: &str, window: DateWindow, retmax: usize)
        -> Result<Vec<String>>;
    async fn fetch_summaries(&self, ids: &[String]) -> Result<HashMap<String, ArticleMeta>>;
    async fn fetch_abstracts(&self, ids: &[String]) -> Result<HashMap<String, String>>;
    fn name(&self) -> &'static str;
}
