// src/ingest/providers/fixture.rs
//! In-memory candidate source for offline runs and tests.
//! Searches are keyed by the exact query string; every call is recorded.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::ingest::types::{ArticleMeta, CandidateSource, DateWindow};

/// Which lookup should fail, for error-path tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Search,
    Summaries,
    Abstracts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureCall {
    Search { query: String, retmax: usize },
    Summaries(Vec<String>),
    Abstracts(Vec<String>),
}

#[derive(Default)]
pub struct FixtureSource {
    searches: HashMap<String, Vec<String>>,
    meta: HashMap<String, ArticleMeta>,
    abstracts: HashMap<String, String>,
    fail_at: Option<FailAt>,
    calls: Mutex<Vec<FixtureCall>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids returned for `query`, most recent first.
    pub fn with_search<I, S>(mut self, query: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searches
            .insert(query.to_string(), ids.into_iter().map(Into::into).collect());
        self
    }

    /// Metadata and abstract for one id. An empty abstract is not stored,
    /// so the id is absent from abstract lookups.
    pub fn with_article(mut self, id: &str, meta: ArticleMeta, abstract_text: &str) -> Self {
        self.meta.insert(id.to_string(), meta);
        if !abstract_text.is_empty() {
            self.abstracts
                .insert(id.to_string(), abstract_text.to_string());
        }
        self
    }

    pub fn failing(mut self, at: FailAt) -> Self {
        self.fail_at = Some(at);
        self
    }

    pub fn calls(&self) -> Vec<FixtureCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn log(&self, call: FixtureCall) {
        if let Ok(mut c) = self.calls.lock() {
            c.push(call);
        }
    }
}

#[async_trait]
impl CandidateSource for FixtureSource {
    async fn search_ids(
        &self,
        query: &str,
        _window: DateWindow,
        retmax: usize,
    ) -> Result<Vec<String>> {
        self.log(FixtureCall::Search {
            query: query.to_string(),
            retmax,
        });
        if self.fail_at == Some(FailAt::Search) {
            bail!("fixture search failure");
        }
        Ok(self
            .searches
            .get(query)
            .map(|ids| ids.iter().take(retmax).cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch_summaries(&self, ids: &[String]) -> Result<HashMap<String, ArticleMeta>> {
        self.log(FixtureCall::Summaries(ids.to_vec()));
        if self.fail_at == Some(FailAt::Summaries) {
            bail!("fixture summary failure");
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.meta.get(id).map(|m| (id.clone(), m.clone())))
            .collect())
    }

    async fn fetch_abstracts(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        self.log(FixtureCall::Abstracts(ids.to_vec()));
        if self.fail_at == Some(FailAt::Abstracts) {
            bail!("fixture abstract failure");
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.abstracts.get(id).map(|a| (id.clone(), a.clone())))
            .collect())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
