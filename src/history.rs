// src/history.rs
//! Per-category record of previously featured article ids (no repeats across runs).
//!
//! On disk this is a flat JSON object `{ "<category>": ["<id>", ...] }`, newest first.
//! Loaded once at run start and written whole at run end; callers must serialize runs.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_HISTORY: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore {
    entries: BTreeMap<String, Vec<String>>,
    cap: usize,
}

impl HistoryStore {
    /// Empty lists for every known category.
    pub fn empty<S: AsRef<str>>(categories: &[S], cap: usize) -> Self {
        let entries = categories
            .iter()
            .map(|c| (c.as_ref().to_string(), Vec::new()))
            .collect();
        Self {
            entries,
            cap: cap.clamp(1, 10_000),
        }
    }

    /// Load from `path`. A missing or unreadable file is not an error: the store
    /// starts empty and a fresh file is written at the end of the run.
    pub fn load_or_default<S: AsRef<str>>(path: &Path, categories: &[S], cap: usize) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::info!(target: "history", path = %path.display(), error = %e, "no history file, starting empty");
                return Self::empty(categories, cap);
            }
        };
        match Self::from_json_str(&content, categories, cap) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(target: "history", path = %path.display(), error = %e, "corrupt history file, starting empty");
                Self::empty(categories, cap)
            }
        }
    }

    /// Parse the on-disk shape. Numeric ids are coerced to strings; categories
    /// not configured anymore are kept so their history is not lost.
    pub fn from_json_str<S: AsRef<str>>(s: &str, categories: &[S], cap: usize) -> Result<Self> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(s).context("parsing history json")?;
        let mut store = Self::empty(categories, cap);
        for (name, val) in raw {
            let ids: Vec<String> = match val {
                Value::Array(items) => items.into_iter().filter_map(id_to_string).collect(),
                Value::Null => Vec::new(),
                other => anyhow::bail!("history entry `{name}` is not a list: {other}"),
            };
            store.entries.insert(name, ids);
        }
        Ok(store)
    }

    pub fn ids(&self, category: &str) -> &[String] {
        self.entries
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn id_set(&self, category: &str) -> HashSet<&str> {
        self.ids(category).iter().map(String::as_str).collect()
    }

    /// Put `id` at the front of the category's list and re-truncate to the cap.
    pub fn record(&mut self, category: &str, id: &str) {
        let v = self.entries.entry(category.to_string()).or_default();
        v.insert(0, id.to_string());
        v.truncate(self.cap);
    }

    /// Up to `n` earlier ids, skipping `skip_newest` entries at the front.
    pub fn previous(&self, category: &str, skip_newest: usize, n: usize) -> Vec<String> {
        self.ids(category)
            .iter()
            .skip(skip_newest)
            .take(n)
            .cloned()
            .collect()
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.entries).context("serializing history")
    }

    /// Write the whole store, replacing the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating history dir {}", dir.display()))?;
        }
        let body = self.to_json_string()?;
        fs::write(path, body).with_context(|| format!("writing history to {}", path.display()))
    }
}

fn id_to_string(v: Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
