// src/config/mod.rs
//! Category profiles and global scoring rules (TOML), plus env-driven run settings.
//!
//! Resolution order for the category file:
//! 1) $LITERATURE_CATEGORIES_PATH (must exist if set)
//! 2) config/categories.toml relative to the working directory
//! 3) the copy embedded at build time
//!
//! Everything here is built once at startup and passed around by reference.

pub mod run;

pub use run::RunConfig;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CATEGORIES_PATH: &str = "config/categories.toml";
pub const ENV_CATEGORIES_PATH: &str = "LITERATURE_CATEGORIES_PATH";
pub const ENV_MIN_SCORE: &str = "LITERATURE_MIN_SCORE";

const BUILTIN_CATEGORIES: &str = include_str!("../../config/categories.toml");

/// One clinical topic bucket with its own query and scoring profile.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryProfile {
    pub name: String,
    /// Opaque search string handed to the candidate source.
    pub query: String,
    /// Overrides the global required list when non-empty.
    #[serde(default)]
    pub required_terms: Vec<String>,
    #[serde(default)]
    pub must_terms: Vec<String>,
    #[serde(default)]
    pub boost_terms: Vec<String>,
    #[serde(default)]
    pub banned_terms: Vec<String>,
    #[serde(default)]
    pub preferred_sources: Vec<String>,
    /// Category-level guidance used when no topic hint matches.
    #[serde(default)]
    pub generic_advice: Option<String>,
}

/// Global scoring knobs shared by every category.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringRules {
    #[serde(default = "default_min_score")]
    pub min_score: i32,
    #[serde(default = "default_rejected_score")]
    pub rejected_score: i32,
    #[serde(default = "default_weak_signal_score")]
    pub weak_signal_score: i32,
    #[serde(default = "default_preferred_source_weight")]
    pub preferred_source_weight: i32,
    #[serde(default = "default_must_term_weight")]
    pub must_term_weight: i32,
    #[serde(default = "default_boost_term_weight")]
    pub boost_term_weight: i32,
    #[serde(default = "default_study_design_weight")]
    pub study_design_weight: i32,
    #[serde(default)]
    pub required_terms: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub study_design_terms: Vec<String>,
}

fn default_min_score() -> i32 {
    18
}
fn default_rejected_score() -> i32 {
    -999
}
fn default_weak_signal_score() -> i32 {
    -200
}
fn default_preferred_source_weight() -> i32 {
    25
}
fn default_must_term_weight() -> i32 {
    8
}
fn default_boost_term_weight() -> i32 {
    3
}
fn default_study_design_weight() -> i32 {
    4
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            rejected_score: default_rejected_score(),
            weak_signal_score: default_weak_signal_score(),
            preferred_source_weight: default_preferred_source_weight(),
            must_term_weight: default_must_term_weight(),
            boost_term_weight: default_boost_term_weight(),
            study_design_weight: default_study_design_weight(),
            required_terms: Vec::new(),
            red_flags: Vec::new(),
            study_design_terms: Vec::new(),
        }
    }
}

/// Root of `categories.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    #[serde(default)]
    pub scoring: ScoringRules,
    pub categories: Vec<CategoryProfile>,
}

impl CategoryConfig {
    /// Resolve the category file (env → default path → embedded copy) and apply
    /// the optional `LITERATURE_MIN_SCORE` override.
    pub fn load_default() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CATEGORIES_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    bail!(
                        "{ENV_CATEGORIES_PATH} points to non-existent path {}",
                        pb.display()
                    );
                }
                Self::load_from(&pb)?
            }
            Err(_) => {
                let default = PathBuf::from(DEFAULT_CATEGORIES_PATH);
                if default.exists() {
                    Self::load_from(&default)?
                } else {
                    tracing::debug!(target: "config", "using embedded category config");
                    Self::builtin()?
                }
            }
        };

        if let Some(t) = parse_min_score_env(std::env::var(ENV_MIN_SCORE).ok()) {
            cfg.scoring.min_score = t;
        }
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading category config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing category config at {}", path.display()))
    }

    /// The category file shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATEGORIES).context("parsing embedded category config")
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let mut cfg: CategoryConfig = toml::from_str(toml_str)?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryProfile> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    // Terms are matched against lowercased text, so store them lowercased and trimmed.
    fn normalize(&mut self) {
        for list in [
            &mut self.scoring.required_terms,
            &mut self.scoring.red_flags,
            &mut self.scoring.study_design_terms,
        ] {
            *list = clean_terms(std::mem::take(list));
        }
        for c in &mut self.categories {
            c.name = c.name.trim().to_string();
            for list in [
                &mut c.required_terms,
                &mut c.must_terms,
                &mut c.boost_terms,
                &mut c.banned_terms,
            ] {
                *list = clean_terms(std::mem::take(list));
            }
            c.preferred_sources = c
                .preferred_sources
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            bail!("category config defines no categories");
        }
        let mut seen = HashSet::new();
        for c in &self.categories {
            if c.name.is_empty() {
                bail!("category with empty name");
            }
            if c.query.trim().is_empty() {
                bail!("category `{}` has an empty query", c.name);
            }
            if !seen.insert(c.name.as_str()) {
                return Err(anyhow!("duplicate category name `{}`", c.name));
            }
        }
        Ok(())
    }
}

/// Lowercase, trim, drop empties; keeps first occurrence order.
fn clean_terms(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() && seen.insert(t.clone()) {
            out.push(t);
        }
    }
    out
}

fn parse_min_score_env(raw: Option<String>) -> Option<i32> {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
}
