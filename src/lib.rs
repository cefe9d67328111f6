// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod analyze;
pub mod config;
pub mod history;
pub mod ingest;
pub mod pipeline;
pub mod relevance;
pub mod render;
pub mod selector;

pub use crate::analyze::{summarize, StructuredSummary};
pub use crate::config::{CategoryConfig, CategoryProfile, RunConfig, ScoringRules};
pub use crate::history::HistoryStore;
pub use crate::ingest::types::{ArticleMeta, Candidate, CandidateSource, DateWindow};
pub use crate::pipeline::{run_once, run_with_source, RunReport};
pub use crate::relevance::RelevanceScorer;
pub use crate::render::InjectError;
pub use crate::selector::{select, ScoredCandidate, Selection};
