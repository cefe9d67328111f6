// src/ingest/providers/mod.rs
pub mod fixture;
pub mod pubmed;

pub use fixture::FixtureSource;
pub use pubmed::PubMedSource;
