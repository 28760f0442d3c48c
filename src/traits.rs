//! Collaborator traits for the validation pipeline.
//!
//! The orchestrator in [`crate::validate`] never talks to the network
//! directly. It goes through three seams, each of which can be replaced by
//! a test double or an alternative backend:
//!
//! ```text
//! ┌────────────────────┐  ┌────────────────────┐  ┌────────────────────┐
//! │ MetadataExtractor  │  │  CandidateSearch   │  │    TripleStore     │
//! │ (fetch + parse)    │  │  (web search)      │  │  (metacheck-core)  │
//! └─────────┬──────────┘  └─────────┬──────────┘  └─────────┬──────────┘
//!           └───────────────────────┼───────────────────────┘
//!                                   ▼
//!                          Validator::validate()
//! ```
//!
//! # Usage
//!
//! ```rust
//! use async_trait::async_trait;
//! use metacheck::traits::CandidateSearch;
//! use metacheck_core::Result;
//!
//! pub struct FixedResults(Vec<String>);
//!
//! #[async_trait]
//! impl CandidateSearch for FixedResults {
//!     fn name(&self) -> &str { "fixed" }
//!
//!     async fn search(&self, _terms: &[String], max_results: usize) -> Result<Vec<String>> {
//!         Ok(self.0.iter().take(max_results).cloned().collect())
//!     }
//! }
//! ```

use async_trait::async_trait;
use metacheck_core::models::MetadataRecord;
use metacheck_core::Result;

pub use metacheck_core::store::TripleStore;

/// Fetches a page and extracts its metadata.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Fetch `url` and return its metadata.
    ///
    /// The returned record's `url` is `url`. Fails with
    /// [`Error::Extraction`](metacheck_core::Error::Extraction) on network
    /// errors, non-success statuses, or unparseable bodies.
    async fn extract(&self, url: &str) -> Result<MetadataRecord>;
}

/// Finds candidate URLs that may duplicate the target page.
#[async_trait]
pub trait CandidateSearch: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Search the web for `terms`, returning at most `max_results` URLs.
    ///
    /// May return fewer results, including none.
    async fn search(&self, terms: &[String], max_results: usize) -> Result<Vec<String>>;
}
