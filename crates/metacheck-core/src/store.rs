//! Triple store abstraction.
//!
//! The [`TripleStore`] trait is the only way the pipeline reaches a store.
//! The `metacheck` crate implements it over the GraphDB / RDF4J REST API;
//! tests implement it with canned responses.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::SolutionRow;

/// A SPARQL-speaking RDF store.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`put_statements`](TripleStore::put_statements) | Write a Turtle block |
/// | [`select`](TripleStore::select) | Run a `?s ?p ?o` SELECT query |
#[async_trait]
pub trait TripleStore: Send + Sync {
    /// Write a block of Turtle statements.
    ///
    /// Fails with [`Error::StoreWrite`](crate::Error::StoreWrite).
    async fn put_statements(&self, turtle: &str) -> Result<()>;

    /// Run a SELECT query projecting `?s ?p ?o`.
    ///
    /// Returns an empty vector when nothing matches; fails with
    /// [`Error::StoreQuery`](crate::Error::StoreQuery) when the request fails
    /// or the response cannot be decoded.
    async fn select(&self, query: &str) -> Result<Vec<SolutionRow>>;
}
