//! # metacheck Core
//!
//! The pure half of metacheck: metadata model, prefix table, RDF building,
//! SPARQL query construction, result parsing and reshaping, the triple store
//! abstraction, and the isomorphism check built on top of it.
//!
//! This crate performs no network or filesystem I/O. Everything that talks
//! to the outside world (page fetches, web search, the GraphDB REST API)
//! lives in the `metacheck` crate and reaches this one through the
//! [`store::TripleStore`] trait.

pub mod compare;
pub mod error;
pub mod models;
pub mod prefix;
pub mod rdf;
pub mod results;
pub mod sparql;
pub mod store;

pub use error::{Error, Result};
