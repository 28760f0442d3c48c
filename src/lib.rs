//! # metacheck
//!
//! Detects websites whose metadata duplicates that of a target page.
//!
//! Given a URL, metacheck extracts the page's metadata, searches the web for
//! pages with the same title and keywords, stores every page as a
//! `foaf:Document` in an RDF triple store, and asks the store for subjects
//! that carry every attribute value of the target.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │  Extractor  │──▶│ RDF builder │──▶│   GraphDB    │
//! │ HTML + meta │   │  (Turtle)   │   │ (RDF4J REST) │
//! └─────────────┘   └─────────────┘   └──────┬───────┘
//!        ▲                                   │ SPARQL
//! ┌──────┴──────┐                     ┌──────▼───────┐
//! │ Web search  │                     │  Comparator  │
//! └─────────────┘                     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! metacheck serve                            # start HTTP server on :5005
//! metacheck validate https://example.com     # one-shot validation
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`traits`] | Collaborator traits (extractor, search, store) |
//! | [`extract`] | HTML metadata extraction |
//! | [`search`] | Candidate discovery via web search |
//! | [`graphdb`] | GraphDB / RDF4J store client |
//! | [`validate`] | The validation workflow |
//! | [`server`] | HTTP server |
//!
//! RDF construction, query building, result parsing, and the comparison
//! itself live in the `metacheck-core` crate.

pub mod config;
pub mod extract;
pub mod graphdb;
pub mod search;
pub mod server;
pub mod traits;
pub mod validate;
