//! Core data models used throughout metacheck.
//!
//! These types describe what flows through the validation pipeline: the
//! metadata scraped from a page, the solution rows that come back from the
//! triple store (as [`oxrdf`] terms), and the reshaped subject → predicate →
//! object table that is handed back to callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use oxrdf::{BlankNode, Literal, NamedNode, Term};

/// Metadata scraped from one web page.
///
/// `title`, `url` and `keywords` are the well-known fields the pipeline
/// reads; every other `<meta name=...>` tag lands in [`extra`](Self::extra).
/// Serializes as a single flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Text of the page's `<title>` element. `None` when the page has none.
    pub title: Option<String>,
    /// The URL the metadata was extracted from.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Remaining meta tags, keyed by normalized name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl MetadataRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Record a meta tag value under its normalized field name.
    ///
    /// Names that normalize to a well-known field overwrite it.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match normalize_field_name(name).as_str() {
            "title" => self.title = Some(value),
            "url" => self.url = value,
            "keywords" => self.keywords = Some(value),
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }

    /// Look up any field by (normalized) name.
    pub fn get(&self, name: &str) -> Option<&str> {
        match normalize_field_name(name).as_str() {
            "title" => self.title.as_deref(),
            "url" => Some(self.url.as_str()),
            "keywords" => self.keywords.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Web search terms for this page: the title, then the keywords.
    ///
    /// Blank values are left out, so a page with neither yields no terms.
    pub fn search_terms(&self) -> Vec<String> {
        [self.title.as_deref(), self.keywords.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Lower-case a meta tag name and replace `:` with `_` (`og:Title` → `og_title`).
pub fn normalize_field_name(name: &str) -> String {
    name.trim().replace(':', "_").to_lowercase()
}

/// A `?s ?p ?o` solution row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionRow {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl SolutionRow {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// Query results grouped as subject → predicate → object.
///
/// Every entry is the lexical form of its term in prefixed form
/// (`ex:target_a.com`, `foaf:title`, `ex:about`). Literal objects are
/// normalized too, so namespace IRIs inside their text are shortened.
/// A predicate that occurs more than once for a subject keeps its last
/// object.
pub type QueryResultTable = BTreeMap<String, BTreeMap<String, String>>;
