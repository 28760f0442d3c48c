//! The validation workflow.
//!
//! [`Validator::validate`] runs one linear pipeline per request:
//!
//! 1. Parse the target URL into scheme + network location.
//! 2. Extract the target's metadata from `scheme://netloc`.
//! 3. Build its RDF under the id `target_<netloc>`.
//! 4. Collect search terms (title, keywords).
//! 5. Search the web for candidates.
//! 6. Skip candidates whose network location was already processed.
//! 7. Extract and build RDF for each remaining candidate.
//! 8. Write the whole RDF block to the store in one request.
//! 9. Run the isomorphism check against the target subject.
//! 10. Assemble the [`ValidationReport`].
//!
//! Any failure aborts the run. Nothing is retried and nothing runs
//! concurrently; each external call is awaited before the next starts.

use std::collections::HashSet;
use std::sync::Arc;

use metacheck_core::compare::check_isomorphic;
use metacheck_core::models::{MetadataRecord, QueryResultTable};
use metacheck_core::prefix::PrefixTable;
use metacheck_core::rdf::{candidate_id, document_statements, subject_iri, target_id, turtle_prologue};
use metacheck_core::sparql::DEFAULT_LIMIT;
use metacheck_core::{Error, Result};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::extract::{build_client, HtmlMetadataExtractor};
use crate::graphdb::GraphDbStore;
use crate::search::create_search;
use crate::traits::{CandidateSearch, MetadataExtractor, TripleStore};

/// Response body of a validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Network location of the target.
    pub url: String,
    /// The full Turtle block written to the store.
    pub rdf: String,
    /// Metadata extracted from the target.
    pub metadata: MetadataRecord,
    /// Candidate URLs exactly as returned by the search provider.
    pub search_result: Vec<String>,
    /// Subjects sharing all of the target's attribute values, if any.
    pub result: Option<QueryResultTable>,
}

/// Scheme and network location (`host[:port]`) of a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub scheme: String,
    pub netloc: String,
}

impl Location {
    /// `scheme://netloc`, the address metadata is fetched from.
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.netloc)
    }
}

/// Parse an absolute `http`/`https` URL into a [`Location`].
pub fn parse_location(raw: &str) -> Result<Location> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::MalformedInput("url must not be empty".into()));
    }
    let url = Url::parse(raw).map_err(|e| Error::MalformedInput(format!("{}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::MalformedInput(format!(
            "unsupported scheme '{}' in {}",
            url.scheme(),
            raw
        )));
    }
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| Error::MalformedInput(format!("no host in {}", raw)))?;
    let netloc = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    Ok(Location {
        scheme: url.scheme().to_string(),
        netloc,
    })
}

/// Runs validations against a fixed set of collaborators.
pub struct Validator {
    extractor: Arc<dyn MetadataExtractor>,
    search: Arc<dyn CandidateSearch>,
    store: Arc<dyn TripleStore>,
    prefixes: PrefixTable,
    max_results: usize,
    query_limit: usize,
}

impl Validator {
    pub fn new(
        extractor: Arc<dyn MetadataExtractor>,
        search: Arc<dyn CandidateSearch>,
        store: Arc<dyn TripleStore>,
    ) -> Self {
        Self {
            extractor,
            search,
            store,
            prefixes: PrefixTable::standard(),
            max_results: 3,
            query_limit: DEFAULT_LIMIT,
        }
    }

    /// Build the HTTP-backed collaborators described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = build_client(&config.fetch)?;
        let extractor = Arc::new(HtmlMetadataExtractor::new(client.clone()));
        let search = create_search(&config.search, client.clone())?;
        let store = Arc::new(GraphDbStore::new(client, &config.store)?);
        Ok(Self::new(extractor, search, store)
            .with_max_results(config.search.max_results)
            .with_query_limit(config.store.query_limit))
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_query_limit(mut self, query_limit: usize) -> Self {
        self.query_limit = query_limit;
        self
    }

    pub fn store(&self) -> &Arc<dyn TripleStore> {
        &self.store
    }

    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    pub fn query_limit(&self) -> usize {
        self.query_limit
    }

    /// Extract metadata for the origin of `url`.
    pub async fn extract(&self, url: &str) -> Result<MetadataRecord> {
        let location = parse_location(url)?;
        self.extractor.extract(&location.origin()).await
    }

    /// Run the full validation pipeline for `url`.
    pub async fn validate(&self, url: &str) -> Result<ValidationReport> {
        let target = parse_location(url)?;
        info!(target = %target.netloc, "Validating");

        let metadata = self.extractor.extract(&target.origin()).await?;
        let target_id = target_id(&target.netloc);
        let mut rdf = turtle_prologue();
        rdf.push_str(&document_statements(&target_id, &metadata)?);

        let terms = metadata.search_terms();
        let search_result = if terms.is_empty() {
            warn!(target = %target.netloc, "No title or keywords to search for");
            Vec::new()
        } else {
            self.search.search(&terms, self.max_results).await?
        };
        info!(
            provider = self.search.name(),
            candidates = search_result.len(),
            "Candidate discovery finished"
        );

        let mut searched = HashSet::new();
        for candidate in &search_result {
            let location = parse_location(candidate)?;
            if !searched.insert(location.netloc.clone()) {
                debug!(domain = %location.netloc, "Domain already processed");
                continue;
            }
            let candidate_meta = self.extractor.extract(&location.origin()).await?;
            rdf.push_str(&document_statements(&candidate_id(&location.netloc), &candidate_meta)?);
        }

        self.store.put_statements(&rdf).await?;

        info!(subject = %target_id, "Checking for isomorphic graphs");
        let result = check_isomorphic(
            self.store.as_ref(),
            &self.prefixes,
            &subject_iri(&target_id)?,
            self.query_limit,
        )
        .await?;
        info!(
            matches = result.as_ref().map_or(0, |t| t.len()),
            "Validation finished"
        );

        Ok(ValidationReport {
            url: target.netloc,
            rdf,
            metadata,
            search_result,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use metacheck_core::models::{Literal, NamedNode, SolutionRow};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StubExtractor {
        pages: HashMap<String, MetadataRecord>,
        calls: Mutex<Vec<String>>,
    }

    impl StubExtractor {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, title)| (url.to_string(), MetadataRecord::new(*url).with_title(*title)))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MetadataExtractor for StubExtractor {
        async fn extract(&self, url: &str) -> Result<MetadataRecord> {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| Error::extraction(url, "404 Not Found"))
        }
    }

    struct StubSearch {
        urls: Vec<String>,
        terms: Mutex<Vec<Vec<String>>>,
    }

    impl StubSearch {
        fn new(urls: &[&str]) -> Self {
            Self {
                urls: urls.iter().map(|u| u.to_string()).collect(),
                terms: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CandidateSearch for StubSearch {
        fn name(&self) -> &str {
            "stub"
        }

        async fn search(&self, terms: &[String], max_results: usize) -> Result<Vec<String>> {
            self.terms.lock().unwrap().push(terms.to_vec());
            Ok(self.urls.iter().take(max_results).cloned().collect())
        }
    }

    #[derive(Default)]
    struct StubStore {
        fail_writes: bool,
        responses: Mutex<Vec<Vec<SolutionRow>>>,
        writes: Mutex<Vec<String>>,
        queries: Mutex<Vec<String>>,
    }

    impl StubStore {
        fn answering(mut responses: Vec<Vec<SolutionRow>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl TripleStore for StubStore {
        async fn put_statements(&self, turtle: &str) -> Result<()> {
            if self.fail_writes {
                return Err(Error::StoreWrite("503 Service Unavailable".into()));
            }
            self.writes.lock().unwrap().push(turtle.to_string());
            Ok(())
        }

        async fn select(&self, query: &str) -> Result<Vec<SolutionRow>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.responses.lock().unwrap().pop().unwrap_or_default())
        }
    }

    fn target_row() -> SolutionRow {
        SolutionRow::new(
            NamedNode::new_unchecked("http://example.org/target_example.com").into(),
            NamedNode::new_unchecked("http://xmlns.com/foaf/0.1/title").into(),
            Literal::new_simple_literal("Example").into(),
        )
    }

    #[test]
    fn test_parse_location() {
        let loc = parse_location("https://www.example.com/some/path?q=1").unwrap();
        assert_eq!(loc.scheme, "https");
        assert_eq!(loc.netloc, "www.example.com");
        assert_eq!(loc.origin(), "https://www.example.com");

        let loc = parse_location("http://localhost:8080/").unwrap();
        assert_eq!(loc.netloc, "localhost:8080");
    }

    #[test]
    fn test_parse_location_rejects_malformed() {
        for raw in ["", "   ", "example.com", "ftp://example.com", "mailto:a@b.com", "http://"] {
            assert!(
                matches!(parse_location(raw), Err(Error::MalformedInput(_))),
                "accepted {raw:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_validate_without_candidates() {
        let extractor = Arc::new(StubExtractor::new(&[("http://example.com", "Example")]));
        let search = Arc::new(StubSearch::new(&[]));
        let store = Arc::new(StubStore::answering(vec![vec![target_row()], vec![]]));
        let validator = Validator::new(extractor.clone(), search, store.clone());

        let report = validator.validate("http://example.com").await.unwrap();

        assert_eq!(report.url, "example.com");
        assert!(report.search_result.is_empty());
        assert!(report.result.is_none());
        assert_eq!(report.metadata.title.as_deref(), Some("Example"));
        assert!(report.rdf.contains("<http://example.org/target_example.com> a foaf:Document"));

        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0], report.rdf);
        assert_eq!(store.queries.lock().unwrap().len(), 2);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["search_result"], serde_json::json!([]));
        assert!(json["result"].is_null());
    }

    #[tokio::test]
    async fn test_candidates_deduplicated_by_domain() {
        let extractor = Arc::new(StubExtractor::new(&[
            ("http://example.com", "Example"),
            ("http://x.com", "X"),
            ("http://y.com", "Y"),
        ]));
        let search = Arc::new(StubSearch::new(&["http://x.com/a", "http://x.com/b", "http://y.com"]));
        let store = Arc::new(StubStore::answering(vec![vec![target_row()], vec![]]));
        let validator = Validator::new(extractor.clone(), search, store);

        let report = validator.validate("http://example.com/index.html").await.unwrap();

        assert_eq!(
            *extractor.calls.lock().unwrap(),
            vec!["http://example.com", "http://x.com", "http://y.com"]
        );
        assert_eq!(report.search_result.len(), 3);
        assert_eq!(report.rdf.matches("a foaf:Document").count(), 3);
        assert!(report.rdf.contains("<http://example.org/x.com> a foaf:Document"));
        assert!(report.rdf.contains("<http://example.org/y.com> a foaf:Document"));
    }

    #[tokio::test]
    async fn test_search_terms_and_limit() {
        let mut record = MetadataRecord::new("http://example.com").with_title("Example");
        record.insert("keywords", "alpha, beta");
        let mut extractor = StubExtractor::new(&[("http://a.com", "A"), ("http://b.com", "B")]);
        extractor.pages.insert("http://example.com".into(), record);

        let search = Arc::new(StubSearch::new(&["http://a.com", "http://b.com", "http://c.com"]));
        let store = Arc::new(StubStore::answering(vec![vec![target_row()], vec![]]));
        let validator = Validator::new(Arc::new(extractor), search.clone(), store).with_max_results(2);

        let report = validator.validate("http://example.com").await.unwrap();
        assert_eq!(report.search_result, vec!["http://a.com", "http://b.com"]);
        assert_eq!(
            search.terms.lock().unwrap()[0],
            vec!["Example".to_string(), "alpha, beta".to_string()]
        );
    }

    #[tokio::test]
    async fn test_malformed_url_makes_no_calls() {
        let extractor = Arc::new(StubExtractor::new(&[]));
        let store = Arc::new(StubStore::default());
        let validator = Validator::new(extractor.clone(), Arc::new(StubSearch::new(&[])), store.clone());

        let err = validator.validate("").await.unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(extractor.calls.lock().unwrap().is_empty());
        assert!(store.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_candidate_extraction_failure_aborts() {
        let extractor = Arc::new(StubExtractor::new(&[("http://example.com", "Example")]));
        let search = Arc::new(StubSearch::new(&["http://gone.com/page"]));
        let store = Arc::new(StubStore::default());
        let validator = Validator::new(extractor, search, store.clone());

        let err = validator.validate("http://example.com").await.unwrap_err();
        assert!(matches!(err, Error::Extraction { ref url, .. } if url == "http://gone.com"));
        assert!(store.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_candidate_aborts() {
        let extractor = Arc::new(StubExtractor::new(&[("http://example.com", "Example")]));
        let search = Arc::new(StubSearch::new(&["not a url"]));
        let store = Arc::new(StubStore::default());
        let validator = Validator::new(extractor.clone(), search, store.clone());

        let err = validator.validate("http://example.com").await.unwrap_err();
        assert!(matches!(err, Error::MalformedInput(ref m) if m.contains("not a url")));
        assert_eq!(*extractor.calls.lock().unwrap(), vec!["http://example.com"]);
        assert!(store.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_write_failure_skips_comparison() {
        let extractor = Arc::new(StubExtractor::new(&[("http://example.com", "Example")]));
        let store = Arc::new(StubStore {
            fail_writes: true,
            ..Default::default()
        });
        let validator = Validator::new(extractor, Arc::new(StubSearch::new(&[])), store.clone());

        let err = validator.validate("http://example.com").await.unwrap_err();
        assert!(matches!(err, Error::StoreWrite(_)));
        assert!(store.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_target_without_title() {
        let mut extractor = StubExtractor::new(&[]);
        extractor
            .pages
            .insert("http://example.com".into(), MetadataRecord::new("http://example.com"));
        let validator = Validator::new(
            Arc::new(extractor),
            Arc::new(StubSearch::new(&[])),
            Arc::new(StubStore::default()),
        );
        let err = validator.validate("http://example.com").await.unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
    }
}
