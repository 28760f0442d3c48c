//! RDF building.
//!
//! Turns a [`MetadataRecord`] into a small Turtle fragment describing the
//! page as a `foaf:Document`:
//!
//! ```text
//! <http://example.org/target_example.com> a foaf:Document ;
//!   foaf:title "Example" ;
//!   foaf:page "http://example.com" .
//! ```
//!
//! Fragments for several pages are concatenated after a single
//! [`turtle_prologue`] and written to the store in one request. Subjects are
//! [`NamedNode`]s, so they are IRI-checked on construction, and literal text
//! goes through [`Literal`]'s N-Triples escaping.

use oxrdf::{Literal, NamedNode, NamedNodeRef};

use crate::error::{Error, Result};
use crate::models::MetadataRecord;
use crate::prefix::{EX, FOAF};

pub const FOAF_DOCUMENT: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/Document");

/// Subject id of the page being validated: `target_<netloc>`.
pub fn target_id(netloc: &str) -> String {
    format!("target_{}", netloc)
}

/// Subject id of a search candidate: its location with `/` replaced by `_`.
pub fn candidate_id(location: &str) -> String {
    location.replace('/', "_")
}

/// Subject IRI for an id, in the `ex:` namespace.
pub fn subject_iri(id: &str) -> Result<NamedNode> {
    if id.is_empty() {
        return Err(Error::MalformedInput("subject id must not be empty".into()));
    }
    let iri = format!("{}{}", EX, id);
    NamedNode::new(&iri).map_err(|e| Error::MalformedInput(format!("invalid IRI {}: {}", iri, e)))
}

/// `@prefix` declarations for the names used in [`document_statements`].
pub fn turtle_prologue() -> String {
    format!("@prefix ex: <{}> .\n@prefix foaf: <{}> .\n", EX, FOAF)
}

/// Build the Turtle statements describing one page.
///
/// Fails with [`Error::MissingField`] when the record has no title and with
/// [`Error::MalformedInput`] when `id` cannot form an IRI.
pub fn document_statements(id: &str, metadata: &MetadataRecord) -> Result<String> {
    let title = metadata
        .title
        .as_deref()
        .ok_or_else(|| Error::MissingField("title".into()))?;
    let subject = subject_iri(id)?;

    Ok(format!(
        "\n{} a foaf:Document ;\n  foaf:title {} ;\n  foaf:page {} .\n",
        subject,
        Literal::new_simple_literal(title),
        Literal::new_simple_literal(&metadata.url),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> MetadataRecord {
        MetadataRecord::new("http://example.com").with_title(title)
    }

    fn title_of(rdf: &str) -> &str {
        let start = rdf.find("foaf:title \"").unwrap() + "foaf:title \"".len();
        let end = rdf[start..].find("\" ;").unwrap();
        &rdf[start..start + end]
    }

    #[test]
    fn test_document_statements_shape() {
        let rdf = document_statements("target_example.com", &record("Example")).unwrap();
        assert_eq!(rdf.matches("a foaf:Document").count(), 1);
        assert!(rdf.contains("<http://example.org/target_example.com> a foaf:Document ;"));
        assert!(rdf.contains("foaf:page \"http://example.com\" ."));
    }

    #[test]
    fn test_title_round_trips() {
        for title in ["Example", "Ünïcode — title", "", "a;b.c <tag>", "100% legit"] {
            let rdf = document_statements("x.com", &record(title)).unwrap();
            assert_eq!(title_of(&rdf), title);
        }
    }

    #[test]
    fn test_quotes_and_newlines_are_escaped() {
        let rdf = document_statements("x.com", &record("Say \"hi\"\nthen\\leave")).unwrap();
        assert_eq!(title_of(&rdf), "Say \\\"hi\\\"\\nthen\\\\leave");
        assert_eq!(rdf.lines().filter(|l| l.contains("foaf:title")).count(), 1);
    }

    #[test]
    fn test_missing_title() {
        let err = document_statements("x.com", &MetadataRecord::new("http://x.com")).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "title"));
    }

    #[test]
    fn test_bad_subject_ids() {
        for id in ["", "a b.com", "a>.com", "x\".com"] {
            assert!(
                matches!(document_statements(id, &record("t")), Err(Error::MalformedInput(_))),
                "accepted {id:?}"
            );
        }
    }

    #[test]
    fn test_subject_iri_with_port() {
        let iri = subject_iri(&target_id("localhost:8080")).unwrap();
        assert_eq!(iri.as_str(), "http://example.org/target_localhost:8080");
    }

    #[test]
    fn test_ids() {
        assert_eq!(target_id("example.com"), "target_example.com");
        assert_eq!(candidate_id("x.com"), "x.com");
        assert_eq!(candidate_id("x.com/a/b"), "x.com_a_b");
    }
}
