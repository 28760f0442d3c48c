//! SPARQL query construction.
//!
//! Two SELECT shapes are needed by the isomorphism check:
//!
//! - [`subject_query`]: every triple of one `foaf:Document` subject.
//! - [`isomorphic_query`]: every *other* subject that carries all of a
//!   given set of predicate/object pairs.
//!
//! Queries are written with full IRIs only, so they need no `PREFIX`
//! prologue. Every IRI and literal is an [`oxrdf`] term and is written with
//! its N-Triples form, which is valid SPARQL.

use oxrdf::vocab::rdf;
use oxrdf::{NamedNode, Term};

use crate::rdf::FOAF_DOCUMENT;

/// Row cap applied to every query.
pub const DEFAULT_LIMIT: usize = 100;

/// A `?s <predicate> object` pattern copied from the target subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub predicate: NamedNode,
    pub object: Term,
}

/// Select all triples of the `foaf:Document` subject `subject`.
pub fn subject_query(subject: &NamedNode, limit: usize) -> String {
    format!(
        "SELECT ?s ?p ?o WHERE {{\n  ?s {} {} .\n  ?s ?p ?o .\n  FILTER (?s = {})\n}}\nLIMIT {}\n",
        rdf::TYPE,
        FOAF_DOCUMENT,
        subject,
        limit,
    )
}

/// Select every subject other than `subject` matching all `constraints`.
///
/// Constraints whose object is a blank node are skipped: blank node labels
/// are local to one result set and cannot be matched in a later query.
pub fn isomorphic_query(subject: &NamedNode, constraints: &[Constraint], limit: usize) -> String {
    let mut patterns = String::new();
    for constraint in constraints {
        if let Some(object) = term_pattern(&constraint.object) {
            patterns.push_str(&format!("  ?s {} {} .\n", constraint.predicate, object));
        }
    }

    format!(
        "SELECT ?s ?p ?o WHERE {{\n{}  ?s ?p ?o .\n  FILTER (?s != {})\n}}\nLIMIT {}\n",
        patterns, subject, limit,
    )
}

/// Render a term as a SPARQL pattern object; `None` for blank nodes.
pub fn term_pattern(term: &Term) -> Option<String> {
    match term {
        Term::NamedNode(node) => Some(node.to_string()),
        Term::Literal(literal) => Some(literal.to_string()),
        _ => None,
    }
}
