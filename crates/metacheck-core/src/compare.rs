//! The isomorphism check.
//!
//! "Isomorphic" here means attribute/value equality, not graph structure:
//! another subject matches when it carries every predicate/object pair the
//! target subject carries.
//!
//! # Algorithm
//!
//! 1. Fetch the target's triples with [`subject_query`].
//! 2. Turn each `(predicate, object)` pair into a [`Constraint`], keeping
//!    the IRI/literal kind the store reported for the object.
//! 3. Run [`isomorphic_query`] and [`reshape`] the matches.

use oxrdf::{NamedNode, Term};

use crate::error::Result;
use crate::models::{QueryResultTable, SolutionRow};
use crate::prefix::PrefixTable;
use crate::results::reshape;
use crate::sparql::{isomorphic_query, subject_query, Constraint};
use crate::store::TripleStore;

/// Find subjects other than `subject` sharing all of its predicate/object pairs.
///
/// Returns `Ok(None)` when nothing matches. When the target itself has no
/// stored triples there is nothing to match on, and the second query (which
/// would then select every subject in the store) is not issued.
pub async fn check_isomorphic(
    store: &dyn TripleStore,
    prefixes: &PrefixTable,
    subject: &NamedNode,
    limit: usize,
) -> Result<Option<QueryResultTable>> {
    let target_rows = store.select(&subject_query(subject, limit)).await?;
    let constraints = constraints_for(subject, &target_rows, prefixes);
    if constraints.is_empty() {
        return Ok(None);
    }

    let query = isomorphic_query(subject, &constraints, limit);
    let rows = store.select(&query).await?;
    Ok(reshape(&rows, prefixes))
}

/// Collect the distinct predicate/object pairs of `subject`.
///
/// Prefixed names in the rows are expanded, so constraints are always in
/// full-IRI form regardless of how the store spelled them.
pub fn constraints_for(subject: &NamedNode, rows: &[SolutionRow], prefixes: &PrefixTable) -> Vec<Constraint> {
    let mut constraints: Vec<Constraint> = Vec::new();
    for row in rows {
        let (Term::NamedNode(row_subject), Term::NamedNode(predicate)) = (&row.subject, &row.predicate) else {
            continue;
        };
        if prefixes.resolve(row_subject.as_str()) != subject.as_str() {
            continue;
        }
        let object = match &row.object {
            Term::NamedNode(node) => expanded(node, prefixes).into(),
            other => other.clone(),
        };
        let constraint = Constraint {
            predicate: expanded(predicate, prefixes),
            object,
        };
        if !constraints.contains(&constraint) {
            constraints.push(constraint);
        }
    }
    constraints
}

fn expanded(node: &NamedNode, prefixes: &PrefixTable) -> NamedNode {
    NamedNode::new(prefixes.resolve(node.as_str())).unwrap_or_else(|_| node.clone())
}
