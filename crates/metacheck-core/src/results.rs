//! SPARQL result parsing and reshaping.
//!
//! The store answers SELECT queries in one of several encodings:
//!
//! | Format | Media type | Term kinds |
//! |--------|------------|------------|
//! | `tsv` | `text/tab-separated-values` | exact |
//! | `json` | `application/sparql-results+json` | exact |
//! | `xml` | `application/sparql-results+xml` | exact |
//! | `csv` | `text/csv` | inferred: objects are IRIs only when they start with a registered namespace |
//!
//! The exact formats are decoded with [`sparesults`]. CSV drops the
//! IRI/literal distinction and cannot be decoded that way, so it is read
//! with the `csv` crate and classified here.
//!
//! [`reshape`] then groups `?s ?p ?o` rows into a [`QueryResultTable`].

use std::fmt;
use std::str::FromStr;

use oxrdf::{BlankNode, Literal, NamedNode, Term};
use serde::{Deserialize, Serialize};
use sparesults::{QueryResultsFormat, QueryResultsParser, ReaderQueryResultsParserOutput};

use crate::error::{Error, Result};
use crate::models::{QueryResultTable, SolutionRow};
use crate::prefix::PrefixTable;

/// Tabular SPARQL results encoding requested from the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    #[default]
    Tsv,
    Json,
    Xml,
    Csv,
}

impl ResultFormat {
    /// Value for the `Accept` header.
    pub fn media_type(self) -> &'static str {
        match self {
            ResultFormat::Tsv => "text/tab-separated-values",
            ResultFormat::Json => "application/sparql-results+json",
            ResultFormat::Xml => "application/sparql-results+xml",
            ResultFormat::Csv => "text/csv",
        }
    }

    fn sparesults_format(self) -> Option<QueryResultsFormat> {
        match self {
            ResultFormat::Tsv => Some(QueryResultsFormat::Tsv),
            ResultFormat::Json => Some(QueryResultsFormat::Json),
            ResultFormat::Xml => Some(QueryResultsFormat::Xml),
            ResultFormat::Csv => None,
        }
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultFormat::Tsv => f.write_str("tsv"),
            ResultFormat::Json => f.write_str("json"),
            ResultFormat::Xml => f.write_str("xml"),
            ResultFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for ResultFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tsv" => Ok(ResultFormat::Tsv),
            "json" => Ok(ResultFormat::Json),
            "xml" => Ok(ResultFormat::Xml),
            "csv" => Ok(ResultFormat::Csv),
            other => Err(Error::MalformedInput(format!(
                "unknown result format '{}'. Must be tsv, json, xml or csv.",
                other
            ))),
        }
    }
}

fn malformed(message: impl fmt::Display) -> Error {
    Error::StoreQuery(format!("malformed tabular data: {}", message))
}

/// Parse a `?s ?p ?o` SELECT response body into rows.
///
/// An empty body or a header with no rows yields an empty vector. Missing
/// `s`/`p`/`o` variables, unbound cells, and undecodable terms are reported
/// as [`Error::StoreQuery`].
pub fn parse_solutions(
    body: &str,
    format: ResultFormat,
    prefixes: &PrefixTable,
) -> Result<Vec<SolutionRow>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match format.sparesults_format() {
        Some(exact) => parse_exact(body, exact),
        None => parse_csv(body, prefixes),
    }
}

fn parse_exact(body: &str, format: QueryResultsFormat) -> Result<Vec<SolutionRow>> {
    let solutions = match QueryResultsParser::from_format(format)
        .for_reader(body.as_bytes())
        .map_err(malformed)?
    {
        ReaderQueryResultsParserOutput::Solutions(solutions) => solutions,
        ReaderQueryResultsParserOutput::Boolean(_) => {
            return Err(malformed("expected solutions, got a boolean result"))
        }
    };
    for name in ["s", "p", "o"] {
        if !solutions.variables().iter().any(|v| v.as_str() == name) {
            return Err(malformed(format!("missing column '{}'", name)));
        }
    }

    let mut rows = Vec::new();
    for solution in solutions {
        let solution = solution.map_err(malformed)?;
        let bound = |name: &str| {
            solution
                .get(name)
                .cloned()
                .ok_or_else(|| malformed(format!("unbound ?{}", name)))
        };
        rows.push(SolutionRow::new(bound("s")?, bound("p")?, bound("o")?));
    }
    Ok(rows)
}

fn parse_csv(body: &str, prefixes: &PrefixTable) -> Result<Vec<SolutionRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    let headers = reader.headers().map_err(malformed)?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().trim_start_matches(['?', '$']) == name)
            .ok_or_else(|| malformed(format!("missing column '{}'", name)))
    };
    let (s, p, o) = (column("s")?, column("p")?, column("o")?);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(malformed)?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        rows.push(SolutionRow::new(
            csv_resource(cell(s))?,
            csv_resource(cell(p))?,
            csv_object(cell(o), prefixes)?,
        ));
    }
    Ok(rows)
}

/// Subjects and predicates are never literals, so a CSV cell in those
/// positions is an IRI unless it carries a blank node label.
fn csv_resource(cell: &str) -> Result<Term> {
    if cell.is_empty() {
        return Err(malformed("unbound subject or predicate"));
    }
    match cell.strip_prefix("_:") {
        Some(label) => BlankNode::new(label).map(Term::from).map_err(malformed),
        None => NamedNode::new(cell).map(Term::from).map_err(malformed),
    }
}

/// CSV drops the IRI/literal distinction; an object counts as an IRI only
/// when it starts with a registered namespace and is a valid IRI.
fn csv_object(cell: &str, prefixes: &PrefixTable) -> Result<Term> {
    if cell.is_empty() {
        return Err(malformed("unbound object"));
    }
    if prefixes.starts_with_namespace(cell) {
        if let Ok(node) = NamedNode::new(cell) {
            return Ok(node.into());
        }
    }
    Ok(Literal::new_simple_literal(cell).into())
}

/// Group rows by subject into a [`QueryResultTable`].
///
/// Subjects, predicates and objects are reduced to their lexical form and
/// passed through [`PrefixTable::normalize`], literals included. Returns
/// `None` when there are no rows.
pub fn reshape(rows: &[SolutionRow], prefixes: &PrefixTable) -> Option<QueryResultTable> {
    if rows.is_empty() {
        return None;
    }
    let mut table = QueryResultTable::new();
    for row in rows {
        table
            .entry(normalized(&row.subject, prefixes))
            .or_default()
            .insert(
                normalized(&row.predicate, prefixes),
                normalized(&row.object, prefixes),
            );
    }
    Some(table)
}

fn normalized(term: &Term, prefixes: &PrefixTable) -> String {
    match term {
        Term::NamedNode(node) => prefixes.normalize(node.as_str()),
        Term::Literal(literal) => prefixes.normalize(literal.value()),
        other => other.to_string(),
    }
}
