//! Prefix table and term normalization.
//!
//! The triple store hands back full IRIs (`http://xmlns.com/foaf/0.1/title`)
//! while everything metacheck builds or reports uses prefixed names
//! (`foaf:title`). [`PrefixTable`] converts between the two.
//!
//! Namespaces are always matched longest-first so that a short namespace
//! never claims part of a longer one that happens to share its start.

/// The fixed prefix registry: `(prefix, namespace IRI)`.
pub const PREFIXES: &[(&str, &str)] = &[
    ("ex", "http://example.org/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("gn", "http://www.geonames.org/ontology#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("path", "http://www.ontotext.com/path#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("wgs", "http://www.w3.org/2003/01/geo/wgs84_pos#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

pub const EX: &str = "http://example.org/";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Bidirectional prefix ↔ namespace mapping.
#[derive(Debug, Clone)]
pub struct PrefixTable {
    /// `(prefix, namespace)`, longest namespace first.
    entries: Vec<(String, String)>,
}

impl PrefixTable {
    /// Build a table from `(prefix, namespace)` pairs.
    pub fn new<I, P, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, N)>,
        P: Into<String>,
        N: Into<String>,
    {
        let mut entries: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(p, n)| (p.into(), n.into()))
            .collect();
        entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));
        Self { entries }
    }

    /// The table built from [`PREFIXES`].
    pub fn standard() -> Self {
        Self::new(PREFIXES.iter().copied())
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, n)| n.as_str())
    }

    /// Replace every namespace IRI inside `term` with its `prefix:` form.
    ///
    /// The scan runs left to right and tries namespaces longest-first at
    /// each position, so replaced text is never rescanned. Strings without
    /// namespace IRIs come back unchanged, which makes this idempotent.
    pub fn normalize(&self, term: &str) -> String {
        let mut out = String::with_capacity(term.len());
        let mut rest = term;
        'scan: while !rest.is_empty() {
            for (prefix, ns) in &self.entries {
                if let Some(tail) = rest.strip_prefix(ns.as_str()) {
                    out.push_str(prefix);
                    out.push(':');
                    rest = tail;
                    continue 'scan;
                }
            }
            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                out.push(ch);
            }
            rest = chars.as_str();
        }
        out
    }

    /// Whether `value` begins with one of the registered namespaces.
    pub fn starts_with_namespace(&self, value: &str) -> bool {
        self.entries.iter().any(|(_, ns)| value.starts_with(ns.as_str()))
    }

    /// Expand a prefixed name (`foaf:title`) into a full IRI.
    ///
    /// Returns `None` when the name has no colon or an unknown prefix.
    pub fn expand(&self, name: &str) -> Option<String> {
        let (prefix, local) = name.split_once(':')?;
        self.namespace(prefix).map(|ns| format!("{}{}", ns, local))
    }

    /// [`expand`](Self::expand) when possible, otherwise `name` unchanged.
    pub fn resolve(&self, name: &str) -> String {
        self.expand(name).unwrap_or_else(|| name.to_string())
    }
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self::standard()
    }
}
