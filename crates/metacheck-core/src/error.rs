//! Error taxonomy for the validation pipeline.
//!
//! Every variant ends up as the message of a generic `{"error": ...}`
//! response at the HTTP boundary; the variants exist so callers and logs can
//! tell which stage failed.

use thiserror::Error;

/// Errors raised anywhere in the validation pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Fetching or parsing a page failed.
    #[error("failed to extract metadata from {url}: {message}")]
    Extraction { url: String, message: String },

    /// The triple store rejected (or never received) a write.
    #[error("triple store write failed: {0}")]
    StoreWrite(String),

    /// A SPARQL query failed or returned malformed tabular data.
    #[error("triple store query failed: {0}")]
    StoreQuery(String),

    /// A required metadata field was absent when building RDF.
    #[error("missing required metadata field: {0}")]
    MissingField(String),

    /// The supplied URL or identifier cannot be used.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl Error {
    pub fn extraction(url: impl Into<String>, message: impl ToString) -> Self {
        Error::Extraction {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
