//! GraphDB / RDF4J triple store client.
//!
//! Implements [`TripleStore`] over the RDF4J REST protocol, which GraphDB
//! speaks natively:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | write | `PUT {host}repositories/{id}/statements` with a `text/turtle` body |
//! | query | `GET {host}repositories/{id}?query=<urlencoded>` |
//!
//! A `PUT` replaces the repository contents with the submitted block, so
//! each validation run compares the target against its own candidates.
//! Query results are requested as TSV by default (see
//! [`metacheck_core::results`] for why) or CSV when configured.

use async_trait::async_trait;
use metacheck_core::models::SolutionRow;
use metacheck_core::prefix::PrefixTable;
use metacheck_core::results::{parse_solutions, ResultFormat};
use metacheck_core::store::TripleStore;
use metacheck_core::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, info};
use url::Url;

use crate::config::StoreConfig;

pub struct GraphDbStore {
    client: reqwest::Client,
    repository_url: Url,
    statements_url: Url,
    format: ResultFormat,
    prefixes: PrefixTable,
}

impl GraphDbStore {
    pub fn new(client: reqwest::Client, config: &StoreConfig) -> anyhow::Result<Self> {
        let mut base = Url::parse(&config.host)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let repository_url = base.join(&format!("repositories/{}", config.repository))?;
        let statements_url = base.join(&format!("repositories/{}/statements", config.repository))?;

        Ok(Self {
            client,
            repository_url,
            statements_url,
            format: config.result_format,
            prefixes: PrefixTable::standard(),
        })
    }

    pub fn repository_url(&self) -> &Url {
        &self.repository_url
    }
}

/// Status plus whatever the server said, for error messages.
async fn describe_failure(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body)
    }
}

#[async_trait]
impl TripleStore for GraphDbStore {
    async fn put_statements(&self, turtle: &str) -> Result<()> {
        info!(url = %self.statements_url, bytes = turtle.len(), "Saving RDF into GraphDB");
        debug!(rdf = turtle, "RDF block");

        let response = self
            .client
            .put(self.statements_url.clone())
            .header(CONTENT_TYPE, "text/turtle")
            .body(turtle.to_string())
            .send()
            .await
            .map_err(|e| Error::StoreWrite(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::StoreWrite(describe_failure(response).await));
        }
        info!("RDF saved successfully");
        Ok(())
    }

    async fn select(&self, query: &str) -> Result<Vec<SolutionRow>> {
        debug!(query, "Querying GraphDB");

        let response = self
            .client
            .get(self.repository_url.clone())
            .query(&[("query", query)])
            .header(ACCEPT, self.format.media_type())
            .send()
            .await
            .map_err(|e| Error::StoreQuery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::StoreQuery(describe_failure(response).await));
        }
        let body = response
            .text()
            .await
            .map_err(|e| Error::StoreQuery(e.to_string()))?;

        let rows = parse_solutions(&body, self.format, &self.prefixes)?;
        debug!(rows = rows.len(), "Query executed successfully");
        Ok(rows)
    }
}
