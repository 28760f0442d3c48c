//! Page metadata extraction.
//!
//! [`HtmlMetadataExtractor`] downloads a page with `reqwest` and reads its
//! `<title>` and `<meta>` tags with `scraper`:
//!
//! | Source | Field |
//! |--------|-------|
//! | `<title>` text (trimmed) | `title` |
//! | the fetched URL | `url` |
//! | `<meta name="X" content="Y">` | `x` = `Y` |
//! | `<meta property="og:X" content="Y">` (no `name`) | `og_x` = `Y` |
//!
//! `property` is only read when it is namespaced (`og:`, `article:`, ...),
//! so a bare `property="title"` cannot replace the `<title>` text. Meta names are lower-cased with `:` replaced by `_`. A meta tag without
//! `content` records an empty string.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use metacheck_core::models::MetadataRecord;
use metacheck_core::{Error, Result};
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::traits::MetadataExtractor;

/// Build the HTTP client used for page fetches and web search.
pub fn build_client(config: &FetchConfig) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to build HTTP client")
}

/// [`MetadataExtractor`] over plain HTTP GET + HTML parsing.
pub struct HtmlMetadataExtractor {
    client: reqwest::Client,
}

impl HtmlMetadataExtractor {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &FetchConfig) -> anyhow::Result<Self> {
        Ok(Self::new(build_client(config)?))
    }
}

#[async_trait]
impl MetadataExtractor for HtmlMetadataExtractor {
    async fn extract(&self, url: &str) -> Result<MetadataRecord> {
        info!(url, "Extracting metadata from website");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::extraction(url, e))?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::extraction(url, e))?;

        let record = parse_metadata(url, &body);
        debug!(
            url,
            title = record.title.as_deref().unwrap_or(""),
            extra_fields = record.extra.len(),
            "Metadata extracted"
        );
        Ok(record)
    }
}

/// Read title and meta tags out of an HTML document.
pub fn parse_metadata(url: &str, html: &str) -> MetadataRecord {
    let document = Html::parse_document(html);
    let mut record = MetadataRecord::new(url);

    if let Ok(sel) = Selector::parse("title") {
        if let Some(el) = document.select(&sel).next() {
            record.title = Some(el.text().collect::<String>().trim().to_string());
        }
    }

    if let Ok(sel) = Selector::parse("meta") {
        for el in document.select(&sel) {
            let attrs = el.value();
            let Some(name) = attrs
                .attr("name")
                .or_else(|| attrs.attr("property").filter(|p| p.contains(':')))
            else {
                continue;
            };
            if name.trim().is_empty() {
                continue;
            }
            record.insert(name, attrs.attr("content").unwrap_or(""));
        }
    }

    // The URL the page was fetched from is authoritative.
    record.url = url.to_string();
    record
}
