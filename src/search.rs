//! Candidate discovery via web search.
//!
//! Providers implement [`CandidateSearch`]:
//! - **[`DuckDuckGoSearch`]** queries the DuckDuckGo HTML endpoint and
//!   reads the organic result links.
//! - **[`DisabledSearch`]** always returns no candidates; used when
//!   `search.provider = "disabled"`.
//!
//! Search terms are joined with `", "` into a single query string.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use metacheck_core::{Error, Result};
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::config::SearchConfig;
use crate::traits::CandidateSearch;

/// Instantiate the provider named in the configuration.
pub fn create_search(
    config: &SearchConfig,
    client: reqwest::Client,
) -> anyhow::Result<Arc<dyn CandidateSearch>> {
    match config.provider.as_str() {
        "duckduckgo" => Ok(Arc::new(DuckDuckGoSearch::new(client, &config.endpoint)?)),
        "disabled" => Ok(Arc::new(DisabledSearch)),
        other => anyhow::bail!("Unknown search provider: {}", other),
    }
}

// ============ Disabled Provider ============

pub struct DisabledSearch;

#[async_trait]
impl CandidateSearch for DisabledSearch {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn search(&self, _terms: &[String], _max_results: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

// ============ DuckDuckGo Provider ============

/// Search provider backed by `html.duckduckgo.com`.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: Url,
}

impl DuckDuckGoSearch {
    pub fn new(client: reqwest::Client, endpoint: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
        })
    }
}

#[async_trait]
impl CandidateSearch for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, terms: &[String], max_results: usize) -> Result<Vec<String>> {
        if terms.is_empty() || max_results == 0 {
            return Ok(Vec::new());
        }
        let query = terms.join(", ");
        info!(query = %query, max_results, "Searching DuckDuckGo");

        let endpoint = self.endpoint.as_str();
        let body = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", query.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::extraction(endpoint, e))?
            .text()
            .await
            .map_err(|e| Error::extraction(endpoint, e))?;

        let links = parse_result_links(&body, max_results);
        debug!(count = links.len(), "Search results parsed");
        Ok(links)
    }
}

/// Pull organic result URLs out of a DuckDuckGo HTML results page.
///
/// Redirect links (`/l/?uddg=<target>`) are unwrapped; links that stay on
/// DuckDuckGo (ads, navigation) are dropped. Order is preserved and
/// duplicates removed.
pub fn parse_result_links(html: &str, max_results: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse("a.result__a") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for el in document.select(&sel) {
        if links.len() >= max_results {
            break;
        }
        let Some(target) = el.value().attr("href").and_then(resolve_result_href) else {
            continue;
        };
        if seen.insert(target.clone()) {
            links.push(target);
        }
    }
    links
}

fn resolve_result_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };
    let url = Url::parse(&absolute).ok()?;
    let host = url.host_str()?;

    if host == "duckduckgo.com" || host.ends_with(".duckduckgo.com") {
        if url.path() != "/l/" {
            return None;
        }
        let target = url
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())?;
        let target = Url::parse(&target).ok()?;
        return matches!(target.scheme(), "http" | "https").then(|| target.to_string());
    }

    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"<html><body>
<div class="result results_links">
  <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fx.com%2Fa&amp;rut=abc">X A</a>
</div>
<div class="result result--ad">
  <a class="result__a" href="https://duckduckgo.com/y.js?ad_provider=bing&amp;u3=foo">Ad</a>
</div>
<div class="result">
  <a class="result__a" href="https://y.com/">Y</a>
</div>
<div class="result">
  <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fx.com%2Fa">X A again</a>
</div>
<div class="result">
  <a class="result__a" href="https://z.com/page">Z</a>
</div>
<div class="result">
  <a class="result__snippet" href="https://snippet.com/">not a title link</a>
</div>
</body></html>"#;

    #[test]
    fn test_parse_result_links() {
        let links = parse_result_links(RESULTS, 10);
        assert_eq!(
            links,
            vec!["https://x.com/a", "https://y.com/", "https://z.com/page"]
        );
    }

    #[test]
    fn test_parse_result_links_respects_max() {
        let links = parse_result_links(RESULTS, 2);
        assert_eq!(links, vec!["https://x.com/a", "https://y.com/"]);
        assert!(parse_result_links(RESULTS, 0).is_empty());
    }

    #[test]
    fn test_resolve_result_href() {
        assert_eq!(resolve_result_href("javascript:void(0)"), None);
        assert_eq!(resolve_result_href("/relative"), None);
        assert_eq!(
            resolve_result_href("//duckduckgo.com/l/?uddg=ftp%3A%2F%2Fa.com"),
            None
        );
    }

    #[tokio::test]
    async fn test_empty_terms_skip_network() {
        // Unroutable endpoint: any request would fail.
        let search = DuckDuckGoSearch::new(reqwest::Client::new(), "http://127.0.0.1:1/").unwrap();
        assert!(search.search(&[], 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_search() {
        let terms = vec!["Example".to_string()];
        assert!(DisabledSearch.search(&terms, 3).await.unwrap().is_empty());
    }
}
