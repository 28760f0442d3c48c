//! TOML configuration.
//!
//! Every section is optional; missing keys fall back to the defaults below,
//! which match a local GraphDB instance on port 7200.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:5005"
//!
//! [store]
//! host = "http://localhost:7200/"
//! repository = "TrabalhoFinal"
//! result_format = "tsv"
//! query_limit = 100
//!
//! [search]
//! provider = "duckduckgo"
//! max_results = 3
//!
//! [fetch]
//! timeout_secs = 30
//! ```

use anyhow::{Context, Result};
use metacheck_core::results::ResultFormat;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5005".to_string()
}

/// Connection settings for the GraphDB / RDF4J repository.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Base URL of the server; `repositories/<id>` is appended to it.
    #[serde(default = "default_store_host")]
    pub host: String,
    #[serde(default = "default_repository")]
    pub repository: String,
    #[serde(default)]
    pub result_format: ResultFormat,
    /// Row cap for every SELECT query.
    #[serde(default = "default_query_limit")]
    pub query_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: default_store_host(),
            repository: default_repository(),
            result_format: ResultFormat::default(),
            query_limit: default_query_limit(),
        }
    }
}

fn default_store_host() -> String {
    "http://localhost:7200/".to_string()
}
fn default_repository() -> String {
    "TrabalhoFinal".to_string()
}
fn default_query_limit() -> usize {
    metacheck_core::sparql::DEFAULT_LIMIT
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// `duckduckgo` or `disabled`.
    #[serde(default = "default_search_provider")]
    pub provider: String,
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: default_search_provider(),
            endpoint: default_search_endpoint(),
            max_results: default_max_results(),
        }
    }
}

fn default_search_provider() -> String {
    "duckduckgo".to_string()
}
fn default_search_endpoint() -> String {
    "https://html.duckduckgo.com/html/".to_string()
}
fn default_max_results() -> usize {
    3
}

/// HTTP client settings shared by page fetches and search requests.
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout. Unset means the HTTP client default (none).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

fn default_user_agent() -> String {
    format!("metacheck/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// All defaults; used when no configuration file is present.
    pub fn minimal() -> Self {
        Self::default()
    }

    pub fn search_enabled(&self) -> bool {
        self.search.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Check cross-field constraints that serde cannot express.
pub fn validate(config: &Config) -> Result<()> {
    url::Url::parse(&config.store.host)
        .with_context(|| format!("store.host is not a valid URL: {}", config.store.host))?;

    if config.store.repository.trim().is_empty() {
        anyhow::bail!("store.repository must not be empty");
    }

    if config.store.query_limit == 0 {
        anyhow::bail!("store.query_limit must be >= 1");
    }

    match config.search.provider.as_str() {
        "duckduckgo" | "disabled" => {}
        other => anyhow::bail!(
            "Unknown search provider: '{}'. Must be duckduckgo or disabled.",
            other
        ),
    }

    if config.search_enabled() {
        if !(1..=25).contains(&config.search.max_results) {
            anyhow::bail!("search.max_results must be in [1, 25]");
        }
        url::Url::parse(&config.search.endpoint).with_context(|| {
            format!("search.endpoint is not a valid URL: {}", config.search.endpoint)
        })?;
    }

    if config.fetch.timeout_secs == Some(0) {
        anyhow::bail!("fetch.timeout_secs must be > 0 when set");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:5005");
        assert_eq!(cfg.store.repository, "TrabalhoFinal");
        assert_eq!(cfg.store.result_format, ResultFormat::Tsv);
        assert_eq!(cfg.store.query_limit, 100);
        assert_eq!(cfg.search.max_results, 3);
        assert!(cfg.fetch.timeout_secs.is_none());
    }

    #[test]
    fn test_overrides() {
        let file = write_config(
            r#"
[store]
host = "http://graphdb:7200/"
repository = "plagiarism"
result_format = "csv"

[search]
provider = "disabled"
max_results = 0
"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.store.host, "http://graphdb:7200/");
        assert_eq!(cfg.store.result_format, ResultFormat::Csv);
        assert!(!cfg.search_enabled());
    }

    #[test]
    fn test_rejects_bad_values() {
        for content in [
            "[store]\nhost = \"not a url\"",
            "[store]\nrepository = \"  \"",
            "[store]\nquery_limit = 0",
            "[store]\nresult_format = \"turtle\"",
            "[search]\nprovider = \"google\"",
            "[search]\nmax_results = 0",
            "[fetch]\ntimeout_secs = 0",
        ] {
            let file = write_config(content);
            assert!(load_config(file.path()).is_err(), "accepted: {content}");
        }
    }

    #[test]
    fn test_example_config_parses() {
        let cfg: Config =
            toml::from_str(include_str!("../config/metacheck.example.toml")).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.store.host, "http://localhost:7200/");
        assert_eq!(cfg.search.provider, "duckduckgo");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/metacheck.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
