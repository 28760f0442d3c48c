//! # metacheck CLI
//!
//! The `metacheck` binary runs the validation server and exposes each
//! pipeline stage as a one-shot command for debugging.
//!
//! ## Usage
//!
//! ```bash
//! metacheck --config ./config/metacheck.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `metacheck serve` | Start the HTTP server |
//! | `metacheck validate <url>` | Run one validation and print the report |
//! | `metacheck extract <url>` | Print the metadata extracted from a page |
//! | `metacheck query <subject>` | Print the stored triples of a subject |
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use metacheck::config::{self, Config};
use metacheck::server;
use metacheck::traits::TripleStore;
use metacheck::validate::Validator;
use metacheck_core::models::NamedNode;
use metacheck_core::rdf::subject_iri;
use metacheck_core::results::reshape;
use metacheck_core::sparql::subject_query;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// metacheck: detect websites whose metadata duplicates a target page.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/metacheck.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "metacheck",
    about = "Detect websites whose metadata duplicates a target page",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/metacheck.toml`. Built-in defaults are used
    /// when the file does not exist.
    #[arg(long, global = true, default_value = "./config/metacheck.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// Validate a URL and print the JSON report.
    ///
    /// Note that this rewrites the configured repository, exactly like a
    /// `POST /validate` request.
    Validate {
        /// Target page, e.g. `https://example.com/about`.
        url: String,
    },

    /// Fetch a page and print its extracted metadata.
    Extract {
        url: String,
    },

    /// Print the stored triples of one subject.
    ///
    /// Accepts a full IRI, a prefixed name (`ex:target_example.com`), or a
    /// bare id, which is placed in the `ex:` namespace.
    Query {
        subject: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load `path`, falling back to defaults when it does not exist.
fn load_or_default(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        config::load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        Ok(Config::minimal())
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = load_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Validate { url } => {
            let validator = Validator::from_config(&cfg)?;
            let report = validator.validate(&url).await?;
            print_json(&report)?;
        }
        Commands::Extract { url } => {
            let validator = Validator::from_config(&cfg)?;
            let metadata = validator.extract(&url).await?;
            print_json(&metadata)?;
        }
        Commands::Query { subject } => {
            let validator = Validator::from_config(&cfg)?;
            let prefixes = validator.prefixes();
            let iri = if subject.contains("://") {
                NamedNode::new(&subject).with_context(|| format!("Invalid subject IRI: {}", subject))?
            } else if let Some(iri) = prefixes.expand(&subject) {
                NamedNode::new(&iri).with_context(|| format!("Invalid subject IRI: {}", iri))?
            } else {
                subject_iri(&subject)?
            };
            let query = subject_query(&iri, validator.query_limit());
            let rows = validator.store().select(&query).await?;
            match reshape(&rows, prefixes) {
                Some(table) => print_json(&table)?,
                None => println!("No triples stored for {}", iri),
            }
        }
    }

    Ok(())
}
