//! CLI parser and config loading.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docdb_core::DbConfig;
use docdb_storage::{Document, ListOptions, DEFAULT_PAGE_SIZE};

#[derive(Parser, Debug)]
#[command(name = "docdb")]
#[command(about = "Save, fetch and list documents in a CouchDB/Cloudant database", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database name; overrides DB_NAME.
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert a document given inline or from a file.
    Save {
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        json: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Fetch a document by id.
    Get { id: String },
    /// List one page of documents.
    List {
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
        #[arg(short, long, default_value_t = 0)]
        skip: u32,
        /// Only ids and revisions, without bodies.
        #[arg(long)]
        no_docs: bool,
    },
}

impl Commands {
    /// Builds list options from the `list` arguments.
    pub fn list_options(limit: u32, skip: u32, no_docs: bool) -> ListOptions {
        let options = ListOptions::default().with_limit(limit).with_skip(skip);
        if no_docs {
            options.without_docs()
        } else {
            options
        }
    }
}

/// Load DbConfig from environment. If `db` is provided it overrides DB_NAME.
pub fn load_config(db: Option<String>) -> Result<DbConfig> {
    let config = DbConfig::from_env()
        .context("Load database config from .env (DB_URL, DB_USER, DB_PASS)")?;
    Ok(match db {
        Some(name) => config.with_db_name(name),
        None => config,
    })
}

/// Reads the document for `save` from `--json` or `--file`.
pub fn read_document(json: Option<&str>, file: Option<&PathBuf>) -> Result<Document> {
    let raw = match (json, file) {
        (Some(json), _) => json.to_string(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either --json or --file is required"),
    };
    let value: serde_json::Value = serde_json::from_str(&raw).context("Document is not valid JSON")?;
    Ok(Document::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from(["docdb", "--db", "party-post", "get", "abc"]).unwrap();

        assert_eq!(cli.db.as_deref(), Some("party-post"));
        assert!(matches!(cli.command, Commands::Get { ref id } if id == "abc"));
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["docdb", "list"]).unwrap();

        match cli.command {
            Commands::List { limit, skip, no_docs } => {
                assert_eq!(limit, DEFAULT_PAGE_SIZE);
                assert_eq!(skip, 0);
                assert!(!no_docs);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_save_requires_a_source() {
        assert!(Cli::try_parse_from(["docdb", "save"]).is_err());
        assert!(Cli::try_parse_from(["docdb", "save", "--json", "{}", "--file", "d.json"]).is_err());
    }

    #[test]
    fn test_read_document_inline() {
        let doc = read_document(Some(r#"{"_id":"x","title":"T"}"#), None).unwrap();
        assert_eq!(doc.id(), Some("x"));
    }

    #[test]
    fn test_read_document_rejects_arrays() {
        assert!(read_document(Some("[1,2]"), None).is_err());
        assert!(read_document(Some("{not json"), None).is_err());
    }

    #[test]
    fn test_list_options_without_docs() {
        let options = Commands::list_options(10, 20, true);
        assert_eq!(options.limit, 10);
        assert_eq!(options.skip, 20);
        assert!(!options.include_docs);
    }
}
