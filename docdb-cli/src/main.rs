//! docdb CLI: save, fetch and list documents. Config from env (.env supported) and CLI args.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use couch_client::CouchConnector;
use docdb_cli::{
    join_event_logger, load_config, read_document, spawn_event_logger, Cli, Commands,
};
use docdb_core::init_tracing;
use docdb_storage::DocumentRepository;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.db)?;
    init_tracing("info", config.log_file.as_deref())?;

    let connector = CouchConnector::new(&config)?;
    let repo = DocumentRepository::new(Arc::new(connector), config.db_name.clone())?;

    let listener = spawn_event_logger(repo.subscribe());

    let output: Value = match cli.command {
        Commands::Save { json, file } => {
            let doc = read_document(json.as_deref(), file.as_ref())?;
            serde_json::to_value(repo.save(&doc).await?)?
        }
        Commands::Get { id } => repo.get(&id).await?.into_value(),
        Commands::List {
            limit,
            skip,
            no_docs,
        } => {
            let options = Commands::list_options(limit, skip, no_docs);
            serde_json::to_value(repo.list_page(&options).await?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    drop(repo);
    join_event_logger(listener).await;
    Ok(())
}
