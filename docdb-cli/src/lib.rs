//! # docdb-cli
//!
//! Argument parsing, config loading, document input and event logging for the `docdb` binary.

pub mod cli;
pub mod events;

pub use cli::{load_config, read_document, Cli, Commands};
pub use events::{join_event_logger, spawn_event_logger};
pub use docdb_core::DbConfig;
