//! # docdb-core
//!
//! Ambient pieces shared by the docdb crates: [`DbConfig`] loading, the [`LogSink`] capability
//! with its tracing-backed implementation, and tracing initialisation.

pub mod config;
pub mod error;
pub mod logger;
pub mod sink;

pub use config::{DbConfig, DEFAULT_DB_NAME};
pub use error::{ConfigError, Result};
pub use logger::{init_tracing, SectionFormat};
pub use sink::{error_details, LogLevel, LogSink, TracingLogSink, ERROR_DETAIL_LINES};
