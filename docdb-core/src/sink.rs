//! Log sink capability: leveled, sectioned messages with optional error details.
//!
//! Library code takes an `Arc<dyn LogSink>` instead of reaching for a global logger.
//! [`TracingLogSink`] is the production implementation.

use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, error, info, trace, warn};

/// Max number of lines kept from an error's source chain.
pub const ERROR_DETAIL_LINES: usize = 5;

/// Severity, most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Verbose,
    Debug,
    Silly,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Silly => "silly",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "verbose" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            "silly" => Ok(LogLevel::Silly),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Receives log entries. Called synchronously; implementations must not block for long.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str, level: LogLevel, section: Option<&str>, details: Option<&str>);

    /// Logs at error level; `err`'s source chain becomes the details.
    fn error(&self, message: &str, section: &str, err: Option<&(dyn StdError + 'static)>) {
        let details = err.and_then(error_details);
        self.log(message, LogLevel::Error, Some(section), details.as_deref());
    }

    fn warn(&self, message: &str, section: &str) {
        self.log(message, LogLevel::Warn, Some(section), None);
    }

    fn info(&self, message: &str, section: &str) {
        self.log(message, LogLevel::Info, Some(section), None);
    }

    fn verbose(&self, message: &str, section: &str) {
        self.log(message, LogLevel::Verbose, Some(section), None);
    }

    fn debug(&self, message: &str, section: &str) {
        self.log(message, LogLevel::Debug, Some(section), None);
    }
}

/// Renders an error and its sources, one per line, capped at [`ERROR_DETAIL_LINES`].
pub fn error_details(err: &(dyn StdError + 'static)) -> Option<String> {
    let mut lines = Vec::with_capacity(ERROR_DETAIL_LINES);
    let mut current = Some(err);
    while let Some(e) = current {
        for line in e.to_string().lines() {
            if lines.len() == ERROR_DETAIL_LINES {
                return Some(lines.join("\n"));
            }
            if lines.is_empty() {
                lines.push(line.to_string());
            } else {
                lines.push(format!("caused by: {}", line));
            }
        }
        current = e.source();
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Forwards entries to `tracing`. `verbose` and `debug` map to DEBUG, `silly` to TRACE.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl TracingLogSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingLogSink {
    fn log(&self, message: &str, level: LogLevel, section: Option<&str>, details: Option<&str>) {
        let log_level = level.as_str();
        match level {
            LogLevel::Error => error!(log_level, section, error_details = details, "{}", message),
            LogLevel::Warn => warn!(log_level, section, error_details = details, "{}", message),
            LogLevel::Info => info!(log_level, section, error_details = details, "{}", message),
            LogLevel::Verbose | LogLevel::Debug => {
                debug!(log_level, section, error_details = details, "{}", message)
            }
            LogLevel::Silly => trace!(log_level, section, error_details = details, "{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("{msg}")]
    struct Chained {
        msg: String,
        #[source]
        source: Option<Box<Chained>>,
    }

    fn chain(depth: usize) -> Chained {
        let mut err = Chained {
            msg: "level 0".to_string(),
            source: None,
        };
        for i in 1..depth {
            err = Chained {
                msg: format!("level {}", i),
                source: Some(Box::new(err)),
            };
        }
        err
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<(String, LogLevel, Option<String>, Option<String>)>>);

    impl LogSink for Recording {
        fn log(&self, message: &str, level: LogLevel, section: Option<&str>, details: Option<&str>) {
            self.0.lock().unwrap().push((
                message.to_string(),
                level,
                section.map(str::to_string),
                details.map(str::to_string),
            ));
        }
    }

    #[test]
    fn test_level_round_trips_through_str() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Verbose,
            LogLevel::Debug,
            LogLevel::Silly,
        ] {
            assert_eq!(level.as_str().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!(" INFO ".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_levels_order_by_severity() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Info < LogLevel::Verbose);
        assert!(LogLevel::Debug < LogLevel::Silly);
    }

    #[test]
    fn test_error_details_caps_at_five_lines() {
        let err = chain(8);
        let details = error_details(&err).unwrap();
        let lines: Vec<&str> = details.lines().collect();

        assert_eq!(lines.len(), ERROR_DETAIL_LINES);
        assert_eq!(lines[0], "level 7");
        assert_eq!(lines[1], "caused by: level 6");
    }

    #[test]
    fn test_error_details_short_chain() {
        let err = chain(2);
        assert_eq!(
            error_details(&err).as_deref(),
            Some("level 1\ncaused by: level 0")
        );
    }

    #[test]
    fn test_error_shortcut_passes_section_and_details() {
        let sink = Recording::default();
        let err = chain(1);

        sink.error("insert failed", "Repo#save", Some(&err));
        sink.info("done", "Repo#save");

        let entries = sink.0.lock().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].1, LogLevel::Error);
        assert_eq!(entries[0].2.as_deref(), Some("Repo#save"));
        assert_eq!(entries[0].3.as_deref(), Some("level 0"));
        assert_eq!(entries[1].1, LogLevel::Info);
        assert!(entries[1].3.is_none());
    }
}
