//! Tracing initialisation and the sectioned line format.
//!
//! Lines look like `2024-05-01 10:00:00.123+0000 [DocumentRepository#save] info: message`,
//! followed by an indented `[Error details]` block when the event carries `error_details`.

use std::fmt::{self, Write as _};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, writer::BoxMakeWriter, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f%z";

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `default_filter`. When `log_file` is set,
/// every line is also appended to that file (parent directories are created).
pub fn init_tracing(default_filter: &str, log_file: Option<&str>) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let writer = match log_file {
        Some(path) => {
            use tracing_subscriber::fmt::writer::MakeWriterExt;
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(io::stdout.and(Arc::new(file)))
        }
        None => BoxMakeWriter::new(io::stdout),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .event_format(SectionFormat);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

/// Event formatter for the `[section] level: message` layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionFormat;

impl<S, N> FormatEvent<S, N> for SectionFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = SectionFields::default();
        event.record(&mut fields);

        write!(writer, "{} ", Local::now().format(TIMESTAMP_FORMAT))?;
        if let Some(section) = &fields.section {
            write!(writer, "[{}] ", section)?;
        }
        let level = fields
            .log_level
            .unwrap_or_else(|| level_name(event.metadata().level()).to_string());
        write!(writer, "{}: {}", level, fields.message)?;
        for (name, value) in &fields.extra {
            write!(writer, " {}={}", name, value)?;
        }
        if let Some(details) = &fields.error_details {
            write!(
                writer,
                "\n [Error details]\n   {}",
                details.replace('\n', "\n   ")
            )?;
        }
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "error",
        Level::WARN => "warn",
        Level::INFO => "info",
        Level::DEBUG => "debug",
        Level::TRACE => "silly",
    }
}

#[derive(Default)]
struct SectionFields {
    message: String,
    section: Option<String>,
    log_level: Option<String>,
    error_details: Option<String>,
    extra: Vec<(&'static str, String)>,
}

impl SectionFields {
    fn store(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            "section" => self.section = Some(value),
            "log_level" => self.log_level = Some(value),
            "error_details" => self.error_details = Some(value),
            name => self.extra.push((name, value)),
        }
    }
}

impl Visit for SectionFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let mut rendered = String::new();
        let _ = write!(rendered, "{:?}", value);
        self.store(field, rendered);
    }
}
