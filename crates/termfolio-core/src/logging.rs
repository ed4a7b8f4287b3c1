#![forbid(unsafe_code)]

//! Tracing layer that formats events as single lines for a [`LogSink`].
//!
//! The browser adapter plugs in a sink that forwards each line to the
//! matching `console.*` method; tests plug in a capturing sink.
//!
//! ```no_run
//! use termfolio_core::logging::{ConsoleLayer, LogSink};
//! use tracing::Level;
//! use tracing_subscriber::prelude::*;
//!
//! struct Stderr;
//! impl LogSink for Stderr {
//!     fn write_line(&self, _level: Level, line: &str) {
//!         eprintln!("{line}");
//!     }
//! }
//!
//! let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(Stderr));
//! tracing::subscriber::set_global_default(subscriber).ok();
//! ```

use std::fmt::{self, Write as FmtWrite};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

// ============================================================================
// Configuration
// ============================================================================

/// Which parts of an event make it into the formatted line.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Prefix a UTC `HH:MM:SS` timestamp. Default: false.
    pub show_time: bool,
    /// Show the fixed-width level. Default: true.
    pub show_level: bool,
    /// Show the tracing target (module path). Default: true.
    pub show_target: bool,
    /// Show structured fields beyond `message`. Default: true.
    pub show_fields: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            show_time: false,
            show_level: true,
            show_target: true,
            show_fields: true,
        }
    }
}

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync + 'static {
    fn write_line(&self, level: Level, line: &str);
}

/// Format level as a fixed-width string.
fn level_str(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN ",
        Level::INFO => "INFO ",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

// ============================================================================
// Event Visitor
// ============================================================================

/// Extracts message and structured fields from a tracing event.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        self.push(field, strip_debug_quotes(&rendered));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}

/// Remove surrounding quotes from Debug-formatted strings.
fn strip_debug_quotes(s: &str) -> String {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// UTC `HH:MM:SS`. `web_time` keeps this working on wasm32.
fn timestamp_now() -> String {
    let since_epoch = web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = since_epoch.as_secs();
    let h = (secs / 3600) % 24;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

// ============================================================================
// ConsoleLayer
// ============================================================================

/// A `tracing_subscriber::Layer` writing one formatted line per event.
pub struct ConsoleLayer<S> {
    sink: S,
    config: LogConfig,
}

impl<S: LogSink> ConsoleLayer<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, LogConfig::default())
    }

    pub fn with_config(sink: S, config: LogConfig) -> Self {
        Self { sink, config }
    }

    fn format_event(&self, event: &Event<'_>) -> String {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut line = String::new();
        if self.config.show_time {
            line.push_str(&timestamp_now());
            line.push(' ');
        }
        if self.config.show_level {
            line.push_str(level_str(*metadata.level()));
            line.push(' ');
        }
        if self.config.show_target {
            let _ = write!(line, "{}: ", metadata.target());
        }
        line.push_str(visitor.message.as_deref().unwrap_or_default());
        if self.config.show_fields {
            for (k, v) in &visitor.fields {
                let _ = write!(line, " {k}={v}");
            }
        }
        line
    }
}

impl<S, Sub> Layer<Sub> for ConsoleLayer<S>
where
    S: LogSink,
    Sub: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, Sub>) {
        let line = self.format_event(event);
        self.sink.write_line(*event.metadata().level(), &line);
    }
}

// ============================================================================
// Tests
// ============================================================================
