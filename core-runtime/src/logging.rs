//! Subscriber setup for the player core.
//!
//! [`init_logging`] installs a `tracing-subscriber` registry with a stdout
//! layer (pretty, JSON or compact), an `EnvFilter` and, optionally, a
//! [`LoggerSinkLayer`] that copies events into the host logger (Logcat on
//! Android, OSLog on iOS). [`redact_url`] and [`strip_path`] keep signed
//! media URLs and device paths out of log output.
//!
//! ```ignore
//! use bridge_traits::{ConsoleLogger, LogLevel};
//! use core_runtime::logging::{init_logging, LoggingConfig};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(ConsoleLogger::default());
//! init_logging(LoggingConfig::for_host(sink, LogLevel::Info))?;
//! tracing::info!(target: "core_service", "Player service started");
//! ```
//!
//! ## Host sink
//!
//! Every event that survives filtering is mirrored into the configured sink
//! as a [`LogEntry`] carrying the message, the event fields and the name of
//! the innermost span. Inside a runtime the sink is called on a spawned
//! task. Outside one it is driven to completion inline.

use crate::error::{Error, Result};

use bridge_traits::{LogEntry, LogLevel, LoggerSink};
use core_async::runtime;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    filter::EnvFilter,
    fmt::format::FmtSpan,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer, Registry,
};
use url::Url;

/// Crates of this workspace that follow the configured level. Everything
/// else is held at `warn`.
const WORKSPACE_CRATES: &[&str] = &[
    "core_runtime",
    "core_playback",
    "core_service",
    "bridge_traits",
    "bridge_android",
    "bridge_ios",
];

/// How the stdout layer renders events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored. Debug builds default to it.
    Pretty,
    /// One flattened JSON object per event. Release builds default to it.
    Json,
    /// Single line per event.
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(Error::Config(format!("Unknown log format '{}'", other))),
        }
    }
}

/// Settings for [`init_logging`].
#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level applied to the workspace crates.
    pub level: LogLevel,
    /// Raw `EnvFilter` directives, e.g. `"core_playback=trace"`. Overrides
    /// `level` when set.
    pub filter: Option<String>,
    /// Host logger receiving a copy of every event.
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    /// Emit span open/close lines around instrumented adapter commands.
    pub span_events: bool,
    pub show_target: bool,
    pub show_threads: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            logger_sink: None,
            span_events: false,
            show_target: true,
            show_threads: false,
        }
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("filter", &self.filter)
            .field("has_logger_sink", &self.logger_sink.is_some())
            .field("span_events", &self.span_events)
            .finish_non_exhaustive()
    }
}

impl LoggingConfig {
    /// Release-style settings for a mobile host: compact lines on stdout and
    /// every event at `level` or above mirrored into `sink`.
    pub fn for_host(sink: Arc<dyn LoggerSink>, level: LogLevel) -> Self {
        Self {
            format: LogFormat::Compact,
            level,
            logger_sink: Some(sink),
            show_target: false,
            ..Self::default()
        }
    }

    pub fn with_format(self, format: LogFormat) -> Self {
        Self { format, ..self }
    }

    pub fn with_level(self, level: LogLevel) -> Self {
        Self { level, ..self }
    }

    pub fn with_filter(self, filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            ..self
        }
    }

    pub fn with_logger_sink(self, sink: Arc<dyn LoggerSink>) -> Self {
        Self {
            logger_sink: Some(sink),
            ..self
        }
    }

    pub fn with_span_events(self, span_events: bool) -> Self {
        Self { span_events, ..self }
    }

    pub fn with_target(self, show_target: bool) -> Self {
        Self { show_target, ..self }
    }

    pub fn with_threads(self, show_threads: bool) -> Self {
        Self { show_threads, ..self }
    }
}

/// Installs the global subscriber: a stdout layer in the configured format,
/// the optional host sink mirror and the level filter.
///
/// A second call fails with [`Error::Logging`] because the global
/// subscriber is already set.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;

    tracing_subscriber::registry()
        .with(stdout_layer(&config))
        .with(LoggerSinkLayer::new(config.logger_sink))
        .with(filter)
        .try_init()
        .map_err(|e| Error::Logging(format!("Failed to install subscriber: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = config
        .filter
        .clone()
        .unwrap_or_else(|| default_filter(config.level));

    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", directives, e)))
}

/// `warn` for dependencies, `level` for the workspace crates.
fn default_filter(level: LogLevel) -> String {
    let level = level.as_filter_directive();
    let mut directives = vec!["warn".to_string()];
    directives.extend(WORKSPACE_CRATES.iter().map(|name| format!("{}={}", name, level)));
    directives.join(",")
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn stdout_layer(config: &LoggingConfig) -> BoxedLayer {
    let spans = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let layer = tracing_subscriber::fmt::layer()
        .with_target(config.show_target)
        .with_thread_ids(config.show_threads)
        .with_thread_names(config.show_threads)
        .with_writer(io::stdout);

    match config.format {
        LogFormat::Pretty => layer.pretty().with_span_events(spans).boxed(),
        LogFormat::Compact => layer.compact().with_span_events(spans).boxed(),
        LogFormat::Json => layer
            .json()
            .flatten_event(true)
            .with_current_span(config.span_events)
            .with_span_list(config.span_events)
            .boxed(),
    }
}

/// Mirrors events into a host [`LoggerSink`] (Logcat, OSLog).
///
/// Each event becomes a [`LogEntry`] with the message, the remaining
/// fields and the name of the innermost span. Events below the sink's
/// `min_level` are skipped.
pub struct LoggerSinkLayer {
    sink: Option<Arc<dyn LoggerSink>>,
}

impl LoggerSinkLayer {
    pub fn new(sink: Option<Arc<dyn LoggerSink>>) -> Self {
        Self { sink }
    }

    fn deliver(sink: Arc<dyn LoggerSink>, entry: LogEntry) {
        match runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = sink.log(entry).await {
                        eprintln!("LoggerSink error: {}", err);
                    }
                });
            }
            // No runtime on this thread (native callback threads): drive
            // the sink inline.
            Err(_) => {
                if let Err(err) = runtime::block_on(sink.log(entry)) {
                    eprintln!("LoggerSink error: {}", err);
                }
            }
        }
    }
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(sink) = &self.sink else {
            return;
        };

        let metadata = event.metadata();
        let level = log_level(metadata.level());
        if level < sink.min_level() {
            return;
        }

        let mut fields = EntryFields::default();
        event.record(&mut fields);

        let message = fields.message.unwrap_or_else(|| metadata.name().to_string());
        let mut entry = LogEntry::new(level, metadata.target(), message);
        entry.fields = fields.rest;
        if let Some(span) = ctx.event_span(event) {
            entry = entry.with_span(span.name());
        }

        Self::deliver(Arc::clone(sink), entry);
    }
}

/// Splits event fields into the message and everything else.
#[derive(Default)]
struct EntryFields {
    message: Option<String>,
    rest: BTreeMap<String, String>,
}

impl EntryFields {
    fn insert(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            name => {
                self.rest.insert(name.to_string(), value);
            }
        }
    }
}

// Numbers, booleans and errors go through `record_debug`, whose output
// for them matches `Display`.
impl Visit for EntryFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{:?}", value));
    }
}

fn log_level(level: &Level) -> LogLevel {
    match *level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

/// Loggable form of a media URL.
///
/// Query strings and fragments are dropped, since streaming URLs often carry
/// signed tokens there. Local media (`file://` URLs and bare device paths)
/// is reduced to its file name with [`strip_path`].
///
/// ```
/// use core_runtime::logging::redact_url;
///
/// assert_eq!(
///     redact_url("https://cdn.example.com/a.mp3?token=abc#t=10"),
///     "https://cdn.example.com/a.mp3"
/// );
/// assert_eq!(redact_url("file:///var/mobile/Media/a.m4a"), "a.m4a");
/// assert_eq!(redact_url("/storage/emulated/0/Music/b.ogg"), "b.ogg");
/// ```
pub fn redact_url(raw: &str) -> Cow<'_, str> {
    match Url::parse(raw) {
        Ok(url) if url.scheme() == "file" => Cow::Owned(strip_path(url.path()).to_string()),
        // Single-letter schemes are Windows drive letters, not URLs.
        Ok(mut url) if url.scheme().len() > 1 => {
            url.set_query(None);
            url.set_fragment(None);
            Cow::Owned(url.into())
        }
        _ => {
            let end = raw.find(['?', '#']).unwrap_or(raw.len());
            Cow::Borrowed(strip_path(&raw[..end]))
        }
    }
}

/// File name of a local media path, for either separator style.
///
/// ```
/// use core_runtime::logging::strip_path;
///
/// assert_eq!(strip_path("/var/mobile/Media/Music/song.mp3"), "song.mp3");
/// ```
pub fn strip_path(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(separator) => &path[separator + 1..],
        None => path,
    }
}
