//! Structured JSON logger with action tracking.
//!
//! A [`Logger`] owns the process identity (`instanceId`, `jobId`), the
//! accumulated metadata and the field parser registry, and writes one JSON
//! line per call:
//!
//! ```text
//! {"timestamp":"..","level":"info","message":"..",
//!  "metadata":{"traceID":"..","trace":{"instanceId":"..","jobId":"..","actionId":"..","logId":".."},..}}
//! ```

pub mod action;
pub mod messages;
pub mod record;
pub mod sink;
pub mod trace;

pub use action::{Action, ActionRecord, ActionResult, Actions};
pub use record::{LogRecord, Trace};
pub use sink::{MemorySink, Sink, StdSink};
pub use trace::{Clock, FixedClock, SystemClock, random_id};

use crate::domain::{Fields, LogLevel};
use crate::parser::{FieldParser, ParserRegistry};
use action::ACTION_ID;
use trace::format_timestamp;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggerOptions {
    /// Suppress every emission.
    pub silent: bool,
}

/// Identity metadata supplied at construction.
///
/// `app`, `env` and `version` are stored as given; `extra` fields go through
/// the parser registry like any other metadata.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub app: String,
    pub env: String,
    pub version: String,
    pub extra: Fields,
}

impl Metadata {
    pub fn new(app: impl Into<String>, env: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            env: env.into(),
            version: version.into(),
            extra: Fields::new(),
        }
    }

    pub fn with_extra(mut self, extra: Fields) -> Self {
        self.extra = extra;
        self
    }
}

#[derive(Clone)]
pub struct Logger {
    instance_id: String,
    job_id: String,
    options: LoggerOptions,
    parsers: ParserRegistry,
    meta: Map<String, JsonValue>,
    sink: Arc<dyn Sink>,
    clock: Arc<dyn Clock>,
}

impl Logger {
    pub fn new(instance_id: impl Into<String>, options: LoggerOptions, metadata: Metadata) -> Self {
        Self::with_registry(instance_id, options, metadata, ParserRegistry::new())
    }

    /// Like [`Logger::new`], parsing the initial extra fields with `parsers`.
    pub fn with_registry(
        instance_id: impl Into<String>,
        options: LoggerOptions,
        metadata: Metadata,
        parsers: ParserRegistry,
    ) -> Self {
        let Metadata {
            app,
            env,
            version,
            extra,
        } = metadata;

        let mut meta = Map::new();
        meta.insert("app".to_string(), JsonValue::String(app));
        meta.insert("env".to_string(), JsonValue::String(env));
        meta.insert("version".to_string(), JsonValue::String(version));

        let mut logger = Self {
            instance_id: instance_id.into(),
            job_id: random_id(),
            options,
            parsers,
            meta,
            sink: Arc::new(StdSink),
            clock: Arc::new(SystemClock),
        };
        logger.add_meta(extra);
        logger
    }

    pub fn with_sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// A logger with the same identity and a snapshot of the current
    /// metadata and parsers, under a fresh `jobId`.
    pub fn child(&self) -> Logger {
        let child = Logger {
            job_id: random_id(),
            ..self.clone()
        };
        tracing::debug!(parent_job_id = %self.job_id, job_id = %child.job_id, "Created child logger");
        child
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn options(&self) -> LoggerOptions {
        self.options
    }

    /// Accumulated metadata, already parsed.
    pub fn metadata(&self) -> &Map<String, JsonValue> {
        &self.meta
    }

    pub fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }

    /// Register a parser for a field name; applies to later calls only.
    pub fn set_parser(&mut self, name: &str, parser: impl Into<FieldParser>) {
        self.parsers.set(name, parser);
    }

    /// Parse and merge fields into the accumulated metadata.
    pub fn add_meta(&mut self, meta: Fields) {
        self.parsers.parse_into(&meta, &mut self.meta);
    }

    /// Start an action and emit its start line.
    pub fn action(&self, message: &str, meta: Fields) -> Action<'_> {
        Action::start(self, message, meta)
    }

    /// Start a batch action: one start line per record, one shared `actionId`.
    pub fn actions(
        &self,
        message: &str,
        records: impl IntoIterator<Item = ActionRecord>,
    ) -> Actions<'_> {
        Actions::start(self, message, records)
    }

    pub fn info(&self, message: &str, meta: Fields) {
        self.log(LogLevel::Info, message, meta);
    }

    pub fn warn(&self, message: &str, meta: Fields) {
        self.log(LogLevel::Warn, message, meta);
    }

    pub fn error(&self, message: &str, meta: Fields) {
        self.log(LogLevel::Error, message, meta);
    }

    pub fn log(&self, level: LogLevel, message: &str, mut meta: Fields) {
        if self.options.silent {
            return;
        }

        let action_id = meta.remove(ACTION_ID).and_then(|id| id.to_json_lossy());
        let correlation = Trace {
            instance_id: self.instance_id.clone(),
            job_id: self.job_id.clone(),
            action_id,
            log_id: random_id(),
        };

        let mut metadata = Map::new();
        metadata.insert("traceID".to_string(), JsonValue::String(self.instance_id.clone()));
        match serde_json::to_value(&correlation) {
            Ok(trace) => {
                metadata.insert("trace".to_string(), trace);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize trace"),
        }
        for (key, value) in &self.meta {
            metadata.insert(key.clone(), value.clone());
        }
        self.parsers.parse_into(&meta, &mut metadata);

        let record = LogRecord {
            timestamp: format_timestamp(self.clock.now()),
            level,
            message: message.to_string(),
            metadata,
        };
        match serde_json::to_string(&record) {
            Ok(line) => self.sink.write(level, &line),
            Err(e) => tracing::warn!(error = %e, log_message = message, "Failed to serialize log record"),
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("instance_id", &self.instance_id)
            .field("job_id", &self.job_id)
            .field("options", &self.options)
            .field("meta", &self.meta)
            .field("parsers", &self.parsers)
            .finish()
    }
}
