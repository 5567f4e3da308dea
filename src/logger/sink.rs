//! Output channels for serialized records.

use super::record::LogRecord;
use crate::domain::LogLevel;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Destination of one serialized record per call.
pub trait Sink: Send + Sync {
    fn write(&self, level: LogLevel, line: &str);
}

/// Process standard streams: info to stdout, warn and error to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSink;

impl Sink for StdSink {
    fn write(&self, level: LogLevel, line: &str) {
        let result = match level {
            LogLevel::Info => writeln!(io::stdout().lock(), "{line}"),
            LogLevel::Warn | LogLevel::Error => writeln!(io::stderr().lock(), "{line}"),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, level = %level, "Failed to write log line");
        }
    }
}

/// Keeps every line in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    /// Lines decoded back into records; undecodable lines are skipped.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lines
            .lock()
            .iter()
            .filter_map(|(_, line)| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, level: LogLevel, line: &str) {
        self.lines.lock().push((level, line.to_string()));
    }
}
