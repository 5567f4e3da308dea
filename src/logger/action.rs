//! Action tracking: a start line followed by exactly one outcome line.
//!
//! Every line of one action (or one batch) carries the same `actionId`, so
//! start and outcome lines can be joined downstream. Outcome methods consume
//! the handle; dropping a handle without calling one emits nothing.

use super::Logger;
use super::messages::{FAILURE_SUFFIX, SKIP_SUFFIX, SUCCESS_SUFFIX};
use super::trace::random_id;
use crate::domain::{Fields, ForwardedError, Value};
use std::collections::HashMap;
use std::time::Instant;

pub(crate) const ACTION_ID: &str = "actionId";
const DURATION: &str = "duration";
const CAUSE: &str = "cause";
const ERROR: &str = "error";

/// Handle for a single started action.
#[must_use = "an action only reports its outcome through success, skip or failure"]
pub struct Action<'a> {
    logger: &'a Logger,
    message: String,
    meta: Fields,
    action_id: String,
    started: Instant,
}

impl<'a> Action<'a> {
    pub(super) fn start(logger: &'a Logger, message: &str, meta: Fields) -> Self {
        let action = Self {
            logger,
            message: message.to_string(),
            meta,
            action_id: random_id(),
            started: Instant::now(),
        };
        let start_meta = action.meta.clone().with(ACTION_ID, action.action_id.as_str());
        logger.info(&action.message, start_meta);
        action
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn success(self, extra: Fields) {
        let meta = self.outcome_meta(&extra, Fields::new());
        self.logger
            .info(&format!("{}{SUCCESS_SUFFIX}", self.message), meta);
    }

    pub fn skip(self, cause: impl Into<String>, extra: Fields) {
        let meta = self.outcome_meta(&extra, Fields::new().with(CAUSE, cause.into()));
        self.logger.info(&format!("{}{SKIP_SUFFIX}", self.message), meta);
    }

    /// Logs the failure and returns the error wrapped under this action's name.
    pub fn failure(self, error: impl Into<Value>, extra: Fields) -> ForwardedError {
        let error = error.into();
        let meta = self.outcome_meta(&extra, Fields::new().with(ERROR, error.clone()));
        self.logger
            .error(&format!("{}{FAILURE_SUFFIX}", self.message), meta);
        ForwardedError::new(self.message, error)
    }

    /// `meta`, then `extra`, then the outcome's own fields, then correlation.
    fn outcome_meta(&self, extra: &Fields, outcome: Fields) -> Fields {
        self.meta
            .clone()
            .merged(extra)
            .merged(&outcome)
            .with(ACTION_ID, self.action_id.as_str())
            .with(DURATION, elapsed_millis(self.started))
    }
}

/// An item of a batch action.
#[derive(Debug, Clone, Default)]
pub struct ActionRecord {
    pub id: String,
    pub meta: Fields,
}

impl ActionRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: Fields::new(),
        }
    }

    pub fn with_meta(mut self, meta: Fields) -> Self {
        self.meta = meta;
        self
    }
}

/// Outcome of one batch item. A truthy `error` marks a failure.
#[derive(Debug, Clone, Default)]
pub struct ActionResult {
    pub id: String,
    pub meta: Fields,
    pub error: Value,
}

impl ActionResult {
    pub fn success(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn failure(id: impl Into<String>, error: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            meta: Fields::new(),
            error: error.into(),
        }
    }

    pub fn with_meta(mut self, meta: Fields) -> Self {
        self.meta = meta;
        self
    }
}

/// Handle for a batch of records sharing one `actionId`.
#[must_use = "a batch only reports its outcomes through end"]
pub struct Actions<'a> {
    logger: &'a Logger,
    message: String,
    action_id: String,
    started: Instant,
    records: HashMap<String, Fields>,
}

impl<'a> Actions<'a> {
    pub(super) fn start(
        logger: &'a Logger,
        message: &str,
        records: impl IntoIterator<Item = ActionRecord>,
    ) -> Self {
        let action_id = random_id();
        let started = Instant::now();
        let mut by_id = HashMap::new();

        for record in records {
            let meta = record.meta.with(ACTION_ID, action_id.as_str());
            logger.info(message, meta.clone());
            by_id.insert(record.id, meta);
        }

        Self {
            logger,
            message: message.to_string(),
            action_id,
            started,
            records: by_id,
        }
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    /// Emit one outcome line per result.
    ///
    /// Results whose id was not part of the batch are still reported, with
    /// only their own metadata and no `actionId`.
    pub fn end(self, results: impl IntoIterator<Item = ActionResult>) {
        for result in results {
            let base = match self.records.get(&result.id) {
                Some(meta) => meta.clone(),
                None => {
                    tracing::debug!(id = %result.id, action = %self.message, "Batch result without a matching record");
                    Fields::new()
                }
            };
            let meta = base.merged(&result.meta);

            if result.error.is_truthy() {
                let meta = meta
                    .with(ERROR, result.error)
                    .with(DURATION, elapsed_millis(self.started));
                self.logger
                    .error(&format!("{}{FAILURE_SUFFIX}", self.message), meta);
            } else {
                let meta = meta.with(DURATION, elapsed_millis(self.started));
                self.logger
                    .info(&format!("{}{SUCCESS_SUFFIX}", self.message), meta);
            }
        }
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::logger::{LoggerOptions, MemorySink, Metadata};

    fn logger(sink: &MemorySink) -> Logger {
        Logger::new("i", LoggerOptions::default(), Metadata::new("app", "test", "1"))
            .with_sink(sink.clone())
    }

    #[test]
    fn test_dropped_action_emits_only_start() {
        let sink = MemorySink::new();
        let logger = logger(&sink);
        {
            let _action = logger.action("orphan", Fields::new());
        }
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "orphan");
    }

    #[test]
    fn test_skip_carries_cause() {
        let sink = MemorySink::new();
        let logger = logger(&sink);
        logger
            .action("sync", fields! { "k" => 1 })
            .skip("nothing to do", fields! { "k2" => 2 });

        let records = sink.records();
        let skip = &records[1];
        assert_eq!(skip.message, "sync_skip");
        assert_eq!(skip.field("cause"), Some(&serde_json::json!("nothing to do")));
        assert_eq!(skip.field("k"), Some(&serde_json::json!(1)));
        assert_eq!(skip.field("k2"), Some(&serde_json::json!(2)));
        assert_eq!(skip.action_id(), records[0].action_id());
    }

    #[test]
    fn test_unmatched_batch_result_has_no_action_id() {
        let sink = MemorySink::new();
        let logger = logger(&sink);
        let batch = logger.actions("import", vec![ActionRecord::new("1")]);
        batch.end(vec![ActionResult::success("unknown").with_meta(fields! { "b" => 2 })]);

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].message, "import_success");
        assert_eq!(records[1].action_id(), None);
        assert!(records[1].trace().is_some_and(|trace| trace.action_id.is_none()));
        assert_eq!(records[1].field("b"), Some(&serde_json::json!(2)));
    }
}
