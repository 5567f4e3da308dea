use crate::domain::LogLevel;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One emitted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub metadata: Map<String, JsonValue>,
}

/// Correlation block stored under `metadata.trace`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub instance_id: String,
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<JsonValue>,
    pub log_id: String,
}

impl LogRecord {
    pub fn trace(&self) -> Option<Trace> {
        self.metadata
            .get("trace")
            .and_then(|trace| serde_json::from_value(trace.clone()).ok())
    }

    pub fn action_id(&self) -> Option<&str> {
        self.metadata.get("trace")?.get("actionId")?.as_str()
    }

    pub fn field(&self, key: &str) -> Option<&JsonValue> {
        self.metadata.get(key)
    }
}
