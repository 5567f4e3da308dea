use super::registry::Parse;
use super::value::ValueParser;
use crate::domain::{ForwardedError, NativeError, Value};
use serde::Serialize;
use serde_json::Value as JsonValue;

pub const HTTP_CLIENT_ERROR_TYPE: &str = "AxiosError";
pub const UNKNOWN_ERROR_TYPE: &str = "UnknownError";
/// The only type whose stack trace is kept in the parsed record.
pub const STACK_KEPT_FOR: &str = "TypeError";

/// Canonical shape every error collapses into before emission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedError {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<HttpErrorData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<HttpRequestConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Response side of an HTTP-client failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HttpErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,
}

/// Request side of an HTTP-client failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HttpRequestConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<JsonValue>,
}

impl ParsedError {
    fn new(error_type: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: None,
            stack: None,
            data: None,
            config: None,
            cause: None,
            path: None,
        }
    }
}

/// Marker substring mapped to an error type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTypeFilter {
    pub type_name: String,
    pub filter: String,
}

impl ErrorTypeFilter {
    pub fn new(type_name: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            filter: filter.into(),
        }
    }
}

/// Error-shaped input, in classification priority order.
enum ErrorShape<'a> {
    Forwarded(&'a ForwardedError),
    HttpClient(&'a Value),
    Native(&'a NativeError),
    Unknown(&'a Value),
}

fn classify(error: &Value) -> ErrorShape<'_> {
    match error {
        Value::Forwarded(forwarded) => ErrorShape::Forwarded(forwarded),
        value if is_http_client_error(value) => ErrorShape::HttpClient(value),
        Value::Error(native) => ErrorShape::Native(native),
        other => ErrorShape::Unknown(other),
    }
}

fn is_http_client_error(value: &Value) -> bool {
    value.is_object_like() && value.field("isAxiosError").is_truthy()
}

/// Strategy for the `error` field: classifies any error-like value.
///
/// Type inference walks an ordered table of `(type, substring)` pairs and
/// picks the first whose substring occurs in the request URL (HTTP-client
/// errors) or in the stack trace (native errors).
#[derive(Debug, Clone)]
pub struct ErrorParser {
    types: Vec<ErrorTypeFilter>,
    values: ValueParser,
}

impl Default for ErrorParser {
    fn default() -> Self {
        Self {
            types: vec![
                ErrorTypeFilter::new("AWSError", "aws-sdk"),
                ErrorTypeFilter::new("KafkaError", "kafkajs"),
            ],
            values: ValueParser::new(),
        }
    }
}

impl ErrorParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a type filter; earlier entries keep precedence.
    pub fn with_type(mut self, type_name: impl Into<String>, filter: impl Into<String>) -> Self {
        self.register_type(type_name, filter);
        self
    }

    pub fn register_type(&mut self, type_name: impl Into<String>, filter: impl Into<String>) {
        let entry = ErrorTypeFilter::new(type_name, filter);
        tracing::debug!(
            type_name = %entry.type_name,
            filter = %entry.filter,
            "Registered error type filter"
        );
        self.types.push(entry);
    }

    pub fn types(&self) -> &[ErrorTypeFilter] {
        &self.types
    }

    pub fn parse(&self, error: &Value) -> ParsedError {
        match classify(error) {
            ErrorShape::Forwarded(forwarded) => self.parse_forwarded(forwarded),
            ErrorShape::HttpClient(value) => self.parse_http_client(value),
            ErrorShape::Native(native) => self.parse_native(native),
            ErrorShape::Unknown(value) => self.parse_unknown(value),
        }
    }

    pub fn infer_type(&self, text: Option<&str>) -> Option<&str> {
        let text = text?;
        self.types
            .iter()
            .find(|entry| text.contains(entry.filter.as_str()))
            .map(|entry| entry.type_name.as_str())
    }

    fn parse_forwarded(&self, error: &ForwardedError) -> ParsedError {
        let mut parsed = self.parse(error.root());
        parsed.path = Some(error.path().to_string());
        parsed
    }

    fn parse_http_client(&self, error: &Value) -> ParsedError {
        let config = error.field("config");
        let response = error.field("response");
        let url = join_url(&config);

        let status_text = response.field("statusText");
        let data_message = if status_text.is_truthy() {
            status_text
        } else {
            error.field("code")
        };

        let error_type = self
            .infer_type(url.as_deref())
            .unwrap_or(HTTP_CLIENT_ERROR_TYPE);

        ParsedError {
            message: error.field("message").to_json_lossy(),
            data: Some(HttpErrorData {
                message: data_message.to_json_lossy(),
                code: response.field("status").to_json_lossy(),
                body: self.values.parse(&response.field("data")),
            }),
            config: Some(HttpRequestConfig {
                url,
                method: config.field("method").to_json_lossy(),
            }),
            ..ParsedError::new(error_type)
        }
    }

    fn parse_native(&self, error: &NativeError) -> ParsedError {
        let error_type = self
            .infer_type(Some(error.stack()))
            .unwrap_or(error.name())
            .to_string();
        let stack = (error_type == STACK_KEPT_FOR).then(|| error.stack().to_string());

        ParsedError {
            message: Some(JsonValue::from(error.message())),
            stack,
            cause: error.cause().map(String::from),
            ..ParsedError::new(error_type)
        }
    }

    fn parse_unknown(&self, error: &Value) -> ParsedError {
        ParsedError {
            message: self.values.parse(error),
            ..ParsedError::new(UNKNOWN_ERROR_TYPE)
        }
    }
}

/// Truthy parts of `baseURL` + `url`, joined without a separator.
fn join_url(config: &Value) -> Option<String> {
    let joined: String = [config.field("baseURL"), config.field("url")]
        .iter()
        .filter(|part| part.is_truthy())
        .map(Value::to_display_string)
        .collect();
    (!joined.is_empty()).then_some(joined)
}

impl Parse for ErrorParser {
    fn parse(&self, value: &Value) -> Option<JsonValue> {
        serde_json::to_value(ErrorParser::parse(self, value)).ok()
    }
}
