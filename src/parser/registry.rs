//! Field-name keyed parser registry.
//!
//! Every metadata field is normalized by the strategy registered under its
//! name, or by the fallback strategy when none is.

use super::app::AppParser;
use super::error::ErrorParser;
use super::value::ValueParser;
use crate::domain::{Fields, Value};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name under which the fallback strategy is registered.
pub const DEFAULT_PARSER: &str = "default";
/// Field classified by the error parser out of the box.
pub const ERROR_FIELD: &str = "error";

/// A metadata normalization strategy.
///
/// Returning `None` drops the field from the record.
pub trait Parse: Send + Sync {
    fn parse(&self, value: &Value) -> Option<JsonValue>;
}

impl<F> Parse for F
where
    F: Fn(&Value) -> Option<JsonValue> + Send + Sync,
{
    fn parse(&self, value: &Value) -> Option<JsonValue> {
        self(value)
    }
}

/// The closed set of strategies a field can be bound to.
#[derive(Clone)]
pub enum FieldParser {
    Value(ValueParser),
    Error(Arc<ErrorParser>),
    App(AppParser),
    Custom(Arc<dyn Parse>),
}

impl FieldParser {
    pub fn custom<P: Parse + 'static>(parser: P) -> Self {
        FieldParser::Custom(Arc::new(parser))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FieldParser::Value(_) => "value",
            FieldParser::Error(_) => "error",
            FieldParser::App(_) => "app",
            FieldParser::Custom(_) => "custom",
        }
    }

    pub fn parse(&self, value: &Value) -> Option<JsonValue> {
        match self {
            FieldParser::Value(parser) => parser.parse(value),
            FieldParser::Error(parser) => Parse::parse(parser.as_ref(), value),
            FieldParser::App(parser) => Parse::parse(parser, value),
            FieldParser::Custom(parser) => parser.parse(value),
        }
    }
}

impl fmt::Debug for FieldParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldParser::{}", self.kind())
    }
}

impl From<ValueParser> for FieldParser {
    fn from(parser: ValueParser) -> Self {
        FieldParser::Value(parser)
    }
}

impl From<ErrorParser> for FieldParser {
    fn from(parser: ErrorParser) -> Self {
        FieldParser::Error(Arc::new(parser))
    }
}

impl From<AppParser> for FieldParser {
    fn from(parser: AppParser) -> Self {
        FieldParser::App(parser)
    }
}

/// Registry of field parsers.
///
/// Lookups are exact-name matches with a fallback; registrations only
/// affect fields parsed afterwards.
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    fallback: FieldParser,
    by_field: HashMap<String, FieldParser>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserRegistry {
    /// Value parser as fallback, error classifier for `error`.
    pub fn new() -> Self {
        Self::with_error_parser(ErrorParser::new())
    }

    pub fn with_error_parser(error_parser: ErrorParser) -> Self {
        let mut by_field = HashMap::new();
        by_field.insert(ERROR_FIELD.to_string(), FieldParser::from(error_parser));
        Self {
            fallback: FieldParser::Value(ValueParser::new()),
            by_field,
        }
    }

    /// Bind `parser` to the field `name`; [`DEFAULT_PARSER`] replaces the fallback.
    pub fn set(&mut self, name: &str, parser: impl Into<FieldParser>) {
        let parser = parser.into();
        tracing::debug!(field = name, kind = parser.kind(), "Registered parser");
        if name == DEFAULT_PARSER {
            self.fallback = parser;
        } else {
            self.by_field.insert(name.to_string(), parser);
        }
    }

    pub fn resolve(&self, name: &str) -> &FieldParser {
        self.by_field.get(name).unwrap_or(&self.fallback)
    }

    pub fn parse_field(&self, name: &str, value: &Value) -> Option<JsonValue> {
        self.resolve(name).parse(value)
    }

    /// Parse every field into `target`, overwriting on key collision.
    pub fn parse_into(&self, fields: &Fields, target: &mut Map<String, JsonValue>) {
        for (name, value) in fields {
            match self.parse_field(name, value) {
                Some(parsed) => {
                    target.insert(name.clone(), parsed);
                }
                None => {
                    target.shift_remove(name);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NativeError;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let registry = ParserRegistry::new();
        assert_eq!(registry.resolve("error").kind(), "error");
        assert_eq!(registry.resolve("anything").kind(), "value");
        assert_eq!(registry.resolve("default").kind(), "value");
    }

    #[test]
    fn test_error_field_is_classified() {
        let registry = ParserRegistry::new();
        let parsed = registry.parse_field("error", &Value::from(NativeError::error("boom")));
        assert_eq!(parsed, Some(json!({ "type": "Error", "message": "boom" })));

        let other = registry.parse_field("cause", &Value::from("boom"));
        assert_eq!(other, Some(json!("boom")));
    }

    #[test]
    fn test_custom_parser_overrides_field() {
        let mut registry = ParserRegistry::new();
        registry.set("user", FieldParser::custom(|_: &Value| -> Option<JsonValue> { Some(json!("redacted")) }));

        assert_eq!(registry.parse_field("user", &Value::from("alice")), Some(json!("redacted")));
        assert_eq!(registry.parse_field("other", &Value::from("alice")), Some(json!("alice")));
    }

    #[test]
    fn test_default_name_replaces_fallback() {
        let mut registry = ParserRegistry::new();
        registry.set(DEFAULT_PARSER, FieldParser::custom(|_: &Value| -> Option<JsonValue> { None }));

        assert_eq!(registry.parse_field("anything", &Value::from(1)), None);
        assert_eq!(registry.resolve("error").kind(), "error");
    }

    #[test]
    fn test_parse_into_overwrites_and_drops() {
        let mut registry = ParserRegistry::new();
        registry.set("app", AppParser::new());

        let mut target = Map::new();
        target.insert("a".to_string(), json!(1));
        target.insert("gone".to_string(), json!(1));

        let fields = crate::fields! {
            "a" => 2,
            "gone" => Value::Undefined,
            "app" => Value::from(json!({ "name": "n", "version": "v", "env": "e" })),
        };
        registry.parse_into(&fields, &mut target);

        assert_eq!(
            JsonValue::Object(target),
            json!({ "a": 2, "app": { "app": "n", "version": "v", "env": "e" } })
        );
    }
}
