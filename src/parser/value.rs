use super::codec;
use super::inspect::inspect;
use super::registry::Parse;
use crate::domain::Value;
use serde_json::Value as JsonValue;

/// Default strategy: normalizes any value into something loggable.
///
/// - strings and buffers pass through the size guard
/// - other primitives are returned unchanged (`undefined` stays absent)
/// - objects, arrays and errors are serialized to JSON, falling back to a
///   structural dump when serialization fails, then size guarded
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueParser;

impl ValueParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, value: &Value) -> Option<JsonValue> {
        let candidate = match value {
            Value::String(s) => s.clone(),
            Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Value::Undefined => return None,
            Value::Null => return Some(JsonValue::Null),
            Value::Bool(b) => return Some(JsonValue::Bool(*b)),
            Value::Number(n) => return Some(JsonValue::Number(n.clone())),
            object_like => serialize(object_like),
        };
        Some(JsonValue::String(codec::guard(candidate)))
    }
}

fn serialize(value: &Value) -> String {
    let projected = value
        .to_json()
        .map_err(|e| e.to_string())
        .and_then(|json| {
            serde_json::to_string(&json.unwrap_or(JsonValue::Null)).map_err(|e| e.to_string())
        });
    match projected {
        Ok(serialized) => serialized,
        Err(reason) => {
            tracing::debug!(reason = %reason, "Falling back to structural dump");
            inspect(value)
        }
    }
}

impl Parse for ValueParser {
    fn parse(&self, value: &Value) -> Option<JsonValue> {
        ValueParser::parse(self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Object;
    use crate::parser::test_support::LOREM;
    use bytes::Bytes;
    use serde_json::json;

    #[test]
    fn test_primitives_pass_through() {
        let parser = ValueParser::new();
        assert_eq!(parser.parse(&Value::from(5)), Some(json!(5)));
        assert_eq!(parser.parse(&Value::from(true)), Some(json!(true)));
        assert_eq!(parser.parse(&Value::Null), Some(JsonValue::Null));
        assert_eq!(parser.parse(&Value::Undefined), None);
    }

    #[test]
    fn test_short_string_unchanged() {
        assert_eq!(ValueParser::new().parse(&Value::from("toto")), Some(json!("toto")));
    }

    #[test]
    fn test_long_string_compressed() {
        let parsed = ValueParser::new().parse(&Value::from(LOREM)).unwrap();
        let encoded = parsed.as_str().unwrap();
        assert_eq!(codec::inflate(encoded).unwrap(), LOREM);
    }

    #[test]
    fn test_buffer_decoded_as_text() {
        let parsed = ValueParser::new().parse(&Value::from(Bytes::from_static(b"abc")));
        assert_eq!(parsed, Some(json!("abc")));
    }

    #[test]
    fn test_object_serialized() {
        let parsed = ValueParser::new().parse(&Value::from(json!({ "prop": "value" })));
        assert_eq!(parsed, Some(json!("{\"prop\":\"value\"}")));
    }

    #[test]
    fn test_circular_object_dumped() {
        let object = Object::new();
        object.insert("circ", object.clone());

        let parsed = ValueParser::new().parse(&Value::Object(object));
        assert_eq!(parsed, Some(json!("<ref *1> { circ: [Circular *1] }")));
    }

    #[test]
    fn test_large_object_compressed() {
        let items: Vec<JsonValue> = (0..100)
            .map(|i| json!({ "label": format!("genre-{i}"), "rank": i }))
            .collect();
        let value = json!({ "title": "The Batman", "genres": items });
        let serialized = serde_json::to_string(&value).unwrap();
        assert!(serialized.len() > 1000);

        let parsed = ValueParser::new().parse(&Value::from(value)).unwrap();
        assert_eq!(codec::inflate(parsed.as_str().unwrap()).unwrap(), serialized);
    }
}
