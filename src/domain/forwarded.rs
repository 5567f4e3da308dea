use super::fields::Fields;
use super::value::Value;
use std::fmt;

/// An error re-wrapped as it crosses a named action boundary.
///
/// Forwarding an already forwarded error prepends the new segment to the
/// inner path, so `a(b(c(err)))` carries the path `a.b.c`. The root's own
/// fields are copied shallowly; `path`, `message` and `stack` are set after
/// the copy and take precedence.
#[derive(Clone)]
pub struct ForwardedError {
    path: String,
    root: Value,
    message: Option<String>,
    stack: Option<String>,
    fields: Fields,
}

impl ForwardedError {
    pub fn new(path: impl Into<String>, root: impl Into<Value>) -> Self {
        let segment = path.into();
        let root = root.into();

        let (fields, message, stack) = match &root {
            Value::Object(object) => {
                let fields = object.snapshot();
                let message = fields.get("message").and_then(Value::as_str).map(String::from);
                let stack = fields.get("stack").and_then(Value::as_str).map(String::from);
                (fields, message, stack)
            }
            Value::Error(error) => (
                error.fields().clone(),
                Some(error.message().to_string()),
                Some(error.stack().to_string()),
            ),
            Value::Forwarded(inner) => (
                inner.fields.clone(),
                inner.message.clone(),
                inner.stack.clone(),
            ),
            _ => (Fields::new(), None, None),
        };

        let path = match &root {
            Value::Forwarded(inner) => format!("{segment}.{}", inner.path),
            _ => segment,
        };

        Self {
            path,
            root,
            message,
            stack,
            fields,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The first root that is not itself a forwarded error.
    pub fn root_cause(&self) -> &Value {
        match &self.root {
            Value::Forwarded(inner) => inner.root_cause(),
            other => other,
        }
    }

    /// Adopted from the root when it carried a string message, else empty.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn has_message(&self) -> bool {
        self.message.is_some()
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

impl fmt::Display for ForwardedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            "" => write!(f, "{}", self.path),
            message => write!(f, "{}: {message}", self.path),
        }
    }
}

impl fmt::Debug for ForwardedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardedError")
            .field("path", &self.path)
            .field("message", &self.message)
            .field("root", &self.root)
            .finish()
    }
}

impl std::error::Error for ForwardedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.root {
            Value::Error(error) => Some(error.as_ref()),
            Value::Forwarded(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NativeError, Object};

    #[test]
    fn test_adopts_message_and_path() {
        let error = ForwardedError::new("path", NativeError::error("message"));
        assert_eq!(error.message(), "message");
        assert_eq!(error.path(), "path");
    }

    #[test]
    fn test_nested_paths_chain_outermost_first() {
        let error = ForwardedError::new(
            "a",
            ForwardedError::new("b", ForwardedError::new("c", NativeError::error("m"))),
        );

        assert_eq!(error.path(), "a.b.c");
        assert_eq!(error.message(), "m");
        assert!(matches!(error.root_cause(), Value::Error(_)));
    }

    #[test]
    fn test_without_root_keeps_empty_message() {
        let error = ForwardedError::new("path", Value::Undefined);
        assert_eq!(error.message(), "");
        assert!(!error.has_message());
        assert!(error.stack().is_none());
    }

    #[test]
    fn test_copies_object_fields_but_path_wins() {
        let root = Object::new();
        root.insert("path", "from-root");
        root.insert("code", 42);
        root.insert("message", "boom");
        root.insert("stack", 7);

        let error = ForwardedError::new("outer", root);
        assert_eq!(error.path(), "outer");
        assert_eq!(error.message(), "boom");
        assert!(error.stack().is_none());
        assert_eq!(error.fields().get("code").and_then(Value::as_i64), Some(42));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let error = ForwardedError::new("a", ForwardedError::new("b", NativeError::error("m")));
        let inner = error.source().unwrap();
        assert_eq!(inner.to_string(), "b: m");
        assert_eq!(inner.source().unwrap().to_string(), "Error: m");
    }
}
