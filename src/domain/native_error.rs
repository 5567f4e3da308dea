use super::fields::Fields;
use super::value::Value;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

/// A built-in runtime error instance.
///
/// `name` plays the role of the error's class name (`Error`, `TypeError`, ...)
/// and is what the classifier falls back to when nothing in the stack trace
/// identifies a more specific type.
#[derive(Clone)]
pub struct NativeError {
    name: String,
    message: String,
    stack: String,
    cause: Option<String>,
    fields: Fields,
}

impl NativeError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let message = message.into();
        let stack = capture_stack(&name, &message);
        Self {
            name,
            message,
            stack,
            cause: None,
            fields: Fields::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new("TypeError", message)
    }

    /// Capture a Rust error, named after its type.
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        let mut native = Self::new(short_type_name::<E>(), error.to_string());
        native.cause = error.source().map(|source| source.to_string());
        native
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = stack.into();
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Attach an extra own field, visible to forwarding and serialization.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

fn capture_stack(name: &str, message: &str) -> String {
    let header = if message.is_empty() {
        name.to_string()
    } else {
        format!("{name}: {message}")
    };
    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        format!("{header}\n{backtrace}")
    } else {
        header
    }
}

/// `my_crate::io::ReadError<T>` -> `ReadError`
fn short_type_name<E>() -> String {
    let full = std::any::type_name::<E>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
        .to_string()
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

impl fmt::Debug for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeError")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("cause", &self.cause)
            .finish()
    }
}

impl std::error::Error for NativeError {}

impl From<anyhow::Error> for NativeError {
    fn from(error: anyhow::Error) -> Self {
        let causes: Vec<String> = error.chain().skip(1).map(|c| c.to_string()).collect();
        let native = Self::new("Error", error.to_string()).with_stack(format!("Error: {error:?}"));
        if causes.is_empty() {
            native
        } else {
            native.with_cause(causes.join(": "))
        }
    }
}
