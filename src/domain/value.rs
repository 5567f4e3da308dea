use super::error::ValueError;
use super::fields::Fields;
use super::forwarded::ForwardedError;
use super::native_error::NativeError;
use bytes::Bytes;
use parking_lot::RwLock;
use serde_json::{Map, Number, Value as JsonValue};
use std::fmt;
use std::sync::Arc;

/// A dynamic metadata value.
///
/// Arrays and objects are shared nodes: cloning a `Value` clones the handle,
/// not the contents, so a node can be made to contain itself.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Bytes(Bytes),
    Array(Array),
    Object(Object),
    Error(Arc<NativeError>),
    Forwarded(Arc<ForwardedError>),
}

/// Shared, interior-mutable array node.
#[derive(Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

/// Shared, interior-mutable object node.
#[derive(Clone, Default)]
pub struct Object(Arc<RwLock<Fields>>);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(values: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(values)))
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.write().push(value.into());
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Copy of the element handles; nested nodes stay shared.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Identity of the node, used for cycle detection.
    pub fn node_id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self(Arc::new(RwLock::new(fields)))
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.write().insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Copy of the field handles; nested nodes stay shared.
    pub fn snapshot(&self) -> Fields {
        self.0.read().clone()
    }

    /// Identity of the node, used for cycle detection.
    pub fn node_id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Falsy values are `undefined`, `null`, `false`, `0` and `""`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// True for arrays, objects, buffers and errors.
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            Value::Bytes(_)
                | Value::Array(_)
                | Value::Object(_)
                | Value::Error(_)
                | Value::Forwarded(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Field lookup on object-shaped values; `Undefined` otherwise.
    pub fn field(&self, key: &str) -> Value {
        match self {
            Value::Object(o) => o.get(key).unwrap_or_default(),
            Value::Error(e) => match key {
                "name" => Value::String(e.name().to_string()),
                "message" => Value::String(e.message().to_string()),
                "stack" => Value::String(e.stack().to_string()),
                _ => e.fields().get(key).cloned().unwrap_or_default(),
            },
            Value::Forwarded(f) => match key {
                "path" => Value::String(f.path().to_string()),
                "message" => Value::String(f.message().to_string()),
                _ => f.fields().get(key).cloned().unwrap_or_default(),
            },
            _ => Value::Undefined,
        }
    }

    /// String conversion with script-runtime semantics (`String(value)`).
    pub fn to_display_string(&self) -> String {
        let mut seen = Vec::new();
        display_string(self, &mut seen)
    }

    /// Project onto JSON. `None` means the value has no JSON form (undefined).
    pub fn to_json(&self) -> Result<Option<JsonValue>, ValueError> {
        let mut ancestors = Vec::new();
        project(self, &mut ancestors)
    }

    /// Like [`Value::to_json`], but renders circular structures as their
    /// structural dump instead of failing.
    pub fn to_json_lossy(&self) -> Option<JsonValue> {
        match self.to_json() {
            Ok(json) => json,
            Err(_) => Some(JsonValue::String(crate::parser::inspect::inspect(self))),
        }
    }
}

fn display_string(value: &Value, seen: &mut Vec<usize>) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        Value::Array(array) => {
            if seen.contains(&array.node_id()) {
                return String::new();
            }
            seen.push(array.node_id());
            let parts: Vec<String> = array
                .snapshot()
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => display_string(other, seen),
                })
                .collect();
            seen.pop();
            parts.join(",")
        }
        Value::Object(_) => "[object Object]".to_string(),
        Value::Error(e) => e.to_string(),
        Value::Forwarded(f) => {
            if f.message().is_empty() {
                "Error".to_string()
            } else {
                format!("Error: {}", f.message())
            }
        }
    }
}

fn project(value: &Value, ancestors: &mut Vec<usize>) -> Result<Option<JsonValue>, ValueError> {
    let json = match value {
        Value::Undefined => return Ok(None),
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => JsonValue::Number(n.clone()),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Bytes(bytes) => {
            let mut map = Map::new();
            map.insert("type".to_string(), JsonValue::from("Buffer"));
            map.insert(
                "data".to_string(),
                JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect()),
            );
            JsonValue::Object(map)
        }
        Value::Array(array) => {
            enter(array.node_id(), ancestors)?;
            let mut items = Vec::with_capacity(array.len());
            for item in array.snapshot() {
                items.push(project(&item, ancestors)?.unwrap_or(JsonValue::Null));
            }
            ancestors.pop();
            JsonValue::Array(items)
        }
        Value::Object(object) => {
            enter(object.node_id(), ancestors)?;
            let map = project_fields(&object.snapshot(), ancestors)?;
            ancestors.pop();
            JsonValue::Object(map)
        }
        Value::Error(error) => JsonValue::Object(project_fields(error.fields(), ancestors)?),
        Value::Forwarded(forwarded) => {
            let mut map = Map::new();
            if let Some(root) = project(forwarded.root(), ancestors)? {
                map.insert("root".to_string(), root);
            }
            map.extend(project_fields(forwarded.fields(), ancestors)?);
            map.insert("path".to_string(), JsonValue::from(forwarded.path()));
            if forwarded.has_message() {
                map.insert("message".to_string(), JsonValue::from(forwarded.message()));
            }
            JsonValue::Object(map)
        }
    };
    Ok(Some(json))
}

fn project_fields(
    fields: &Fields,
    ancestors: &mut Vec<usize>,
) -> Result<Map<String, JsonValue>, ValueError> {
    let mut map = Map::new();
    for (key, value) in fields {
        if let Some(json) = project(value, ancestors)? {
            map.insert(key.clone(), json);
        }
    }
    Ok(map)
}

fn enter(node_id: usize, ancestors: &mut Vec<usize>) -> Result<(), ValueError> {
    if ancestors.contains(&node_id) {
        return Err(ValueError::Circular);
    }
    ancestors.push(node_id);
    Ok(())
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::parser::inspect::inspect(self))
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Array(self.clone()), f)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Object(self.clone()), f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        // Integral floats print without a fraction, like the runtime does.
        if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
            return Value::Number(Number::from(n as i64));
        }
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::from(n as f64)
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::Object(Object::from_fields(fields))
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(Array::from_vec(values))
    }
}

impl From<NativeError> for Value {
    fn from(error: NativeError) -> Self {
        Value::Error(Arc::new(error))
    }
}

impl From<ForwardedError> for Value {
    fn from(error: ForwardedError) -> Self {
        Value::Forwarded(Arc::new(error))
    }
}

impl From<anyhow::Error> for Value {
    fn from(error: anyhow::Error) -> Self {
        Value::from(NativeError::from(error))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::Array(Array::from_vec(items.into_iter().map(Value::from).collect()))
            }
            JsonValue::Object(map) => Value::Object(Object::from_fields(map.into_iter().collect())),
        }
    }
}
