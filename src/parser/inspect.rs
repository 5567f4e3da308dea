//! Structural dump of dynamic values.
//!
//! Used where JSON serialization is impossible (self-referential values).
//! The output never fails and follows the `util.inspect` register:
//! `<ref *1> { circ: [Circular *1] }`.

use crate::domain::{Fields, Value};
use std::collections::HashMap;

/// Nesting below this depth is elided as `[Object]` / `[Array]`.
const MAX_DEPTH: usize = 2;
const MAX_ARRAY_ITEMS: usize = 100;
const MAX_BUFFER_BYTES: usize = 50;

pub fn inspect(value: &Value) -> String {
    let mut refs = RefTable::default();
    mark_circular(value, 0, &mut Vec::new(), &mut refs);

    let mut out = String::new();
    render(value, 0, &mut Vec::new(), &refs, &mut out);
    out
}

#[derive(Default)]
struct RefTable {
    ids: HashMap<usize, usize>,
}

impl RefTable {
    fn mark(&mut self, node_id: usize) {
        let next = self.ids.len() + 1;
        self.ids.entry(node_id).or_insert(next);
    }

    fn get(&self, node_id: usize) -> Option<usize> {
        self.ids.get(&node_id).copied()
    }
}

fn node_id(value: &Value) -> Option<usize> {
    match value {
        Value::Array(array) => Some(array.node_id()),
        Value::Object(object) => Some(object.node_id()),
        _ => None,
    }
}

fn children(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(array) => array.snapshot(),
        Value::Object(object) => object.snapshot().into_iter().map(|(_, v)| v).collect(),
        Value::Error(error) => error.fields().iter().map(|(_, v)| v.clone()).collect(),
        Value::Forwarded(forwarded) => forwarded.fields().iter().map(|(_, v)| v.clone()).collect(),
        _ => Vec::new(),
    }
}

fn mark_circular(value: &Value, depth: usize, ancestors: &mut Vec<usize>, refs: &mut RefTable) {
    if let Some(id) = node_id(value) {
        if ancestors.contains(&id) {
            refs.mark(id);
            return;
        }
        if depth > MAX_DEPTH {
            return;
        }
        ancestors.push(id);
        for child in children(value) {
            mark_circular(&child, depth + 1, ancestors, refs);
        }
        ancestors.pop();
    } else if depth <= MAX_DEPTH {
        for child in children(value) {
            mark_circular(&child, depth + 1, ancestors, refs);
        }
    }
}

fn render(value: &Value, depth: usize, ancestors: &mut Vec<usize>, refs: &RefTable, out: &mut String) {
    if let Some(id) = node_id(value) {
        if ancestors.contains(&id) {
            let n = refs.get(id).unwrap_or(1);
            out.push_str(&format!("[Circular *{n}]"));
            return;
        }
    }

    match value {
        Value::Undefined => out.push_str("undefined"),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(&b.to_string()),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => push_quoted(s, out),
        Value::Bytes(bytes) => {
            out.push_str("<Buffer");
            for byte in bytes.iter().take(MAX_BUFFER_BYTES) {
                out.push_str(&format!(" {byte:02x}"));
            }
            if bytes.len() > MAX_BUFFER_BYTES {
                out.push_str(&format!(" ... {} more bytes", bytes.len() - MAX_BUFFER_BYTES));
            }
            out.push('>');
        }
        Value::Array(array) => {
            if depth > MAX_DEPTH {
                out.push_str("[Array]");
                return;
            }
            push_ref_prefix(array.node_id(), refs, out);
            let items = array.snapshot();
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            ancestors.push(array.node_id());
            out.push_str("[ ");
            for (i, item) in items.iter().take(MAX_ARRAY_ITEMS).enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render(item, depth + 1, ancestors, refs, out);
            }
            if items.len() > MAX_ARRAY_ITEMS {
                out.push_str(&format!(", ... {} more items", items.len() - MAX_ARRAY_ITEMS));
            }
            out.push_str(" ]");
            ancestors.pop();
        }
        Value::Object(object) => {
            if depth > MAX_DEPTH {
                out.push_str("[Object]");
                return;
            }
            push_ref_prefix(object.node_id(), refs, out);
            ancestors.push(object.node_id());
            render_fields(&object.snapshot(), depth, ancestors, refs, out);
            ancestors.pop();
        }
        Value::Error(error) => {
            out.push_str(&format!("[{error}]"));
            if !error.fields().is_empty() && depth <= MAX_DEPTH {
                out.push(' ');
                render_fields(error.fields(), depth, ancestors, refs, out);
            }
        }
        Value::Forwarded(forwarded) => {
            out.push_str("ForwardedError ");
            let mut shown = forwarded.fields().clone();
            shown.insert("path", forwarded.path());
            if forwarded.has_message() {
                shown.insert("message", forwarded.message());
            }
            render_fields(&shown, depth, ancestors, refs, out);
        }
    }
}

fn render_fields(
    fields: &Fields,
    depth: usize,
    ancestors: &mut Vec<usize>,
    refs: &RefTable,
    out: &mut String,
) {
    if fields.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{ ");
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_key(key, out);
        out.push_str(": ");
        render(value, depth + 1, ancestors, refs, out);
    }
    out.push_str(" }");
}

fn push_ref_prefix(node_id: usize, refs: &RefTable, out: &mut String) {
    if let Some(n) = refs.get(node_id) {
        out.push_str(&format!("<ref *{n}> "));
    }
}

fn push_key(key: &str, out: &mut String) {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        out.push_str(key);
    } else {
        push_quoted(key, out);
    }
}

fn push_quoted(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
}
