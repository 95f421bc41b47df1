//! Rendering of output documents.
//!
//! Evaluation produces plain data values; this module turns them into
//! text. YAML is the primary format (multi-document streams with `---`
//! separators, the shape Kubernetes manifests take), JSON is available
//! for tooling. All output is deterministic: record fields are rendered
//! in sorted key order.

use std::collections::HashMap;

use crate::value::{format_number, Value};

/// Renders values as YAML.
pub struct YamlPrinter {
    indent_width: usize,
}

impl Default for YamlPrinter {
    fn default() -> Self {
        YamlPrinter { indent_width: 2 }
    }
}

impl YamlPrinter {
    pub fn new() -> Self {
        YamlPrinter::default()
    }

    /// Renders one document. The result ends with a newline.
    pub fn print(&self, value: &Value) -> String {
        match value {
            Value::Array(arr) if !arr.borrow().is_empty() => self.print_block(value, 0),
            Value::Object(obj) if !obj.borrow().is_empty() => self.print_block(value, 0),
            other => format!("{}\n", self.scalar(other)),
        }
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(level * self.indent_width)
    }

    /// Renders a non-empty container as a block of lines.
    fn print_block(&self, value: &Value, level: usize) -> String {
        let pad = self.indent(level);
        let mut out = String::new();

        match value {
            Value::Object(obj) => {
                let mut fields: Vec<(String, Value)> = obj
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                fields.sort_by(|a, b| a.0.cmp(&b.0));

                for (key, val) in fields {
                    let key = self.scalar_string(&key);
                    if is_block(&val) {
                        out.push_str(&format!("{}{}:\n", pad, key));
                        out.push_str(&self.print_block(&val, level + 1));
                    } else {
                        out.push_str(&format!("{}{}: {}\n", pad, key, self.scalar(&val)));
                    }
                }
            }
            Value::Array(arr) => {
                for val in arr.borrow().iter() {
                    if is_block(val) {
                        // Merge the dash into the first line of the
                        // nested block
                        let child = self.print_block(val, level + 1);
                        let inner_pad = self.indent(level + 1);
                        let stripped = child.strip_prefix(inner_pad.as_str()).unwrap_or(&child);
                        out.push_str(&format!("{}- {}", pad, stripped));
                    } else {
                        out.push_str(&format!("{}- {}\n", pad, self.scalar(val)));
                    }
                }
            }
            other => {
                out.push_str(&format!("{}{}\n", pad, self.scalar(other)));
            }
        }

        out
    }

    fn scalar(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => self.scalar_string(s),
            Value::Array(_) => "[]".to_string(),
            Value::Object(_) => "{}".to_string(),
        }
    }

    fn scalar_string(&self, s: &str) -> String {
        if needs_quotes(s) {
            format!("\"{}\"", escape_string(s))
        } else {
            s.to_string()
        }
    }
}

fn is_block(value: &Value) -> bool {
    match value {
        Value::Array(arr) => !arr.borrow().is_empty(),
        Value::Object(obj) => !obj.borrow().is_empty(),
        _ => false,
    }
}

/// A string must be quoted if a YAML parser could read it as something
/// other than the literal text.
fn needs_quotes(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }

    // Keywords and anything numeric-looking resolve to other scalar types
    let lowered = s.to_ascii_lowercase();
    if matches!(
        lowered.as_str(),
        "true" | "false" | "null" | "yes" | "no" | "on" | "off" | "~"
    ) {
        return true;
    }
    if s.parse::<f64>().is_ok() {
        return true;
    }

    let first = match s.chars().next() {
        Some(c) => c,
        None => return true,
    };
    if !(first.is_ascii_alphanumeric() || first == '_' || first == '/') {
        return true;
    }

    s.chars().any(|c| {
        !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ' ' | ':'))
    }) || s.contains(": ")
        || s.ends_with(':')
        || s.ends_with(' ')
        || s.contains(" #")
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Renders one value as YAML.
pub fn to_yaml(value: &Value) -> String {
    YamlPrinter::new().print(value)
}

/// Renders documents as a multi-document YAML stream, each introduced by
/// a `---` separator.
pub fn to_yaml_stream(docs: &[Value]) -> String {
    let printer = YamlPrinter::new();
    let mut out = String::new();
    for doc in docs {
        out.push_str("---\n");
        out.push_str(&printer.print(doc));
    }
    out
}

/// Converts a runtime value to a `serde_json` value. Whole numbers render
/// as JSON integers.
pub fn to_json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if n.is_finite() && n.fract() == 0.0 && n.abs() <= i64::MAX as f64 {
                serde_json::Value::Number((*n as i64).into())
            } else {
                serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(arr) => {
            serde_json::Value::Array(arr.borrow().iter().map(to_json_value).collect())
        }
        Value::Object(obj) => {
            // Sorted keys keep JSON output deterministic
            let mut map = serde_json::Map::new();
            let mut fields: Vec<(String, Value)> = obj
                .borrow()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            for (k, v) in fields {
                map.insert(k, to_json_value(&v));
            }
            serde_json::Value::Object(map)
        }
    }
}

/// Converts host-provided JSON data into runtime values.
pub fn from_json(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(arr) => Value::array(arr.iter().map(from_json).collect()),
        serde_json::Value::Object(map) => {
            let fields: HashMap<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect();
            Value::Object(std::rc::Rc::new(std::cell::RefCell::new(fields)))
        }
    }
}

/// Renders a value as compact JSON.
pub fn to_json(value: &Value) -> String {
    serde_json::to_string(&to_json_value(value)).unwrap_or_default()
}

/// Renders a value as pretty-printed JSON.
pub fn to_json_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(&to_json_value(value)).unwrap_or_default()
}
