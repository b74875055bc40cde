//! Argument normalization for inbound function calls.
//!
//! The voice platform is not consistent about where it puts arguments. Any
//! of these shapes can arrive:
//!
//! ```text
//! { "name": "f", "args": "{\"email\":\"a@b.c\"}" }          string-encoded JSON
//! { "name": "f", "args": { "email": "a@b.c" } }              plain object
//! { "name": "f", "args": { "parameters": { "email": ... } } } nested parameters
//! { "name": "f", "call": {...}, "email": "a@b.c" }           flattened top level
//! ```
//!
//! All of them reduce to one [`Args`] map. Malformed input degrades to an
//! empty map and never fails the request.

use serde_json::{Map, Value};
use tracing::{info, warn};

/// Canonical arguments used by every behavior.
pub type Args = Map<String, Value>;

/// Top-level keys that are never treated as arguments.
const RESERVED_KEYS: [&str; 3] = ["name", "call", "args"];

/// A function call extracted from a raw webhook body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Requested function, `None` when absent, null, empty, `false` or `0`.
    pub name: Option<String>,
    /// Normalized arguments, empty when nothing usable was sent.
    pub args: Args,
}

impl FunctionCall {
    /// Extract the function name and normalized arguments from a request body.
    pub fn from_body(body: &Value) -> Self {
        let name = match body.get("name") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Bool(false)) => None,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(other) => Some(other.to_string()),
        };

        let args = normalize_args(body.get("args"), body);

        FunctionCall { name, args }
    }
}

/// Reduce `raw_args` (and, as a last resort, `raw_body`) to one argument map.
///
/// Explicit `args` always wins. The top-level fallback is only consulted when
/// `args` produced nothing.
pub fn normalize_args(raw_args: Option<&Value>, raw_body: &Value) -> Args {
    let parsed = match raw_args {
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    error = %e,
                    args_preview = %preview(raw),
                    "args_parse_failed"
                );
                Value::Null
            }
        },
        Some(value) => value.clone(),
        None => Value::Null,
    };

    let mut args = match parsed {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    // One level only; a nested `parameters.parameters` is left as is.
    if matches!(args.get("parameters"), Some(Value::Object(_))) {
        if let Some(Value::Object(inner)) = args.remove("parameters") {
            args = inner;
        }
    }

    if args.is_empty() {
        if let Value::Object(body) = raw_body {
            let rest: Args = body
                .iter()
                .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();

            if !rest.is_empty() {
                info!(keys = ?rest.keys().collect::<Vec<_>>(), "args_from_top_level");
                args = rest;
            }
        }
    }

    args
}

/// Read an argument as display text.
///
/// Missing, null and empty-string values read as `None`. Numbers and booleans
/// are rendered the way they appear in JSON.
pub fn text(args: &Args, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn preview(raw: &str) -> &str {
    match raw.char_indices().nth(200) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}
