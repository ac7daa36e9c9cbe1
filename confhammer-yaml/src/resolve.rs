//! Scalar resolution for plain YAML scalars
//!
//! Plain scalars follow the YAML 1.2 core schema: `null`, booleans, integers
//! (decimal, octal `0o`, hex `0x`) and floats (including `.inf` and `.nan`).
//! Anything else is a string. Quoted and block scalars never reach this
//! module's resolver, they are always strings.
//!
//! The lenient `parse_*` helpers are used when a schema asks for a specific
//! type and therefore accept more forms than the core schema resolves on its
//! own, e.g. `yes`/`no` for booleans.

use regex::Regex;
use serde_yaml_ng::{Number, Value};
use std::sync::LazyLock;

static INT_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+$").expect("valid decimal regex"));

static INT_OCTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0o[0-7]+$").expect("valid octal regex"));

static INT_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]+$").expect("valid hex regex"));

static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?$")
        .expect("valid float regex")
});

/// Returns true when a plain scalar denotes null.
pub fn is_null(text: &str) -> bool {
    matches!(text, "" | "~" | "null" | "Null" | "NULL")
}

/// Resolves a plain scalar into a generic value using the core schema.
pub fn resolve_plain(text: &str) -> Value {
    if is_null(text) {
        return Value::Null;
    }
    match text {
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if let Some(n) = resolve_int(text) {
        return Value::Number(n);
    }
    if let Some(f) = resolve_float(text) {
        return Value::Number(Number::from(f));
    }
    Value::String(text.to_string())
}

fn resolve_int(text: &str) -> Option<Number> {
    if INT_DECIMAL.is_match(text) {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::from(i));
        }
        if let Ok(u) = text.trim_start_matches('+').parse::<u64>() {
            return Some(Number::from(u));
        }
        return None;
    }
    if INT_OCTAL.is_match(text) {
        return i64::from_str_radix(&text[2..], 8).ok().map(Number::from);
    }
    if INT_HEX.is_match(text) {
        return i64::from_str_radix(&text[2..], 16).ok().map(Number::from);
    }
    None
}

fn resolve_float(text: &str) -> Option<f64> {
    match text {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }
    if FLOAT.is_match(text) {
        return text.parse::<f64>().ok();
    }
    None
}

/// Parses any YAML 1.1 or 1.2 boolean literal.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "y" | "Y" | "on" | "On" | "ON" => {
            Some(true)
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "n" | "N" | "off" | "Off" | "OFF" => {
            Some(false)
        }
        _ => None,
    }
}

/// Parses an integer, truncating fractional literals toward zero.
pub fn parse_int(text: &str) -> Option<i64> {
    if let Some(n) = resolve_int(text) {
        return n.as_i64();
    }
    let f = resolve_float(text)?;
    if !f.is_finite() {
        return None;
    }
    let truncated = f.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

/// Parses a floating point number, accepting integer literals.
pub fn parse_float(text: &str) -> Option<f64> {
    if let Some(f) = resolve_float(text) {
        return Some(f);
    }
    resolve_int(text).and_then(|n| n.as_f64())
}

/// Returns true when a string would resolve to something other than itself
/// if written as a plain scalar, and therefore needs quoting.
pub fn needs_quotes(text: &str) -> bool {
    !matches!(resolve_plain(text), Value::String(_))
}
