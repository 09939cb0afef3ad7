//! Scalar type inference for text cells
//!
//! Readers for text formats hand back strings. When inference is enabled the
//! engine runs every string cell through [`infer_value`] so that `"36"`
//! becomes the number 36 and `"true"` becomes a boolean.

use serde_json::Number;

use super::{TabularData, Value};

/// Infer types for every string cell of a table in place
pub fn infer_types(table: &mut TabularData) {
    for value in table.values_mut() {
        let inferred = match value {
            Value::String(text) => infer_value(text),
            _ => continue,
        };
        *value = inferred;
    }
}

/// Infer the scalar a piece of text represents
///
/// Empty text is null. Numbers with leading zeros (`007`), a leading `+`, or
/// surrounding whitespace stay strings, as do `inf` and `NaN`.
pub fn infer_value(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }

    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    parse_number(text).map_or_else(|| Value::String(text.to_string()), Value::Number)
}

fn parse_number(text: &str) -> Option<Number> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let first = digits.chars().next()?;
    if !first.is_ascii_digit() {
        return None;
    }
    if !digits
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    let mut chars = digits.chars();
    if let (Some('0'), Some(next)) = (chars.next(), chars.next()) {
        if next.is_ascii_digit() {
            return None;
        }
    }

    if let Ok(i) = text.parse::<i64>() {
        return Some(i.into());
    }
    if let Ok(u) = text.parse::<u64>() {
        return Some(u.into());
    }

    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}
