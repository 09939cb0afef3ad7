//! JSON reader
//!
//! Accepts an array of flat objects or a single flat object. The column set
//! is the union of keys in first-seen order.

use serde_json::{Map, Value as JsonValue};

use crate::error::{ConversionError, ConversionResult, ParseError};
use crate::format::Format;
use crate::table::{TabularData, Value};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse JSON bytes into a table
pub fn read(bytes: &[u8]) -> ConversionResult<TabularData> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let document: JsonValue = serde_json::from_slice(bytes).map_err(|e| {
        ConversionError::malformed_with(Format::Json, syntax_error(&e, bytes))
    })?;

    match document {
        JsonValue::Array(items) => {
            let objects = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    JsonValue::Object(object) => Ok(object),
                    other => Err(ConversionError::malformed(
                        Format::Json,
                        format!(
                            "array element {} is {}, expected an object",
                            index,
                            describe(&other)
                        ),
                    )),
                })
                .collect::<ConversionResult<Vec<_>>>()?;
            table_from_objects(objects)
        }
        JsonValue::Object(object) => table_from_objects(vec![object]),
        other => Err(ConversionError::malformed(
            Format::Json,
            format!(
                "top-level value is {}, expected an array of objects or an object",
                describe(&other)
            ),
        )),
    }
}

fn table_from_objects(objects: Vec<Map<String, JsonValue>>) -> ConversionResult<TabularData> {
    let mut columns: Vec<String> = Vec::new();
    for object in &objects {
        for key in object.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = TabularData::new(columns)?;
    for (index, object) in objects.into_iter().enumerate() {
        let mut record = Vec::with_capacity(object.len());
        for (key, value) in object {
            let value = scalar(value).map_err(|kind| {
                ConversionError::malformed(
                    Format::Json,
                    format!(
                        "field '{}' in record {} is {}, expected a scalar",
                        key, index, kind
                    ),
                )
            })?;
            record.push((key, value));
        }
        table.push_record(record)?;
    }

    Ok(table)
}

fn scalar(value: JsonValue) -> Result<Value, &'static str> {
    match value {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(b)),
        JsonValue::Number(n) => Ok(Value::Number(n)),
        JsonValue::String(s) => Ok(Value::String(s)),
        JsonValue::Array(_) => Err("an array"),
        JsonValue::Object(_) => Err("an object"),
    }
}

fn describe(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Build a parse error with location and a caret preview of the offending line
fn syntax_error(error: &serde_json::Error, bytes: &[u8]) -> ParseError {
    let location = (error.line() > 0).then(|| (error.line(), error.column()));
    let message = strip_location(&error.to_string());
    let parse_error = ParseError::new(message, location);

    match location.and_then(|(line, column)| preview(bytes, line, column)) {
        Some(preview) => parse_error.with_preview(preview),
        None => parse_error,
    }
}

/// serde_json appends " at line X column Y"; the location is kept separately
fn strip_location(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(pos) => message[..pos].to_string(),
        None => message.to_string(),
    }
}

fn preview(bytes: &[u8], line: usize, column: usize) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let source_line = text.lines().nth(line.checked_sub(1)?)?;
    let shown: String = source_line.chars().take(80).collect();
    let caret = column.saturating_sub(1).min(shown.chars().count());
    Some(format!("{}\n{}^", shown, " ".repeat(caret)))
}
