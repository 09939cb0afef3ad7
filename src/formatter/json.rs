//! JSON writer: an array of objects, keys in column order

use serde::Serialize;
use serde_json::ser::{CompactFormatter, PrettyFormatter, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::error::{ConversionError, ConversionResult};
use crate::format::Format;
use crate::table::TabularData;

/// Serialize a table as a JSON array of records
///
/// `indent_size` of 0 produces compact output.
pub fn write(table: &TabularData, indent_size: u8) -> ConversionResult<Vec<u8>> {
    let records: Vec<JsonValue> = table
        .iter_rows()
        .map(|row| {
            let object: Map<String, JsonValue> = row
                .iter()
                .map(|(column, value)| (column.to_string(), value.to_json()))
                .collect();
            JsonValue::Object(object)
        })
        .collect();

    let mut output = Vec::with_capacity(table.row_count() * 32 + 2);
    let result = if indent_size == 0 {
        records.serialize(&mut Serializer::with_formatter(&mut output, CompactFormatter))
    } else {
        let indent = vec![b' '; indent_size as usize];
        records.serialize(&mut Serializer::with_formatter(
            &mut output,
            PrettyFormatter::with_indent(&indent),
        ))
    };
    result.map_err(|e| ConversionError::write(Format::Json, e))?;

    Ok(output)
}
