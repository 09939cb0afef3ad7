//! CSV reader
//!
//! The first record is the header. Values are read as strings; type
//! inference, if any, happens later in the engine.

use csv::{ReaderBuilder, StringRecord};

use crate::conversion::DelimiterType;
use crate::error::{ConversionError, ConversionResult, ParseError};
use crate::format::Format;
use crate::table::{find_duplicate, TabularData, Value};

/// Parse delimited bytes into a table
pub fn read(bytes: &[u8], delimiter: DelimiterType) -> ConversionResult<TabularData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(bytes);

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(csv_error)?,
        None => {
            return Err(ConversionError::malformed(
                Format::Csv,
                "missing header row",
            ))
        }
    };

    let columns: Vec<String> = header.iter().map(str::to_string).collect();
    if let Some(duplicate) = find_duplicate(&columns) {
        return Err(ConversionError::malformed_with(
            Format::Csv,
            ParseError::new(format!("duplicate column name '{}'", duplicate), line_of(&header)),
        ));
    }

    let mut table = TabularData::new(columns)?;
    for (index, record) in records.enumerate() {
        let record = record.map_err(csv_error)?;
        if record.len() != table.column_count() {
            return Err(ConversionError::SchemaMismatch {
                row: index + 1,
                expected: table.column_count(),
                found: record.len(),
            });
        }
        table.push_row(record.iter().map(Value::from).collect())?;
    }

    Ok(table)
}

fn line_of(record: &StringRecord) -> Option<(usize, usize)> {
    record.position().map(|p| (p.line() as usize, 1))
}

fn csv_error(error: csv::Error) -> ConversionError {
    let location = error.position().map(|p| (p.line() as usize, 1));
    let message = match error.kind() {
        csv::ErrorKind::Utf8 { err, .. } => format!("invalid UTF-8 in field {}", err.field() + 1),
        _ => error.to_string(),
    };
    ConversionError::malformed_with(Format::Csv, ParseError::new(message, location))
}
