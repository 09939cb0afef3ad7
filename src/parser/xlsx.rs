//! XLSX reader built on calamine
//!
//! The first row of the selected sheet is the header. Trailing empty rows and
//! trailing columns with no header and no data are ignored.

use std::io::Cursor;

use calamine::{Data, ExcelDateTime, Range, Reader, Xlsx};
use chrono::NaiveTime;

use crate::conversion::SheetSelector;
use crate::error::{ConversionError, ConversionResult};
use crate::format::Format;
use crate::table::{find_duplicate, TabularData, Value};

/// Parse spreadsheet bytes into a table
pub fn read(bytes: &[u8], sheet: &SheetSelector) -> ConversionResult<TabularData> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(|e| {
        ConversionError::malformed(Format::Xlsx, format!("not a valid spreadsheet: {}", e))
    })?;

    let range = select_range(&mut workbook, sheet)?;
    table_from_range(&range)
}

fn select_range(
    workbook: &mut Xlsx<Cursor<&[u8]>>,
    sheet: &SheetSelector,
) -> ConversionResult<Range<Data>> {
    let result = match sheet {
        SheetSelector::Index(index) => workbook.worksheet_range_at(*index).ok_or_else(|| {
            ConversionError::malformed(
                Format::Xlsx,
                format!("workbook has no sheet at index {}", index),
            )
        })?,
        SheetSelector::Name(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(ConversionError::malformed(
                    Format::Xlsx,
                    format!("workbook has no sheet named '{}'", name),
                ));
            }
            workbook.worksheet_range(name)
        }
    };

    result.map_err(|e| ConversionError::malformed(Format::Xlsx, e.to_string()))
}

fn table_from_range(range: &Range<Data>) -> ConversionResult<TabularData> {
    let rows: Vec<&[Data]> = range.rows().collect();
    let used_rows = rows
        .iter()
        .rposition(|row| row.iter().any(|cell| !is_empty(cell)))
        .map_or(0, |last| last + 1);

    if used_rows == 0 {
        return Err(ConversionError::malformed(Format::Xlsx, "sheet has no rows"));
    }
    let rows = &rows[..used_rows];

    let width = rows
        .iter()
        .filter_map(|row| row.iter().rposition(|cell| !is_empty(cell)))
        .max()
        .map_or(0, |last| last + 1);

    let header = rows[0];
    let columns: Vec<String> = (0..width)
        .map(|col| match header.get(col) {
            Some(cell) if !is_empty(cell) => cell_text(cell),
            _ => format!("column_{}", col + 1),
        })
        .collect();

    if let Some(duplicate) = find_duplicate(&columns) {
        return Err(ConversionError::malformed(
            Format::Xlsx,
            format!("duplicate column name '{}'", duplicate),
        ));
    }

    let mut table = TabularData::new(columns)?;
    for row in &rows[1..] {
        let values = (0..width)
            .map(|col| row.get(col).map_or(Value::Null, cell_value))
            .collect();
        table.push_row(values)?;
    }

    Ok(table)
}

fn is_empty(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Map a cell onto a scalar value
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => float_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::String(s.clone()),
        Data::DateTime(dt) => date_value(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => Value::String(e.to_string()),
        #[allow(unreachable_patterns)]
        other => Value::String(other.to_string()),
    }
}

/// Whole floats become integers so `36.0` reads back as `36`
fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() <= 9.007_199_254_740_992e15 {
        Value::from(f as i64)
    } else {
        Value::from_f64(f)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell_value(cell) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Dates and times as ISO 8601 text, durations as `HH:MM:SS`
///
/// calamine resolves the workbook's date system (1900 or 1904) and Excel's
/// phantom 1900-02-29; serials it cannot place stay numeric.
fn date_value(dt: &ExcelDateTime) -> Value {
    if dt.is_duration() {
        if let Some(duration) = dt.as_duration() {
            let total = duration.num_seconds();
            return Value::String(format!(
                "{:02}:{:02}:{:02}",
                total / 3600,
                (total % 3600) / 60,
                total % 60
            ));
        }
    } else if let Some(datetime) = dt.as_datetime() {
        let text = if datetime.time() == NaiveTime::MIN {
            datetime.format("%Y-%m-%d").to_string()
        } else {
            datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
        };
        return Value::String(text);
    }
    float_value(dt.as_f64())
}
