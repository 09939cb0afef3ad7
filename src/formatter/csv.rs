//! CSV writer
//!
//! Fields containing the delimiter, a quote or a line break are quoted and
//! inner quotes doubled. Null cells are written as empty fields.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::conversion::DelimiterType;
use crate::error::{ConversionError, ConversionResult};
use crate::format::Format;
use crate::table::TabularData;

/// Serialize a table as delimited text with a header line
pub fn write(table: &TabularData, delimiter: DelimiterType) -> ConversionResult<Vec<u8>> {
    if table.column_count() == 0 {
        return Ok(Vec::new());
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(table.columns())
        .map_err(|e| ConversionError::write(Format::Csv, e))?;

    for row in table.rows() {
        writer
            .write_record(row.iter().map(|value| value.to_string()))
            .map_err(|e| ConversionError::write(Format::Csv, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| ConversionError::write(Format::Csv, e.error()))
}
