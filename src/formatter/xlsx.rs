//! XLSX writer built on rust_xlsxwriter
//!
//! One worksheet: the header row, then one row per record. The document
//! creation time is pinned so identical tables produce identical bytes.

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook, Worksheet, XlsxError};

use crate::error::{ConversionError, ConversionResult};
use crate::format::Format;
use crate::table::{TabularData, Value};

/// Serialize a table as a single-sheet workbook
pub fn write(table: &TabularData, sheet_name: &str) -> ConversionResult<Vec<u8>> {
    build(table, sheet_name).map_err(|e| ConversionError::write(Format::Xlsx, e))
}

fn build(table: &TabularData, sheet_name: &str) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string(0, column_number(col)?, name)?;
    }

    for (index, row) in table.rows().iter().enumerate() {
        let row_number = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, value) in row.iter().enumerate() {
            write_cell(worksheet, row_number, column_number(col)?, value)?;
        }
    }

    workbook.save_to_buffer()
}

fn column_number(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<(), XlsxError> {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                worksheet.write_number(row, col, f)?;
            }
            None => {
                worksheet.write_string(row, col, n.to_string())?;
            }
        },
        Value::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}
