//! Tabular data converter
//!
//! Converts record-oriented tables between JSON, CSV and XLSX through one
//! canonical in-memory [`TabularData`], from the library, the `tabconv` CLI,
//! or a small HTTP upload service.

pub mod cli;
pub mod conversion;
pub mod error;
pub mod format;
pub mod formatter;
pub mod parser;
pub mod server;
pub mod table;

// Re-export commonly used types
pub use conversion::{
    convert_named, ConversionConfig, ConversionEngine, ConversionRequest, ConversionResult,
    ConvertedData,
};
pub use error::{ConversionError, ParseError};
pub use format::Format;
pub use parser::InputSource;
pub use table::{TabularData, Value};

/// Convert bytes between two named formats with default configuration
pub fn convert(input: &[u8], input_format: &str, output_format: &str) -> ConversionResult<Vec<u8>> {
    let config = ConversionConfig::default();
    Ok(convert_named(input, input_format, output_format, &config)?.into_bytes())
}

/// Read bytes in the named format into a table with default configuration
pub fn read_table(input: &[u8], format: &str) -> ConversionResult<TabularData> {
    ConversionEngine::default().read(input, Format::from_name(format)?)
}

/// Write a table in the named format with default configuration
pub fn write_table(table: &TabularData, format: &str) -> ConversionResult<Vec<u8>> {
    ConversionEngine::default().write(table, Format::from_name(format)?)
}
