//! Supported interchange formats
//!
//! [`Format`] is a closed set of backends. Each variant knows how to read
//! bytes into a [`TabularData`] and how to write one back out, so callers
//! select behavior with the tag instead of matching on extension strings.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conversion::ConversionConfig;
use crate::error::{ConversionError, ConversionResult};
use crate::table::TabularData;
use crate::{formatter, parser};

/// Tabular file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Csv,
    Xlsx,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Csv, Format::Xlsx];

    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
            Format::Xlsx => "xlsx",
        }
    }

    /// Display label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Csv => "CSV",
            Format::Xlsx => "XLSX",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.name()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Csv => "text/csv",
            Format::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Binary formats can't be printed to a terminal or pasted as text
    pub fn is_binary(&self) -> bool {
        matches!(self, Format::Xlsx)
    }

    /// Parse a user-supplied format name
    ///
    /// Names are case-insensitive; `excel` and `xls` are accepted for XLSX.
    pub fn from_name(name: &str) -> ConversionResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            "xlsx" | "xls" | "excel" => Ok(Format::Xlsx),
            _ => Err(ConversionError::unsupported(name)),
        }
    }

    /// Match a file extension; only canonical extensions count
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| extension.eq_ignore_ascii_case(format.extension()))
    }

    /// Detect the format of a path from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Read bytes in this format into a table
    pub fn read(&self, bytes: &[u8], config: &ConversionConfig) -> ConversionResult<TabularData> {
        match self {
            Format::Json => parser::json::read(bytes),
            Format::Csv => parser::csv::read(bytes, config.delimiter),
            Format::Xlsx => parser::xlsx::read(bytes, &config.sheet),
        }
    }

    /// Write a table in this format
    pub fn write(&self, table: &TabularData, config: &ConversionConfig) -> ConversionResult<Vec<u8>> {
        match self {
            Format::Json => formatter::json::write(table, config.indent_size),
            Format::Csv => formatter::csv::write(table, config.delimiter),
            Format::Xlsx => formatter::xlsx::write(table, &config.sheet_name),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
