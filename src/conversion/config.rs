//! Configuration options for tabular conversion

use std::fmt;
use std::str::FromStr;

/// Field delimiter for delimited text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelimiterType {
    /// Comma delimiter (,)
    #[default]
    Comma,
    /// Tab delimiter (\\t)
    Tab,
    /// Semicolon delimiter (;)
    Semicolon,
    /// Pipe delimiter (|)
    Pipe,
}

impl DelimiterType {
    pub fn as_byte(&self) -> u8 {
        match self {
            DelimiterType::Comma => b',',
            DelimiterType::Tab => b'\t',
            DelimiterType::Semicolon => b';',
            DelimiterType::Pipe => b'|',
        }
    }
}

impl FromStr for DelimiterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comma" | "," => Ok(DelimiterType::Comma),
            "tab" | "\t" => Ok(DelimiterType::Tab),
            "semicolon" | ";" => Ok(DelimiterType::Semicolon),
            "pipe" | "|" => Ok(DelimiterType::Pipe),
            other => Err(format!(
                "Invalid delimiter '{}'. Use 'comma', 'tab', 'semicolon', or 'pipe'",
                other
            )),
        }
    }
}

/// Which worksheet to read from a workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    /// Zero-based sheet position
    Index(usize),
    /// Sheet name
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

/// All-digit input selects by position, anything else by name
impl FromStr for SheetSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Sheet selector must not be empty".to_string());
        }
        Ok(match s.parse::<usize>() {
            Ok(index) => SheetSelector::Index(index),
            Err(_) => SheetSelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(index) => write!(f, "sheet #{}", index),
            SheetSelector::Name(name) => write!(f, "sheet '{}'", name),
        }
    }
}

/// Characters Excel refuses in worksheet names
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Default input size limit for command line use
pub const DEFAULT_MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;

/// Default input size limit for uploads
pub const UPLOAD_MAX_INPUT_SIZE: usize = 16 * 1024 * 1024;

/// Conversion configuration options
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Field delimiter for CSV input and output
    pub delimiter: DelimiterType,
    /// Spaces per indentation level for JSON output (0 = compact)
    pub indent_size: u8,
    /// Turn numeric/boolean text into typed values after reading
    pub infer_types: bool,
    /// Drop all-empty rows and columns after reading
    pub prune_empty: bool,
    /// Worksheet to read from XLSX input
    pub sheet: SheetSelector,
    /// Worksheet name for XLSX output
    pub sheet_name: String,
    /// Maximum input size in bytes
    pub max_input_size: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            delimiter: DelimiterType::Comma,
            indent_size: 4,
            infer_types: false,
            prune_empty: false,
            sheet: SheetSelector::default(),
            sheet_name: "Sheet1".to_string(),
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }
}

impl ConversionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration for the upload service
    pub fn upload() -> Self {
        Self {
            max_input_size: UPLOAD_MAX_INPUT_SIZE,
            ..Default::default()
        }
    }

    /// Set field delimiter
    pub fn with_delimiter(mut self, delimiter: DelimiterType) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set JSON indentation size
    pub fn with_indent_size(mut self, size: u8) -> Result<Self, String> {
        if size > 8 {
            return Err("Indent size must be 0-8 spaces".to_string());
        }
        self.indent_size = size;
        Ok(self)
    }

    /// Enable/disable scalar type inference
    pub fn with_infer_types(mut self, enabled: bool) -> Self {
        self.infer_types = enabled;
        self
    }

    /// Enable/disable dropping empty rows and columns
    pub fn with_prune_empty(mut self, enabled: bool) -> Self {
        self.prune_empty = enabled;
        self
    }

    /// Select the worksheet to read
    pub fn with_sheet(mut self, sheet: SheetSelector) -> Self {
        self.sheet = sheet;
        self
    }

    /// Set the worksheet name used for XLSX output
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set input size limit
    pub fn with_max_input_size(mut self, limit_bytes: usize) -> Self {
        self.max_input_size = limit_bytes;
        self
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.indent_size > 8 {
            return Err("Indent size must be 0-8 spaces".to_string());
        }

        if self.max_input_size == 0 {
            return Err("Input size limit must be greater than 0".to_string());
        }

        let name = self.sheet_name.as_str();
        if name.trim().is_empty() {
            return Err("Sheet name must not be empty".to_string());
        }
        if name.chars().count() > 31 {
            return Err("Sheet name must be at most 31 characters".to_string());
        }
        if name.contains(INVALID_SHEET_CHARS) || name.starts_with('\'') || name.ends_with('\'') {
            return Err(format!("Sheet name '{}' contains invalid characters", name));
        }

        Ok(())
    }
}
