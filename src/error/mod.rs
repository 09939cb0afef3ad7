//! Error types for reading, writing and converting tabular data

use std::fmt;
use std::path::PathBuf;

use crate::format::Format;

/// Main error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Input bytes don't parse as the declared format
    #[error("Malformed {format} input: {source}")]
    MalformedInput { format: Format, source: ParseError },

    /// A record does not carry one value per declared column
    #[error("Schema mismatch in row {row}: expected {expected} fields, found {found}")]
    SchemaMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unsupported format '{name}' (expected json, csv or xlsx)")]
    UnsupportedFormat { name: String },

    #[error("Input too large: {size} bytes (limit: {limit} bytes)")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Data is empty after processing")]
    EmptyData,

    #[error("Failed to write {format} output: {message}")]
    Write { format: Format, message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },
}

impl ConversionError {
    pub fn malformed(format: Format, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            format,
            source: ParseError::new(message.into(), None),
        }
    }

    pub fn malformed_with(format: Format, source: ParseError) -> Self {
        Self::MalformedInput { format, source }
    }

    pub fn unsupported(name: impl Into<String>) -> Self {
        Self::UnsupportedFormat { name: name.into() }
    }

    pub fn write(format: Format, message: impl fmt::Display) -> Self {
        Self::Write {
            format,
            message: message.to_string(),
        }
    }

    pub fn io(error: std::io::Error, path: Option<PathBuf>) -> Self {
        let message = match &path {
            Some(p) => format!("{}: {}", p.display(), error),
            None => error.to_string(),
        };
        Self::Io { message, path }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Stable identifier for the error category
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "malformed_input",
            Self::SchemaMismatch { .. } => "schema_mismatch",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::InputTooLarge { .. } => "input_too_large",
            Self::EmptyData => "empty_data",
            Self::Write { .. } => "write_failed",
            Self::Io { .. } => "io",
            Self::Configuration { .. } => "configuration",
        }
    }

    /// True when the failure was caused by the caller's input rather than the host
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedInput { format, source } => {
                let mut message = match source.location {
                    Some((line, col)) => format!(
                        "{} parse error at line {}, column {}: {}",
                        format.label(),
                        line,
                        col,
                        source.message
                    ),
                    None => format!("{} parse error: {}", format.label(), source.message),
                };
                if let Some(preview) = &source.input_preview {
                    message.push('\n');
                    message.push_str(preview);
                }
                message
            }
            Self::SchemaMismatch {
                row,
                expected,
                found,
            } => format!(
                "Row {} has {} fields but the header declares {} columns",
                row, found, expected
            ),
            Self::InputTooLarge { size, limit } => {
                format!("Input too large: {} bytes (limit: {} bytes)", size, limit)
            }
            Self::EmptyData => "Data is empty after processing.".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Parse failure details attached to malformed input
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub location: Option<(usize, usize)>,
    pub input_preview: Option<String>,
}

impl ParseError {
    pub fn new(message: String, location: Option<(usize, usize)>) -> Self {
        Self {
            message,
            location,
            input_preview: None,
        }
    }

    pub fn with_preview(mut self, preview: String) -> Self {
        self.input_preview = Some(preview);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some((line, col)) = self.location {
            write!(f, " at line {}, column {}", line, col)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;
