//! Core conversion engine: read, normalize, write

use std::time::Instant;

use tracing::{debug, info};

use crate::conversion::config::ConversionConfig;
use crate::conversion::limits;
use crate::conversion::ConversionResult;
use crate::error::ConversionError;
use crate::format::Format;
use crate::parser::InputSource;
use crate::table::{infer, TabularData};

/// Input bytes paired with the formats to convert between
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    input: Vec<u8>,
    input_format: Format,
    output_format: Format,
}

impl ConversionRequest {
    pub fn new(input: Vec<u8>, input_format: Format, output_format: Format) -> Self {
        Self {
            input,
            input_format,
            output_format,
        }
    }

    /// Build a request from user-supplied format names
    pub fn from_names(
        input: Vec<u8>,
        input_format: &str,
        output_format: &str,
    ) -> ConversionResult<Self> {
        Ok(Self::new(
            input,
            Format::from_name(input_format)?,
            Format::from_name(output_format)?,
        ))
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }

    pub fn input_format(&self) -> Format {
        self.input_format
    }

    pub fn output_format(&self) -> Format {
        self.output_format
    }
}

/// Core conversion result
#[derive(Debug, Clone)]
pub struct ConvertedData {
    pub content: Vec<u8>,
    pub format: Format,
    pub metadata: ConversionMetadata,
}

impl ConvertedData {
    /// Create a new conversion result
    pub fn new(content: Vec<u8>, format: Format, metadata: ConversionMetadata) -> Self {
        Self {
            content,
            format,
            metadata,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.content
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Get the length of the output in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the output is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Metadata about the conversion process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionMetadata {
    pub input_size: u64,
    pub output_size: u64,
    pub row_count: usize,
    pub column_count: usize,
    pub processing_time_ms: u64,
}

/// Main conversion engine
#[derive(Debug, Clone, Default)]
pub struct ConversionEngine {
    config: ConversionConfig,
}

impl ConversionEngine {
    /// Create a new conversion engine
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Run a conversion request
    pub fn convert(&self, request: &ConversionRequest) -> ConversionResult<ConvertedData> {
        self.convert_bytes(request.input(), request.input_format(), request.output_format())
    }

    /// Convert bytes from one format to another
    pub fn convert_bytes(
        &self,
        input: &[u8],
        input_format: Format,
        output_format: Format,
    ) -> ConversionResult<ConvertedData> {
        let start_time = Instant::now();

        let table = self.read(input, input_format)?;
        let content = self.write(&table, output_format)?;

        let metadata = ConversionMetadata {
            input_size: input.len() as u64,
            output_size: content.len() as u64,
            row_count: table.row_count(),
            column_count: table.column_count(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            from = %input_format,
            to = %output_format,
            rows = metadata.row_count,
            columns = metadata.column_count,
            bytes_in = metadata.input_size,
            bytes_out = metadata.output_size,
            "converted table"
        );

        Ok(ConvertedData::new(content, output_format, metadata))
    }

    /// Convert input from a source; the input format falls back to the source's extension
    pub fn convert_source(
        &self,
        source: &InputSource,
        input_format: Option<Format>,
        output_format: Format,
    ) -> ConversionResult<ConvertedData> {
        let input_format = resolve_input_format(source, input_format)?;

        // Check source size before reading to avoid loading very large files
        limits::check_source_size_before_read(source, &self.config)?;

        let bytes = source.read_bytes(self.config.max_input_size)?;
        self.convert_bytes(&bytes, input_format, output_format)
    }

    /// Read a source into a table without writing any output
    pub fn read_source(
        &self,
        source: &InputSource,
        input_format: Option<Format>,
    ) -> ConversionResult<TabularData> {
        let input_format = resolve_input_format(source, input_format)?;
        limits::check_source_size_before_read(source, &self.config)?;

        let bytes = source.read_bytes(self.config.max_input_size)?;
        self.read(&bytes, input_format)
    }

    /// Read bytes into a table, applying inference and pruning per configuration
    pub fn read(&self, input: &[u8], format: Format) -> ConversionResult<TabularData> {
        limits::check_input_size(input.len(), &self.config)?;

        let mut table = format.read(input, &self.config)?;
        debug!(
            format = %format,
            rows = table.row_count(),
            columns = table.column_count(),
            "read table"
        );

        if self.config.infer_types {
            infer::infer_types(&mut table);
        }

        if self.config.prune_empty {
            table.prune_empty();
            if table.is_empty() || table.column_count() == 0 {
                return Err(ConversionError::EmptyData);
            }
        }

        Ok(table)
    }

    /// Write a table in the given format
    pub fn write(&self, table: &TabularData, format: Format) -> ConversionResult<Vec<u8>> {
        format.write(table, &self.config)
    }
}

fn resolve_input_format(source: &InputSource, explicit: Option<Format>) -> ConversionResult<Format> {
    explicit.or_else(|| source.format_hint()).ok_or_else(|| {
        ConversionError::configuration(format!(
            "cannot determine input format of {}; specify it explicitly",
            source.description()
        ))
    })
}

/// Convert bytes between two named formats
pub fn convert_named(
    input: &[u8],
    input_format: &str,
    output_format: &str,
    config: &ConversionConfig,
) -> ConversionResult<ConvertedData> {
    let input_format = Format::from_name(input_format)?;
    let output_format = Format::from_name(output_format)?;
    let engine = ConversionEngine::new(config.clone());
    engine.convert_bytes(input, input_format, output_format)
}

/// Convert input from a source
pub fn convert_from_source(
    source: &InputSource,
    input_format: Option<Format>,
    output_format: Format,
    config: &ConversionConfig,
) -> ConversionResult<ConvertedData> {
    let engine = ConversionEngine::new(config.clone());
    engine.convert_source(source, input_format, output_format)
}
