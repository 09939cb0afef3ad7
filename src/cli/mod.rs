//! Command-line interface module

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::conversion::config::{
    DelimiterType, SheetSelector, DEFAULT_MAX_INPUT_SIZE, UPLOAD_MAX_INPUT_SIZE,
};
use crate::conversion::{ConversionConfig, ConversionResult};
use crate::error::ConversionError;
use crate::format::Format;

pub mod path_mapping;

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "tabconv")]
#[command(about = "Convert tabular data between JSON, CSV and XLSX")]
#[command(version)]
#[command(long_about = None)]
pub struct Args {
    /// Input source (file, directory, or inline JSON)
    #[arg()]
    pub input: Option<String>,

    /// Output file or directory (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Input format: json, csv or xlsx (default: input file extension)
    #[arg(long, value_name = "FORMAT")]
    pub from: Option<String>,

    /// Output format: json, csv or xlsx (default: output file extension, else json)
    #[arg(long, value_name = "FORMAT")]
    pub to: Option<String>,

    /// Read input from standard input
    #[arg(long)]
    pub stdin: bool,

    /// Recursively process directories
    #[arg(long)]
    pub recursive: bool,

    /// CSV field delimiter (default: comma)
    #[arg(long)]
    pub delimiter: Option<Delimiter>,

    /// Spaces per JSON indentation level (0-8, 0 is compact, default: 4)
    #[arg(long)]
    pub indent: Option<u8>,

    /// Turn numeric, boolean and empty text cells into typed values
    #[arg(long)]
    pub infer_types: bool,

    /// Drop rows and columns that hold no data
    #[arg(long)]
    pub prune_empty: bool,

    /// Worksheet to read from XLSX input, by name or zero-based index
    #[arg(long, value_name = "NAME|INDEX")]
    pub sheet: Option<String>,

    /// Worksheet name for XLSX output (default: Sheet1)
    #[arg(long)]
    pub sheet_name: Option<String>,

    /// Maximum input size (e.g., 100MB, default: 100MB)
    #[arg(long)]
    pub max_input_size: Option<String>,

    /// Only parse the input and report its shape, don't convert
    #[arg(long)]
    pub validate_only: bool,

    /// Output conversion statistics
    #[arg(long)]
    pub stats: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,

    /// Continue converting other files when one file fails
    #[arg(long)]
    pub continue_on_error: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP conversion service
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: String,
        /// Maximum upload size (e.g., 16MB, default: 16MB)
        #[arg(long)]
        max_upload_size: Option<String>,
    },
}

/// Delimiter types for CLI
#[derive(ValueEnum, Debug, Clone)]
pub enum Delimiter {
    #[value(name = "comma", alias = ",")]
    Comma,
    #[value(name = "tab", alias = "\t")]
    Tab,
    #[value(name = "semicolon", alias = ";")]
    Semicolon,
    #[value(name = "pipe", alias = "|")]
    Pipe,
}

impl From<Delimiter> for DelimiterType {
    fn from(delimiter: Delimiter) -> Self {
        match delimiter {
            Delimiter::Comma => DelimiterType::Comma,
            Delimiter::Tab => DelimiterType::Tab,
            Delimiter::Semicolon => DelimiterType::Semicolon,
            Delimiter::Pipe => DelimiterType::Pipe,
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub args: Args,
    pub conversion_config: ConversionConfig,
}

impl CliConfig {
    /// Create CLI configuration from arguments
    pub fn from_args(args: Args) -> ConversionResult<Self> {
        let conversion_config = Self::create_conversion_config(&args)?;

        Ok(Self {
            args,
            conversion_config,
        })
    }

    pub fn continue_on_error(&self) -> bool {
        self.args.continue_on_error
    }

    /// Create conversion configuration from CLI arguments
    fn create_conversion_config(args: &Args) -> ConversionResult<ConversionConfig> {
        let defaults = ConversionConfig::default();
        let delimiter = args
            .delimiter
            .as_ref()
            .map(|d| d.clone().into())
            .unwrap_or(DelimiterType::Comma);
        let sheet = match &args.sheet {
            Some(sheet) => sheet
                .parse::<SheetSelector>()
                .map_err(ConversionError::configuration)?,
            None => SheetSelector::default(),
        };

        let config = ConversionConfig {
            delimiter,
            indent_size: args.indent.unwrap_or(defaults.indent_size),
            infer_types: args.infer_types,
            prune_empty: args.prune_empty,
            sheet,
            sheet_name: args.sheet_name.clone().unwrap_or(defaults.sheet_name),
            max_input_size: parse_size(&args.max_input_size, DEFAULT_MAX_INPUT_SIZE)?,
        };

        config.validate().map_err(ConversionError::configuration)?;

        Ok(config)
    }

    /// Configuration for the HTTP service: the shared options plus the upload limit
    pub fn server_config(&self, max_upload_size: &Option<String>) -> ConversionResult<ConversionConfig> {
        let limit = parse_size(max_upload_size, UPLOAD_MAX_INPUT_SIZE)?;
        let config = self.conversion_config.clone().with_max_input_size(limit);
        config.validate().map_err(ConversionError::configuration)?;
        Ok(config)
    }

    /// Explicit input format, if one was given
    pub fn input_format(&self) -> ConversionResult<Option<Format>> {
        self.args.from.as_deref().map(Format::from_name).transpose()
    }

    /// Output format for a single conversion: `--to`, the output extension, then JSON
    pub fn output_format(&self) -> ConversionResult<Format> {
        if let Some(name) = &self.args.to {
            return Format::from_name(name);
        }
        Ok(self
            .args
            .output
            .as_deref()
            .and_then(Format::from_path)
            .unwrap_or(Format::Json))
    }

    /// Output format for a directory conversion, which needs `--to`
    pub fn directory_output_format(&self) -> ConversionResult<Format> {
        match &self.args.to {
            Some(name) => Format::from_name(name),
            None => Err(ConversionError::configuration(
                "--to is required when converting a directory",
            )),
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.args.quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.args.verbose
    }

    pub fn want_stats(&self) -> bool {
        self.args.stats
    }

    pub fn is_validate_only(&self) -> bool {
        self.args.validate_only
    }

    /// Default log filter for the selected verbosity
    pub fn log_level(&self) -> &'static str {
        if self.args.verbose {
            "debug"
        } else if self.args.quiet {
            "error"
        } else if matches!(self.args.command, Some(Commands::Serve { .. })) {
            "info"
        } else {
            "warn"
        }
    }

    pub fn input_description(&self) -> String {
        if self.args.stdin {
            "standard input".to_string()
        } else if let Some(input) = &self.args.input {
            format!("'{}'", input)
        } else {
            "no input specified".to_string()
        }
    }

    pub fn output_description(&self) -> String {
        if let Some(output) = &self.args.output {
            format!("'{}'", output.display())
        } else {
            "standard output".to_string()
        }
    }
}

/// Parse a size string (e.g., "100MB", "1GB", "500KB", "2048")
pub fn parse_size(limit: &Option<String>, default: usize) -> ConversionResult<usize> {
    let Some(limit_str) = limit else {
        return Ok(default);
    };
    let limit_str = limit_str.trim().to_uppercase();
    let invalid = || ConversionError::configuration(format!("Invalid size: {}", limit_str));

    let (number, multiplier) = if let Some(size) = limit_str.strip_suffix("GB") {
        (size, 1024.0 * 1024.0 * 1024.0)
    } else if let Some(size) = limit_str.strip_suffix("MB") {
        (size, 1024.0 * 1024.0)
    } else if let Some(size) = limit_str.strip_suffix("KB") {
        (size, 1024.0)
    } else if let Some(size) = limit_str.strip_suffix('B') {
        return size.trim().parse::<usize>().map_err(|_| invalid());
    } else {
        return limit_str.parse::<usize>().map_err(|_| invalid());
    };

    let value = number.trim().parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok((value * multiplier) as usize)
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Format a file size in human-readable format
    pub fn format_file_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }

    /// Create a progress bar for file processing
    pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
        let pb = indicatif::ProgressBar::new(total);
        let style = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("✓ {}", message);
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Show a warning message (if not in quiet mode)
    pub fn show_warning(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("⚠ {}", message);
        }
    }
}

/// Suggestion printed after an error, if one applies
pub fn error_tip(error: &ConversionError) -> Option<&'static str> {
    match error {
        ConversionError::MalformedInput { .. } => {
            Some("Use --validate-only to check the input before conversion, or --from to set its format")
        }
        ConversionError::SchemaMismatch { .. } => {
            Some("Check that --delimiter matches the separator used in the file")
        }
        ConversionError::UnsupportedFormat { .. } => Some("Supported formats are json, csv and xlsx"),
        ConversionError::InputTooLarge { .. } => {
            Some("Use --max-input-size to raise the input size limit")
        }
        ConversionError::EmptyData => Some("Run without --prune-empty to keep blank rows and columns"),
        _ => None,
    }
}

/// Handle CLI errors with user-friendly messages
pub fn handle_error(error: &ConversionError) {
    CliUtils::show_error(&error.user_message());

    if let Some(tip) = error_tip(error) {
        eprintln!("\nTip: {}", tip);
    }

    eprintln!("\nTry 'tabconv --help' for usage information.");
}
