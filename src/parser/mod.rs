//! Format readers and input sources

pub mod csv;
pub mod directory;
pub mod filter;
pub mod json;
pub mod xlsx;

use std::io::Read;
use std::path::PathBuf;

use crate::error::{ConversionError, ConversionResult};
use crate::format::Format;

/// Where input bytes come from
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// Raw bytes already in memory (e.g. an upload)
    Bytes(Vec<u8>),
    /// Text given on the command line
    String(String),
    /// Single file path
    File(PathBuf),
    /// Directory containing multiple convertible files
    Directory(PathBuf),
    /// Standard input stream
    Stdin,
}

impl InputSource {
    /// Get a human-readable description of the source
    pub fn description(&self) -> String {
        match self {
            InputSource::Bytes(bytes) => format!("{} bytes of input", bytes.len()),
            InputSource::String(_) => "string input".to_string(),
            InputSource::File(path) => format!("file: {}", path.display()),
            InputSource::Directory(path) => format!("directory: {}", path.display()),
            InputSource::Stdin => "standard input".to_string(),
        }
    }

    /// Get the size of the source in bytes, if known without reading it
    pub fn estimated_size(&self) -> Option<u64> {
        match self {
            InputSource::Bytes(bytes) => Some(bytes.len() as u64),
            InputSource::String(s) => Some(s.len() as u64),
            InputSource::File(path) => std::fs::metadata(path).ok().map(|m| m.len()),
            InputSource::Directory(_) | InputSource::Stdin => None,
        }
    }

    /// Format implied by the source itself (file extension)
    pub fn format_hint(&self) -> Option<Format> {
        match self {
            InputSource::File(path) => Format::from_path(path),
            _ => None,
        }
    }

    /// Read the full content of the source, refusing more than `limit` bytes
    ///
    /// Streams are read through a `limit + 1` window, so an oversized stdin
    /// fails without being buffered whole.
    pub fn read_bytes(&self, limit: usize) -> ConversionResult<Vec<u8>> {
        match self {
            InputSource::Bytes(bytes) => Ok(bytes.clone()),
            InputSource::String(s) => Ok(s.as_bytes().to_vec()),
            InputSource::File(path) => {
                std::fs::read(path).map_err(|e| ConversionError::io(e, Some(path.clone())))
            }
            InputSource::Stdin => read_limited(std::io::stdin().lock(), limit),
            InputSource::Directory(path) => Err(ConversionError::configuration(format!(
                "cannot read directory {} as a single input",
                path.display()
            ))),
        }
    }
}

fn read_limited(reader: impl Read, limit: usize) -> ConversionResult<Vec<u8>> {
    let mut buffer = Vec::new();
    reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| ConversionError::io(e, None))?;

    if buffer.len() > limit {
        return Err(ConversionError::InputTooLarge {
            size: buffer.len(),
            limit,
        });
    }
    Ok(buffer)
}
