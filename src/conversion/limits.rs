use crate::conversion::config::ConversionConfig;
use crate::error::{ConversionError, ConversionResult};
use crate::parser::InputSource;

/// Check the source size before attempting to read it.
/// This avoids loading very large files into memory if the user-configured
/// limit is smaller than the file.
pub fn check_source_size_before_read(
    source: &InputSource,
    config: &ConversionConfig,
) -> ConversionResult<()> {
    if let Some(size) = source.estimated_size() {
        check_input_size(size as usize, config)?;
    }

    Ok(())
}

/// Check the size of input bytes already in memory
pub fn check_input_size(size: usize, config: &ConversionConfig) -> ConversionResult<()> {
    if size > config.max_input_size {
        return Err(ConversionError::InputTooLarge {
            size,
            limit: config.max_input_size,
        });
    }

    Ok(())
}
