use std::borrow::Borrow;

use tracing::warn;

use crate::conversion::engine::{ConversionEngine, ConversionMetadata, ConvertedData};
use crate::conversion::stats::ConversionStatistics;
use crate::conversion::{ConversionConfig, ConversionResult};
use crate::error::ConversionError;
use crate::format::Format;
use crate::parser::InputSource;

/// Delivered and failed inputs of a batch run
///
/// `T` is whatever the delivery step kept for a converted input: the
/// converted data itself, or just its metadata once the bytes are written.
#[derive(Debug)]
pub struct BatchOutcome<T = ConvertedData> {
    pub converted: Vec<(InputSource, T)>,
    pub failed: Vec<(InputSource, ConversionError)>,
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            converted: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchOutcome<T> {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

impl<T: Borrow<ConversionMetadata>> BatchOutcome<T> {
    pub fn statistics(&self) -> ConversionStatistics {
        let mut stats = ConversionStatistics::new();
        for (_, item) in &self.converted {
            stats.record(item.borrow());
        }
        for _ in &self.failed {
            stats.record_failure();
        }
        stats
    }
}

impl Borrow<ConversionMetadata> for ConvertedData {
    fn borrow(&self) -> &ConversionMetadata {
        &self.metadata
    }
}

/// Batch convert multiple inputs, keeping every result in memory
///
/// `input_format` applies to every source; when absent each source's extension decides.
pub fn convert_batch(
    sources: Vec<InputSource>,
    input_format: Option<Format>,
    output_format: Format,
    config: &ConversionConfig,
    continue_on_error: bool,
) -> ConversionResult<BatchOutcome> {
    let engine = ConversionEngine::new(config.clone());
    convert_batch_with(
        &engine,
        sources,
        input_format,
        output_format,
        continue_on_error,
        |_, result| result,
    )
}

/// Batch convert, handing each result to `deliver` as soon as it is ready
///
/// `deliver` sees failures too and may turn a success into a failure (a
/// write error, say). Without `continue_on_error` the first failure it
/// returns ends the run.
pub fn convert_batch_with<T, F>(
    engine: &ConversionEngine,
    sources: Vec<InputSource>,
    input_format: Option<Format>,
    output_format: Format,
    continue_on_error: bool,
    mut deliver: F,
) -> ConversionResult<BatchOutcome<T>>
where
    F: FnMut(&InputSource, ConversionResult<ConvertedData>) -> ConversionResult<T>,
{
    let mut outcome = BatchOutcome::default();

    for src in sources {
        let result = engine.convert_source(&src, input_format, output_format);
        match deliver(&src, result) {
            Ok(item) => outcome.converted.push((src, item)),
            Err(e) if continue_on_error => {
                warn!(source = %src.description(), error = %e, "conversion failed, continuing");
                outcome.failed.push((src, e));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(outcome)
}
