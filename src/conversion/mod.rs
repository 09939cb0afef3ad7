//! Tabular conversion module
//!
//! This module contains the conversion orchestrator, configuration, limits and statistics.

pub mod batch;
pub mod config;
pub mod engine;
pub mod limits;
pub mod stats;

pub use config::{ConversionConfig, DelimiterType, SheetSelector};

pub use engine::{
    convert_from_source, convert_named, ConversionEngine, ConversionMetadata, ConversionRequest,
    ConvertedData,
};

pub use crate::error::ConversionResult;
