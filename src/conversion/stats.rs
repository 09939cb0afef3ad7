//! Statistics for conversion operations

use serde::{Deserialize, Serialize};

use crate::conversion::engine::ConversionMetadata;

/// Aggregate statistics across one or more conversions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStatistics {
    /// Input size in bytes
    pub input_size_bytes: u64,
    /// Output size in bytes
    pub output_size_bytes: u64,
    /// Number of data rows converted
    pub row_count: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Number of files converted successfully
    pub file_count: usize,
    /// Number of inputs that failed to convert
    pub failed_count: usize,
    /// Throughput (bytes processed per second)
    pub throughput_bytes_per_sec: f32,
    /// Timestamp of when statistics were collected
    pub collected_at: chrono::DateTime<chrono::Utc>,
}

impl Default for ConversionStatistics {
    fn default() -> Self {
        Self {
            input_size_bytes: 0,
            output_size_bytes: 0,
            row_count: 0,
            processing_time_ms: 0,
            file_count: 0,
            failed_count: 0,
            throughput_bytes_per_sec: 0.0,
            collected_at: chrono::Utc::now(),
        }
    }
}

impl ConversionStatistics {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Create statistics for a single conversion
    pub fn for_conversion(metadata: &ConversionMetadata) -> Self {
        let mut stats = Self {
            input_size_bytes: metadata.input_size,
            output_size_bytes: metadata.output_size,
            row_count: metadata.row_count,
            processing_time_ms: metadata.processing_time_ms,
            file_count: 1,
            ..Self::default()
        };
        stats.refresh();
        stats
    }

    /// Add one successful conversion
    pub fn record(&mut self, metadata: &ConversionMetadata) {
        self.combine(&Self::for_conversion(metadata));
    }

    /// Add one failed conversion
    pub fn record_failure(&mut self) {
        self.failed_count += 1;
        self.collected_at = chrono::Utc::now();
    }

    /// Combine statistics from multiple operations
    pub fn combine(&mut self, other: &Self) {
        self.input_size_bytes += other.input_size_bytes;
        self.output_size_bytes += other.output_size_bytes;
        self.row_count += other.row_count;
        self.processing_time_ms += other.processing_time_ms;
        self.file_count += other.file_count;
        self.failed_count += other.failed_count;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.throughput_bytes_per_sec = if self.processing_time_ms > 0 {
            self.input_size_bytes as f32 / (self.processing_time_ms as f32 / 1000.0)
        } else {
            0.0
        };
        self.collected_at = chrono::Utc::now();
    }

    /// Get a formatted summary
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Converted {} files ({} rows) in {:.1}s - {} bytes in, {} bytes out",
            self.file_count,
            self.row_count,
            self.processing_time_ms as f32 / 1000.0,
            self.input_size_bytes,
            self.output_size_bytes
        );
        if self.failed_count > 0 {
            summary.push_str(&format!(", {} failed", self.failed_count));
        }
        summary
    }

    /// Export to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Import from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
