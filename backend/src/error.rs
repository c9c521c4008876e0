//! Error types for the claims report pipeline.
//!
//! - [`CsvError`] - reading and decoding the claims export
//! - [`SinkError`] - writing the cleaned records back out
//! - [`PipelineError`] - top-level errors returned by the pipeline entry points
//!
//! Only unreadable input is fatal. Malformed rows and unparsable amounts are
//! recoverable and show up in [`crate::models::Diagnostics`] instead.

use thiserror::Error;

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors while reading the claims file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be decoded with the detected encoding.
    #[error("Failed to decode content: {0}")]
    Encoding(String),
}

// =============================================================================
// Report Sink Errors
// =============================================================================

/// Errors while persisting cleaned records.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to create or flush the output file.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Nothing to write, so no header can be derived.
    #[error("No cleaned records to save")]
    NoRecords,
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run_report`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Output could not be written.
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
