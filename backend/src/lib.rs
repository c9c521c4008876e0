//! # Claims Report - city-level rejection analysis for insurance claims
//!
//! Reads a comma-delimited claims export, cleans and types every row,
//! classifies rejection remarks and ranks the branch cities to suggest one
//! for closure.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV File   │────▶│   Parser    │────▶│  Normalize  │────▶│  Classify   │────▶│  Aggregate  │
//! │ (UTF8/Lat1) │     │ (quotes)    │     │ (typed)     │     │ (reasons)   │     │ (cities)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use claimsreport::{render_report, run_report};
//! use std::path::Path;
//!
//! let report = run_report(Path::new("Insurance_auto_data.csv")).unwrap();
//! println!("{}", render_report(&report));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Records, typed values and diagnostics
//! - [`parser`] - CSV reading with encoding detection
//! - [`transform`] - Normalization, classification, aggregation and pipeline
//! - [`report`] - Text rendering, JSON summary and the output sink
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod report;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, PipelineError, SinkError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ClassifiedRecord,
    CleanRecord,
    Diagnostics,
    DroppedRow,
    FieldIssue,
    FieldValue,
    PaymentStatus,
    RawRecord,
    RejectionClass,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_encoding,
    parse_bytes,
    parse_file,
    parse_str,
    split_line,
    ParseResult,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    add_rejection_class,
    city_analysis,
    classify_rejection,
    clean_data,
    normalize_record,
    reason_tally,
    CityAnalysis,
    CityStats,
    CITY_ALLOW_LIST,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    analyze,
    report_bytes,
    run_report,
    ClaimsReport,
    CsvInfo,
    ReportOptions,
    SaveMode,
};

// =============================================================================
// Re-exports - Report
// =============================================================================

pub use report::{
    render_city_table,
    render_reasons,
    render_recommendation,
    render_report,
    CsvFileSink,
    ReportSink,
    ReportSummary,
};
