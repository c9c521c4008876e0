//! High-level pipeline API for the claims report.
//!
//! Combines every stage: reading, normalization, classification and city
//! aggregation. Persisting the cleaned rows is left to a
//! [`crate::report::ReportSink`].
//!
//! # Example
//!
//! ```rust,no_run
//! use claimsreport::{run_report, ReportOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ReportOptions::from_env();
//!     let report = run_report(&options.input)?;
//!
//!     println!("Suggest closing: {:?}", report.analysis.recommendation());
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use super::aggregate::{city_analysis, CityAnalysis};
use super::classify::{add_rejection_class, reason_tally};
use super::normalize::clean_data;
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning, log_warning_indent};
use crate::models::{ClassifiedRecord, Diagnostics, RejectionClass};
use crate::parser::{parse_bytes, parse_file, ParseResult};

/// Default claims export read when no input is given.
pub const DEFAULT_INPUT: &str = "Insurance_auto_data.csv";

/// Default location of the cleaned export.
pub const DEFAULT_OUTPUT: &str = "Cleaned_Insurance_Data.csv";

/// Environment variable overriding the input path.
pub const INPUT_ENV: &str = "CLAIMS_INPUT";

/// Environment variable overriding the output path.
pub const OUTPUT_ENV: &str = "CLAIMS_OUTPUT";

/// Diagnostics shown per category before the rest is summarised.
const MAX_LOGGED_DIAGNOSTICS: usize = 5;

/// Whether the cleaned records get saved after the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Ask on stdin
    #[default]
    Prompt,
    Always,
    Never,
}

/// Options for a report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Claims export to read
    pub input: PathBuf,

    /// Where cleaned records are written when saving
    pub output: PathBuf,

    pub save: SaveMode,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            save: SaveMode::Prompt,
        }
    }
}

impl ReportOptions {
    /// Defaults overridden by `CLAIMS_INPUT` / `CLAIMS_OUTPUT` when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            input: env::var_os(INPUT_ENV).map(PathBuf::from).unwrap_or(defaults.input),
            output: env::var_os(OUTPUT_ENV).map(PathBuf::from).unwrap_or(defaults.output),
            save: defaults.save,
        }
    }
}

/// CSV file information
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvInfo {
    pub encoding: String,
    pub headers: Vec<String>,
    /// Data lines read, including dropped ones
    pub row_count: usize,
}

/// Everything produced by one pipeline run
#[derive(Debug, Clone)]
pub struct ClaimsReport {
    /// Cleaned and classified rows, in file order
    pub records: Vec<ClassifiedRecord>,

    pub analysis: CityAnalysis,

    /// Rejection classes, most frequent first
    pub reasons: Vec<(RejectionClass, usize)>,

    pub diagnostics: Diagnostics,

    pub csv_info: CsvInfo,

    pub generated_at: DateTime<Utc>,
}

/// Run the full pipeline on a claims file.
///
/// Fails only when the file cannot be read.
pub fn run_report(path: &Path) -> PipelineResult<ClaimsReport> {
    log_info(format!("📖 Reading {}...", path.display()));
    let parse_result = parse_file(path)?;
    Ok(analyze(parse_result))
}

/// Same as [`run_report`] for in-memory content.
pub fn report_bytes(bytes: &[u8]) -> PipelineResult<ClaimsReport> {
    let parse_result = parse_bytes(bytes)?;
    Ok(analyze(parse_result))
}

/// Run the pure stages on an already parsed file.
pub fn analyze(parse_result: ParseResult) -> ClaimsReport {
    let ParseResult {
        records: raw,
        headers,
        encoding,
        dropped,
    } = parse_result;

    log_success(format!("Detected encoding: {}", encoding));
    log_success(format!(
        "Read {} rows ({} columns)",
        raw.len() + dropped.len(),
        headers.len()
    ));

    let csv_info = CsvInfo {
        encoding,
        headers,
        row_count: raw.len() + dropped.len(),
    };

    if !dropped.is_empty() {
        log_warning(format!("{} rows dropped (field count mismatch)", dropped.len()));
        for row in dropped.iter().take(MAX_LOGGED_DIAGNOSTICS) {
            log_warning_indent(
                format!("line {}: expected {} fields, found {}", row.line, row.expected, row.found),
                1,
            );
        }
    }

    log_info("🧹 Cleaning records...");
    let normalized = clean_data(&raw);
    if !normalized.issues.is_empty() {
        log_warning(format!("{} amount fields could not be parsed", normalized.issues.len()));
        for issue in normalized.issues.iter().take(MAX_LOGGED_DIAGNOSTICS) {
            log_warning_indent(
                format!("line {}, {} = '{}': {}", issue.line, issue.field, issue.raw, issue.reason),
                1,
            );
        }
    }

    log_info("🏷️  Classifying rejections...");
    let records = add_rejection_class(normalized.records);
    let reasons = reason_tally(&records);

    log_info("🏙️  Analyzing cities...");
    let analysis = city_analysis(&records);
    if analysis.is_empty() {
        log_warning("No allow-listed city found in the data");
    } else {
        for (city, stats) in analysis.stats() {
            log_info_indent(format!("{}: {} claims", city, stats.claims), 1);
        }
    }
    log_success(format!("{} records processed", records.len()));

    ClaimsReport {
        records,
        analysis,
        reasons,
        diagnostics: Diagnostics {
            dropped_rows: dropped,
            field_issues: normalized.issues,
        },
        csv_info,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentStatus;

    const SAMPLE: &str = "\
CLAIM_ID,CITY,CLAIM_AMOUNT,PREMIUM_COLLECTED,PAID_AMOUNT,REJECTION_REMARKS
1,Pune,1000,2000,0,policy expired
2, pune ,500,2000,500,
3,Mumbai,100,100,0,Rejected: fake document
4,Ranchi,abc,1000,NA,
5,Ranchi,1,2
";

    #[test]
    fn test_default_options() {
        let opts = ReportOptions::default();
        assert_eq!(opts.input, PathBuf::from("Insurance_auto_data.csv"));
        assert_eq!(opts.output, PathBuf::from("Cleaned_Insurance_Data.csv"));
        assert_eq!(opts.save, SaveMode::Prompt);
    }

    #[test]
    fn test_report_bytes() {
        let report = report_bytes(SAMPLE.as_bytes()).unwrap();

        assert_eq!(report.records.len(), 4);
        assert_eq!(report.csv_info.row_count, 5);
        assert_eq!(report.diagnostics.dropped_rows.len(), 1);
        assert_eq!(report.diagnostics.dropped_rows[0].line, 6);
        assert_eq!(report.diagnostics.field_issues.len(), 1);
        assert_eq!(report.diagnostics.field_issues[0].field, "CLAIM_AMOUNT");

        let pune = report.analysis.get("Pune").unwrap();
        assert_eq!(pune.claims, 2);
        assert_eq!(pune.rejections, 1);
        assert_eq!(pune.loss_pct(), 12.5);

        assert_eq!(report.records[2].record.payment_status, PaymentStatus::Rejected);
        assert_eq!(report.records[2].rejection_class, RejectionClass::FakeDocument);
        assert_eq!(report.analysis.recommendation(), Some("Pune"));
    }

    #[test]
    fn test_reasons_counted_for_all_cities() {
        let report = report_bytes(SAMPLE.as_bytes()).unwrap();
        let total: usize = report.reasons.iter().map(|(_, n)| n).sum();

        assert_eq!(total, report.records.len());
        assert_eq!(report.reasons[0], (RejectionClass::NoRemark, 2));
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        let report = report_bytes(b"").unwrap();

        assert!(report.records.is_empty());
        assert!(report.csv_info.headers.is_empty());
        assert!(report.diagnostics.is_clean());
        assert!(report.analysis.is_empty());
        assert_eq!(report.analysis.recommendation(), None);
        assert!(report.reasons.is_empty());
    }

    #[test]
    fn test_non_ascii_city_still_counted() {
        // Trailing no-break space on the first Pune.
        let csv = "CITY,CLAIM_AMOUNT,PREMIUM_COLLECTED,PAID_AMOUNT,REJECTION_REMARKS\n\
                   Pune\u{a0},100,200,0,denied\n\
                   Pune,100,200,100,\n";
        let report = report_bytes(csv.as_bytes()).unwrap();

        assert_eq!(report.csv_info.encoding, "utf-8");
        let pune = report.analysis.get("Pune").unwrap();
        assert_eq!(pune.claims, 2);
        assert_eq!(pune.rejections, 1);
    }

    #[test]
    fn test_non_ascii_text_unchanged() {
        let csv = "CLAIM_ID,CITY,PAID_AMOUNT,REJECTION_REMARKS\n1,Püne,0,Rejected – policy expired\n";
        let report = report_bytes(csv.as_bytes()).unwrap();
        let record = &report.records[0];

        assert_eq!(record.record.city(), Some("Püne"));
        assert_eq!(record.record.rejection_remarks(), Some("Rejected – policy expired"));
        assert_eq!(record.rejection_class, RejectionClass::PolicyExpired);
    }
}
