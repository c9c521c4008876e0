//! Report rendering and output.
//!
//! - Text rendering of the city table, closure line and rejection reasons
//! - [`ReportSummary`] for JSON output
//! - [`sink`] for saving the cleaned records

pub mod sink;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

use crate::models::RejectionClass;
use crate::transform::aggregate::CityAnalysis;
use crate::transform::pipeline::ClaimsReport;

pub use sink::{CsvFileSink, ReportSink};

/// Table header, aligned with the rows written by [`render_city_table`].
fn table_header() -> String {
    format!(
        "{:<10} {:<12} {:<12} {:<15} {:<15} {:<10}",
        "City", "Claims", "Rejected", "Rejection %", "Claim/Premium", "Loss %"
    )
}

/// Fixed-width table, one row per aggregated city.
pub fn render_city_table(analysis: &CityAnalysis) -> String {
    let mut out = table_header();
    out.push('\n');

    for (city, s) in analysis.stats() {
        let _ = writeln!(
            out,
            "{:<10} {:<12} {:<12} {:<15.2}% {:<15.2} {:<10.2}%",
            city,
            s.claims,
            s.rejections,
            s.rejection_rate(),
            s.claim_to_premium(),
            s.loss_pct()
        );
    }

    out
}

pub fn render_recommendation(city: Option<&str>) -> String {
    format!("-> Suggest closing: {}", city.unwrap_or("None"))
}

/// `Rejection Reasons:` followed by one `<class>: <n> cases` line per class.
pub fn render_reasons(reasons: &[(RejectionClass, usize)]) -> String {
    let mut out = String::from("Rejection Reasons:\n");
    for (reason, count) in reasons {
        let _ = writeln!(out, "{}: {} cases", reason, count);
    }
    out
}

/// The complete text report.
pub fn render_report(report: &ClaimsReport) -> String {
    format!(
        "City Report ({}):\n{}\n{}\n\n{}",
        report.generated_at.format("%B %Y"),
        render_city_table(&report.analysis),
        render_recommendation(report.analysis.recommendation()),
        render_reasons(&report.reasons)
    )
}

// =============================================================================
// JSON Summary
// =============================================================================

/// One city row with derived ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySummary {
    pub city: String,
    pub claims: usize,
    pub rejected: usize,
    pub claim_amount: f64,
    pub premium: f64,
    pub paid: f64,
    pub rejection_pct: f64,
    pub claim_to_premium: f64,
    pub loss_pct: f64,
    pub score: f64,
}

/// Count of one rejection class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonCount {
    pub reason: RejectionClass,
    pub count: usize,
}

/// Serializable form of a [`ClaimsReport`], without the records themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub dropped_rows: usize,
    pub degraded_fields: usize,
    pub cities: Vec<CitySummary>,
    pub suggest_closing: Option<String>,
    pub reasons: Vec<ReasonCount>,
}

impl From<&ClaimsReport> for ReportSummary {
    fn from(report: &ClaimsReport) -> Self {
        let cities = report
            .analysis
            .stats()
            .iter()
            .map(|(city, s)| CitySummary {
                city: city.to_string(),
                claims: s.claims,
                rejected: s.rejections,
                claim_amount: s.claim_amount,
                premium: s.premium,
                paid: s.paid,
                rejection_pct: s.rejection_rate(),
                claim_to_premium: s.claim_to_premium(),
                loss_pct: s.loss_pct(),
                score: s.score(),
            })
            .collect();

        Self {
            generated_at: report.generated_at,
            record_count: report.records.len(),
            dropped_rows: report.diagnostics.dropped_rows.len(),
            degraded_fields: report.diagnostics.field_issues.len(),
            cities,
            suggest_closing: report.analysis.recommendation().map(String::from),
            reasons: report
                .reasons
                .iter()
                .map(|(reason, count)| ReasonCount { reason: *reason, count: *count })
                .collect(),
        }
    }
}
