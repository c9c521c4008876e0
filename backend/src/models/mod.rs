//! Domain models for the claims report pipeline.
//!
//! - [`RawRecord`] - one data row as read from the file, all values still text
//! - [`FieldValue`] - typed value of a cleaned field
//! - [`CleanRecord`] - typed row with its derived [`PaymentStatus`]
//! - [`ClassifiedRecord`] - cleaned row plus its [`RejectionClass`]
//! - [`Diagnostics`] - rows dropped and fields degraded along the way

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

// =============================================================================
// Field Names
// =============================================================================

pub const CITY: &str = "CITY";
pub const CLAIM_AMOUNT: &str = "CLAIM_AMOUNT";
pub const PREMIUM_COLLECTED: &str = "PREMIUM_COLLECTED";
pub const PAID_AMOUNT: &str = "PAID_AMOUNT";
pub const REJECTION_REMARKS: &str = "REJECTION_REMARKS";

/// Derived by the normalizer.
pub const PAYMENT_STATUS: &str = "PAYMENT_STATUS";
/// Derived by the classifier.
pub const REJECTION_CLASS: &str = "REJECTION_CLASS";

/// Columns parsed as numbers.
pub const AMOUNT_FIELDS: [&str; 3] = [CLAIM_AMOUNT, PREMIUM_COLLECTED, PAID_AMOUNT];

/// True for the columns the pipeline computes itself.
pub fn is_derived_field(name: &str) -> bool {
    name == PAYMENT_STATUS || name == REJECTION_CLASS
}

// =============================================================================
// Raw Record
// =============================================================================

/// A data row exactly as read, keyed by header name in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line number in the source file.
    pub line: usize,
    pub fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn to_json(&self) -> Value {
        let obj: Map<String, Value> = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), json!(value)))
            .collect();
        Value::Object(obj)
    }
}

// =============================================================================
// Field Value
// =============================================================================

/// Typed value of a cleaned field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Numeric view of the value. Text and null have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Null | FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Textual form used when writing records out. Null is empty and whole
/// floats keep one decimal so they read back as floats.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Settlement state derived from the paid amount and rejection remark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Rejection Class
// =============================================================================

/// Reason bucket for a rejection remark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionClass {
    #[serde(rename = "Fake_document")]
    FakeDocument,
    #[serde(rename = "Not_Covered")]
    NotCovered,
    #[serde(rename = "Policy_expired")]
    PolicyExpired,
    Unknown,
    #[serde(rename = "No Remark")]
    NoRemark,
}

impl RejectionClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FakeDocument => "Fake_document",
            Self::NotCovered => "Not_Covered",
            Self::PolicyExpired => "Policy_expired",
            Self::Unknown => "Unknown",
            Self::NoRemark => "No Remark",
        }
    }
}

impl fmt::Display for RejectionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Clean Record
// =============================================================================

/// A typed claims row.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    /// 1-based line number in the source file.
    pub line: usize,
    /// Input columns in header order.
    pub fields: Vec<(String, FieldValue)>,
    pub payment_status: PaymentStatus,
}

impl CleanRecord {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Numeric value of `name`, with null, text and missing columns read as 0.
    pub fn amount(&self, name: &str) -> f64 {
        self.get(name).and_then(FieldValue::as_f64).unwrap_or(0.0)
    }

    pub fn city(&self) -> Option<&str> {
        self.get(CITY).and_then(FieldValue::as_str)
    }

    pub fn rejection_remarks(&self) -> Option<&str> {
        self.get(REJECTION_REMARKS).and_then(FieldValue::as_str)
    }
}

// =============================================================================
// Classified Record
// =============================================================================

/// A cleaned row with its rejection class attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub record: CleanRecord,
    pub rejection_class: RejectionClass,
}

impl ClassifiedRecord {
    /// Output column names: input columns, then the two derived ones.
    pub fn field_names(&self) -> Vec<&str> {
        self.record
            .fields
            .iter()
            .map(|(key, _)| key.as_str())
            .chain([PAYMENT_STATUS, REJECTION_CLASS])
            .collect()
    }

    /// Textual values in [`Self::field_names`] order.
    pub fn values(&self) -> Vec<String> {
        self.record
            .fields
            .iter()
            .map(|(_, value)| value.to_string())
            .chain([
                self.record.payment_status.to_string(),
                self.rejection_class.to_string(),
            ])
            .collect()
    }

    pub fn to_json(&self) -> Value {
        let mut obj: Map<String, Value> = self
            .record
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), json!(value)))
            .collect();
        obj.insert(PAYMENT_STATUS.to_string(), json!(self.record.payment_status));
        obj.insert(REJECTION_CLASS.to_string(), json!(self.rejection_class));
        Value::Object(obj)
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// A data line discarded because its field count did not match the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRow {
    pub line: usize,
    pub expected: usize,
    pub found: usize,
}

/// A field that was degraded to null during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldIssue {
    pub line: usize,
    pub field: String,
    pub raw: String,
    pub reason: String,
}

/// Everything the pipeline recovered from without aborting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub dropped_rows: Vec<DroppedRow>,
    pub field_issues: Vec<FieldIssue>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.dropped_rows.is_empty() && self.field_issues.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
