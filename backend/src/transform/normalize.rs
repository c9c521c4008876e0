//! Type casting for raw claims rows.
//!
//! Null-like tokens become [`FieldValue::Null`], amount columns become
//! numbers, `CITY` is title-cased and everything else stays trimmed text.
//! An amount that does not parse is nulled and reported as a [`FieldIssue`]
//! rather than failing the batch.

use crate::models::{
    is_derived_field, CleanRecord, FieldIssue, FieldValue, PaymentStatus, RawRecord, AMOUNT_FIELDS,
    CITY, PAID_AMOUNT, REJECTION_REMARKS,
};

/// Values read as missing, compared case-insensitively.
const NULL_TOKENS: [&str; 5] = ["", "na", "null", "none", "n/a"];

/// Output of [`clean_data`].
#[derive(Debug, Clone, Default)]
pub struct NormalizeResult {
    pub records: Vec<CleanRecord>,
    pub issues: Vec<FieldIssue>,
}

pub fn is_null_token(raw: &str) -> bool {
    let lowered = raw.trim().to_lowercase();
    NULL_TOKENS.contains(&lowered.as_str())
}

/// Parse an amount: float when the text has a decimal point, integer otherwise.
pub fn parse_amount(raw: &str) -> Result<FieldValue, String> {
    let text = raw.trim();
    if text.contains('.') {
        text.parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|e| format!("not a decimal number: {}", e))
    } else {
        text.parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|e| format!("not an integer: {}", e))
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so `"new-delhi"`
/// becomes `"New-Delhi"`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

/// Type one field.
pub fn normalize_value(field: &str, raw: &str) -> Result<FieldValue, String> {
    if is_null_token(raw) {
        return Ok(FieldValue::Null);
    }

    if AMOUNT_FIELDS.contains(&field) {
        parse_amount(raw)
    } else if field == CITY {
        Ok(FieldValue::Text(title_case(raw.trim())))
    } else {
        Ok(FieldValue::Text(raw.trim().to_string()))
    }
}

/// `Rejected` needs a zero (or missing) paid amount and a remark. Otherwise
/// any positive payment is `Paid` and the rest is `Pending`.
pub fn payment_status(paid: Option<&FieldValue>, remark: Option<&FieldValue>) -> PaymentStatus {
    let paid = paid.and_then(FieldValue::as_f64).unwrap_or(0.0);
    let has_remark = remark
        .and_then(FieldValue::as_str)
        .is_some_and(|r| !r.is_empty());

    if paid == 0.0 && has_remark {
        PaymentStatus::Rejected
    } else if paid > 0.0 {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Pending
    }
}

/// Clean a single row and collect the fields that had to be nulled.
pub fn normalize_record(raw: &RawRecord) -> (CleanRecord, Vec<FieldIssue>) {
    let mut fields = Vec::with_capacity(raw.fields.len());
    let mut issues = Vec::new();

    for (name, value) in &raw.fields {
        // Recomputed below and by the classifier.
        if is_derived_field(name) {
            continue;
        }

        let typed = normalize_value(name, value).unwrap_or_else(|reason| {
            issues.push(FieldIssue {
                line: raw.line,
                field: name.clone(),
                raw: value.clone(),
                reason,
            });
            FieldValue::Null
        });
        fields.push((name.clone(), typed));
    }

    let mut record = CleanRecord {
        line: raw.line,
        fields,
        payment_status: PaymentStatus::Pending,
    };
    record.payment_status = payment_status(record.get(PAID_AMOUNT), record.get(REJECTION_REMARKS));

    (record, issues)
}

/// Clean every row.
pub fn clean_data(records: &[RawRecord]) -> NormalizeResult {
    records
        .iter()
        .map(normalize_record)
        .fold(NormalizeResult::default(), |mut acc, (record, issues)| {
            acc.records.push(record);
            acc.issues.extend(issues);
            acc
        })
}
