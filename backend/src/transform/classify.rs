//! Rejection remark classification.
//!
//! Remarks are lower-cased and checked against an ordered rule list. The
//! first rule that matches wins, so a remark like "rejected: fake document"
//! lands in [`RejectionClass::FakeDocument`] rather than `Unknown`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{CleanRecord, ClassifiedRecord, RejectionClass};

/// Ordered (pattern, class) rules.
static RULES: Lazy<Vec<(Regex, RejectionClass)>> = Lazy::new(|| {
    [
        (r"fake[ _]document", RejectionClass::FakeDocument),
        (r"not[ _]covered", RejectionClass::NotCovered),
        (r"policy[ _]expired", RejectionClass::PolicyExpired),
        (r"reject|denied", RejectionClass::Unknown),
    ]
    .into_iter()
    .map(|(pattern, class)| (Regex::new(pattern).expect("valid rule pattern"), class))
    .collect()
});

/// Classify one remark. Missing, empty and unmatched remarks are `No Remark`.
///
/// # Example
/// ```
/// use claimsreport::{classify_rejection, RejectionClass};
///
/// assert_eq!(
///     classify_rejection(Some("Claim rejected: fake document submitted")),
///     RejectionClass::FakeDocument
/// );
/// assert_eq!(classify_rejection(None), RejectionClass::NoRemark);
/// ```
pub fn classify_rejection(remark: Option<&str>) -> RejectionClass {
    let remark = match remark {
        Some(r) if !r.is_empty() => r.to_lowercase(),
        _ => return RejectionClass::NoRemark,
    };

    RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(&remark))
        .map(|(_, class)| *class)
        .unwrap_or(RejectionClass::NoRemark)
}

/// Attach a rejection class to every record.
pub fn add_rejection_class(records: Vec<CleanRecord>) -> Vec<ClassifiedRecord> {
    records
        .into_iter()
        .map(|record| ClassifiedRecord {
            rejection_class: classify_rejection(record.rejection_remarks()),
            record,
        })
        .collect()
}

/// Count records per rejection class, most frequent first.
///
/// Equal counts keep the order in which the classes first appeared.
pub fn reason_tally(records: &[ClassifiedRecord]) -> Vec<(RejectionClass, usize)> {
    let mut tally: Vec<(RejectionClass, usize)> = Vec::new();

    for record in records {
        match tally.iter_mut().find(|(class, _)| *class == record.rejection_class) {
            Some((_, count)) => *count += 1,
            None => tally.push((record.rejection_class, 1)),
        }
    }

    // Stable sort keeps first-seen order for ties.
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldValue, PaymentStatus, REJECTION_REMARKS};

    fn clean(remark: Option<&str>) -> CleanRecord {
        CleanRecord {
            line: 2,
            fields: vec![(
                REJECTION_REMARKS.to_string(),
                remark.map_or(FieldValue::Null, |r| FieldValue::Text(r.to_string())),
            )],
            payment_status: PaymentStatus::Pending,
        }
    }

    #[test]
    fn test_each_class() {
        assert_eq!(classify_rejection(Some("Fake Document found")), RejectionClass::FakeDocument);
        assert_eq!(classify_rejection(Some("FAKE_DOCUMENT")), RejectionClass::FakeDocument);
        assert_eq!(classify_rejection(Some("Part not covered")), RejectionClass::NotCovered);
        assert_eq!(classify_rejection(Some("not_covered")), RejectionClass::NotCovered);
        assert_eq!(classify_rejection(Some("Policy Expired last year")), RejectionClass::PolicyExpired);
        assert_eq!(classify_rejection(Some("policy_expired")), RejectionClass::PolicyExpired);
        assert_eq!(classify_rejection(Some("Claim Rejected")), RejectionClass::Unknown);
        assert_eq!(classify_rejection(Some("denied by surveyor")), RejectionClass::Unknown);
    }

    #[test]
    fn test_no_remark() {
        assert_eq!(classify_rejection(None), RejectionClass::NoRemark);
        assert_eq!(classify_rejection(Some("")), RejectionClass::NoRemark);
        assert_eq!(classify_rejection(Some("awaiting survey")), RejectionClass::NoRemark);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            classify_rejection(Some("Claim rejected: fake document submitted")),
            RejectionClass::FakeDocument
        );
        assert_eq!(
            classify_rejection(Some("policy expired and damage not covered")),
            RejectionClass::NotCovered
        );
        assert_eq!(
            classify_rejection(Some("denied: policy_expired")),
            RejectionClass::PolicyExpired
        );
    }

    #[test]
    fn test_add_rejection_class_keeps_remark() {
        let classified = add_rejection_class(vec![clean(Some("Not Covered")), clean(None)]);

        assert_eq!(classified[0].rejection_class, RejectionClass::NotCovered);
        assert_eq!(classified[0].record.rejection_remarks(), Some("Not Covered"));
        assert_eq!(classified[1].rejection_class, RejectionClass::NoRemark);
    }

    #[test]
    fn test_reason_tally_order() {
        let records = add_rejection_class(vec![
            clean(Some("denied")),
            clean(None),
            clean(Some("fake document")),
            clean(None),
            clean(Some("fake document")),
            clean(Some("rejected")),
        ]);

        let tally = reason_tally(&records);
        assert_eq!(
            tally,
            vec![
                (RejectionClass::Unknown, 2),
                (RejectionClass::NoRemark, 2),
                (RejectionClass::FakeDocument, 2),
            ]
        );
    }

    #[test]
    fn test_reason_tally_most_frequent_first() {
        let records = add_rejection_class(vec![
            clean(Some("not covered")),
            clean(None),
            clean(None),
        ]);

        let tally = reason_tally(&records);
        assert_eq!(tally[0], (RejectionClass::NoRemark, 2));
        assert_eq!(tally[1], (RejectionClass::NotCovered, 1));
    }
}
