//! City-level aggregation and closure ranking.
//!
//! # Architecture
//!
//! ```text
//! Classified records                 CityAnalysis
//! ┌──────────────────────┐          ┌──────────────────────────────┐
//! │ CITY: Pune, ...      │          │ Pune    claims 2, rejected 1 │
//! │ CITY: Pune, ...      │   fold   │ Ranchi  claims 1, rejected 0 │
//! │ CITY: Ranchi, ...    │  ─────▶  ├──────────────────────────────┤
//! │ CITY: Mumbai, ...    │          │ recommendation: Some("Pune") │
//! └──────────────────────┘          └──────────────────────────────┘
//! ```
//!
//! Only the branches in [`CITY_ALLOW_LIST`] are counted. Statistics are kept
//! in that list's order, which also breaks ties between equal scores.

use serde::Serialize;

use crate::models::{ClassifiedRecord, PaymentStatus, CLAIM_AMOUNT, PAID_AMOUNT, PREMIUM_COLLECTED};

/// Branches eligible for aggregation, in report order.
pub const CITY_ALLOW_LIST: [&str; 4] = ["Pune", "Kolkata", "Ranchi", "Guwahati"];

const REJECTION_WEIGHT: f64 = 0.6;
const CLAIM_RATIO_WEIGHT: f64 = 0.4;

/// Running totals for one branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityStats {
    pub claims: usize,
    pub claim_amount: f64,
    pub premium: f64,
    pub rejections: usize,
    pub paid: f64,
}

impl CityStats {
    fn add(mut self, record: &ClassifiedRecord) -> Self {
        let clean = &record.record;
        self.claims += 1;
        self.claim_amount += clean.amount(CLAIM_AMOUNT);
        self.premium += clean.amount(PREMIUM_COLLECTED);
        self.paid += clean.amount(PAID_AMOUNT);
        if clean.payment_status == PaymentStatus::Rejected {
            self.rejections += 1;
        }
        self
    }

    /// Rejected claims as a percentage of all claims.
    pub fn rejection_rate(&self) -> f64 {
        if self.claims == 0 {
            0.0
        } else {
            self.rejections as f64 / self.claims as f64 * 100.0
        }
    }

    pub fn claim_to_premium(&self) -> f64 {
        if self.premium == 0.0 {
            0.0
        } else {
            self.claim_amount / self.premium
        }
    }

    /// Paid amount as a percentage of premium collected.
    pub fn loss_pct(&self) -> f64 {
        if self.premium == 0.0 {
            0.0
        } else {
            self.paid / self.premium * 100.0
        }
    }

    /// Composite badness score, higher is worse.
    pub fn score(&self) -> f64 {
        self.rejection_rate() * REJECTION_WEIGHT + self.claim_to_premium() * CLAIM_RATIO_WEIGHT
    }
}

/// Per-city statistics and the branch recommended for closure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CityAnalysis {
    stats: Vec<(&'static str, CityStats)>,
    recommendation: Option<&'static str>,
}

impl CityAnalysis {
    /// Stats for cities present in the data, in [`CITY_ALLOW_LIST`] order.
    pub fn stats(&self) -> &[(&'static str, CityStats)] {
        &self.stats
    }

    pub fn get(&self, city: &str) -> Option<&CityStats> {
        self.stats
            .iter()
            .find(|(name, _)| *name == city)
            .map(|(_, stats)| stats)
    }

    /// City with the worst score, `None` when no allow-listed city appeared.
    pub fn recommendation(&self) -> Option<&'static str> {
        self.recommendation
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Sum of claim counts over all aggregated cities.
    pub fn total_claims(&self) -> usize {
        self.stats.iter().map(|(_, s)| s.claims).sum()
    }
}

/// Aggregate records into per-city statistics and pick the worst city.
pub fn city_analysis(records: &[ClassifiedRecord]) -> CityAnalysis {
    let slots = records
        .iter()
        .fold([None::<CityStats>; CITY_ALLOW_LIST.len()], |mut slots, record| {
            let slot = record
                .record
                .city()
                .and_then(|city| CITY_ALLOW_LIST.iter().position(|c| *c == city));
            if let Some(idx) = slot {
                slots[idx] = Some(slots[idx].unwrap_or_default().add(record));
            }
            slots
        });

    let stats: Vec<(&'static str, CityStats)> = CITY_ALLOW_LIST
        .iter()
        .zip(slots)
        .filter_map(|(city, stats)| stats.map(|s| (*city, s)))
        .collect();

    let recommendation = worst_city(&stats);

    CityAnalysis {
        stats,
        recommendation,
    }
}

/// Strictly highest score wins, so the earlier city keeps a tie.
pub fn worst_city(stats: &[(&'static str, CityStats)]) -> Option<&'static str> {
    stats
        .iter()
        .fold(None::<(&'static str, f64)>, |worst, (city, s)| {
            let score = s.score();
            match worst {
                Some((_, best)) if score <= best => worst,
                _ => Some((*city, score)),
            }
        })
        .map(|(city, _)| city)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CleanRecord, FieldValue, RejectionClass, CITY};

    fn record(city: &str, claim: i64, premium: i64, paid: i64, status: PaymentStatus) -> ClassifiedRecord {
        ClassifiedRecord {
            record: CleanRecord {
                line: 2,
                fields: vec![
                    (CITY.to_string(), FieldValue::Text(city.to_string())),
                    (CLAIM_AMOUNT.to_string(), FieldValue::Integer(claim)),
                    (PREMIUM_COLLECTED.to_string(), FieldValue::Integer(premium)),
                    (PAID_AMOUNT.to_string(), FieldValue::Integer(paid)),
                ],
                payment_status: status,
            },
            rejection_class: RejectionClass::NoRemark,
        }
    }

    #[test]
    fn test_pune_example() {
        let records = vec![
            record("Pune", 1000, 2000, 0, PaymentStatus::Rejected),
            record("Pune", 500, 2000, 500, PaymentStatus::Paid),
        ];

        let analysis = city_analysis(&records);
        let pune = analysis.get("Pune").unwrap();

        assert_eq!(pune.claims, 2);
        assert_eq!(pune.rejections, 1);
        assert_eq!(pune.claim_amount, 1500.0);
        assert_eq!(pune.premium, 4000.0);
        assert_eq!(pune.paid, 500.0);
        assert_eq!(pune.rejection_rate(), 50.0);
        assert_eq!(pune.claim_to_premium(), 0.375);
        assert_eq!(pune.loss_pct(), 12.5);
        assert_eq!(analysis.recommendation(), Some("Pune"));
    }

    #[test]
    fn test_other_cities_ignored() {
        let records = vec![
            record("Mumbai", 1000, 10, 0, PaymentStatus::Rejected),
            record("pune", 1000, 10, 0, PaymentStatus::Rejected),
            record("Ranchi", 100, 1000, 100, PaymentStatus::Paid),
        ];

        let analysis = city_analysis(&records);

        assert_eq!(analysis.stats().len(), 1);
        assert!(analysis.get("Mumbai").is_none());
        assert!(analysis.get("Pune").is_none());
        assert_eq!(analysis.total_claims(), 1);
        assert!(analysis.total_claims() <= records.len());
        assert_eq!(analysis.recommendation(), Some("Ranchi"));
    }

    #[test]
    fn test_no_allow_listed_city() {
        let records = vec![record("Delhi", 1, 1, 0, PaymentStatus::Pending)];
        let analysis = city_analysis(&records);

        assert!(analysis.is_empty());
        assert_eq!(analysis.recommendation(), None);
        assert_eq!(city_analysis(&[]).recommendation(), None);
    }

    #[test]
    fn test_stats_in_allow_list_order() {
        let records = vec![
            record("Guwahati", 1, 1, 1, PaymentStatus::Paid),
            record("Kolkata", 1, 1, 1, PaymentStatus::Paid),
            record("Pune", 1, 1, 1, PaymentStatus::Paid),
        ];
        let analysis = city_analysis(&records);
        let order: Vec<&str> = analysis.stats().iter().map(|(c, _)| *c).collect();

        assert_eq!(order, vec!["Pune", "Kolkata", "Guwahati"]);
    }

    #[test]
    fn test_tie_goes_to_earlier_city() {
        let records = vec![
            record("Ranchi", 100, 200, 0, PaymentStatus::Rejected),
            record("Kolkata", 100, 200, 0, PaymentStatus::Rejected),
        ];
        let analysis = city_analysis(&records);

        assert_eq!(analysis.get("Ranchi").unwrap().score(), analysis.get("Kolkata").unwrap().score());
        assert_eq!(analysis.recommendation(), Some("Kolkata"));
    }

    #[test]
    fn test_highest_score_wins() {
        let records = vec![
            record("Pune", 100, 1000, 100, PaymentStatus::Paid),
            record("Guwahati", 100, 1000, 0, PaymentStatus::Rejected),
            record("Kolkata", 900, 1000, 900, PaymentStatus::Paid),
        ];
        assert_eq!(city_analysis(&records).recommendation(), Some("Guwahati"));
    }

    #[test]
    fn test_zero_premium_ratios() {
        let stats = CityStats {
            claims: 0,
            claim_amount: 100.0,
            premium: 0.0,
            rejections: 0,
            paid: 50.0,
        };
        assert_eq!(stats.rejection_rate(), 0.0);
        assert_eq!(stats.claim_to_premium(), 0.0);
        assert_eq!(stats.loss_pct(), 0.0);
        assert_eq!(stats.score(), 0.0);
    }

    #[test]
    fn test_null_amounts_count_as_zero() {
        let mut rec = record("Pune", 0, 0, 0, PaymentStatus::Pending);
        rec.record.fields[1].1 = FieldValue::Null;
        rec.record.fields[2].1 = FieldValue::Float(250.5);

        let analysis = city_analysis(&[rec]);
        let pune = analysis.get("Pune").unwrap();
        assert_eq!(pune.claim_amount, 0.0);
        assert_eq!(pune.premium, 250.5);
    }
}
