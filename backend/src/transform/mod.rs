//! Transformation stages.
//!
//! - Normalize: raw text to typed fields and payment status
//! - Classify: rejection reason per record
//! - Aggregate: per-city statistics and closure ranking
//! - Pipeline: all of the above in one call

pub mod aggregate;
pub mod classify;
pub mod normalize;
pub mod pipeline;

pub use aggregate::{city_analysis, CityAnalysis, CityStats, CITY_ALLOW_LIST};
pub use classify::{add_rejection_class, classify_rejection, reason_tally};
pub use normalize::{clean_data, normalize_record, NormalizeResult};
pub use pipeline::*;
