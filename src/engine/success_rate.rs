//! Success rate calculation
//!
//! `success / (success + genuine_errors) * 100`, rounded to one decimal.
//! In-progress states never reach either side of the fraction: the caller's
//! success count and the error state set both leave them out.

use super::error_filter::filter_genuine_errors;
use super::registry::ClassifierRegistry;
use crate::models::{OutcomeRecord, StateSet};

/// Success percentage for a channel, with expected errors excluded
///
/// Returns 0.0 when there is nothing to decide on (no successes and no
/// genuine errors).
pub fn compute_rate<R: OutcomeRecord>(
    registry: &ClassifierRegistry,
    success_count: u64,
    error_states: &StateSet,
    docs: &[R],
    channel_type: &str,
) -> f64 {
    let genuine_errors = filter_genuine_errors(registry, docs, channel_type, error_states).len();
    rate_from_counts(success_count, genuine_errors as u64)
}

/// Rate from already-known success and genuine error counts
pub fn rate_from_counts(success_count: u64, genuine_error_count: u64) -> f64 {
    let denominator = success_count.saturating_add(genuine_error_count);
    if denominator == 0 {
        return 0.0;
    }
    round_to_one_decimal(success_count as f64 / denominator as f64 * 100.0)
}

pub(crate) fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
