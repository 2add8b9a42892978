//! Per-channel detail queries
//!
//! Recent concluded records and reason tallies for a single channel, as
//! shown on a channel's detail page.

use crate::constants::RECENT_RECORDS_EXCLUDED_STATES;
use crate::models::{OutcomeRecord, PoliceRecord};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;

/// How often a reason text occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonCount {
    pub reason: String,
    pub count: u64,
}

/// Newest records of a channel, skipping NEW, SCHEDULED and CANCELED ones
///
/// Records without a timestamp sort after all timestamped ones.
pub fn recent_records<'a>(
    records: &'a [PoliceRecord],
    channel_type: &str,
    limit: usize,
) -> Vec<&'a PoliceRecord> {
    let mut recent: Vec<&PoliceRecord> = records
        .iter()
        .filter(|record| record.police_type == channel_type)
        .filter(|record| {
            !RECENT_RECORDS_EXCLUDED_STATES
                .iter()
                .any(|excluded| *excluded == record.state())
        })
        .collect();
    // Option<T> orders None first, so reversing puts newest first and None last
    recent.sort_by_key(|record| Reverse(record.created_at));
    recent.truncate(limit);
    recent
}

/// Non-empty reasons recorded for `state` on a channel, most frequent first
///
/// Every outcome of a record is considered, so for dual-status records a
/// check-in and a check-out reason are tallied separately. Ties keep the
/// order in which reasons first appeared.
pub fn reason_breakdown<R: OutcomeRecord>(
    records: &[R],
    channel_type: &str,
    state: &str,
) -> Vec<ReasonCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();

    for record in records.iter().filter(|r| r.channel_type() == channel_type) {
        for outcome in record.outcomes() {
            if outcome.state != state || outcome.reason.is_empty() {
                continue;
            }
            let count = counts.entry(outcome.reason).or_insert_with(|| {
                order.push(outcome.reason);
                0
            });
            *count += 1;
        }
    }

    let mut breakdown: Vec<ReasonCount> = order
        .into_iter()
        .map(|reason| ReasonCount {
            reason: reason.to_string(),
            count: counts[reason],
        })
        .collect();
    breakdown.sort_by_key(|entry| Reverse(entry.count));
    breakdown
}
