//! Core data structures for submission monitoring.
//!
//! Defines the raw police and statistics records, the state sets and
//! state counts the rate engine works with, and the outcome view that lets
//! single-status and dual-status records share one error filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The two submission pipelines monitored by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    /// Single-status police registrations keyed by police type
    Police,
    /// Dual-status (check-in / check-out) statistics keyed by stat type
    Statistics,
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pipeline::Police => write!(f, "police"),
            Pipeline::Statistics => write!(f, "statistics"),
        }
    }
}

/// Which side of a record an outcome came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The only outcome of a single-status record
    Single,
    CheckIn,
    CheckOut,
}

/// One state/reason pair taken from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome<'a> {
    pub phase: Phase,
    pub state: &'a str,
    pub reason: &'a str,
}

/// A record exposing one or more state/reason outcomes
///
/// Absent fields surface as empty strings so that downstream matching
/// yields non-matches rather than failures.
pub trait OutcomeRecord {
    /// Channel identifier the record was submitted through
    fn channel_type(&self) -> &str;

    /// Outcomes in a stable order (check-in before check-out)
    fn outcomes(&self) -> impl Iterator<Item = Outcome<'_>>;
}

/// Single-status police registration record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoliceRecord {
    pub police_type: String,
    pub state: Option<String>,
    pub reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl PoliceRecord {
    pub fn new(police_type: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            police_type: police_type.into(),
            state: Some(state.into()),
            reason: None,
            created_at: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn state(&self) -> &str {
        self.state.as_deref().unwrap_or_default()
    }

    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or_default()
    }
}

impl OutcomeRecord for PoliceRecord {
    fn channel_type(&self) -> &str {
        &self.police_type
    }

    fn outcomes(&self) -> impl Iterator<Item = Outcome<'_>> {
        std::iter::once(Outcome {
            phase: Phase::Single,
            state: self.state(),
            reason: self.reason(),
        })
    }
}

/// Dual-status statistics record with independent check-in and check-out outcomes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatRecord {
    pub stat_type: String,
    pub status_check_in: Option<String>,
    pub status_check_out: Option<String>,
    pub status_check_in_details: Option<String>,
    pub status_check_out_details: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl StatRecord {
    pub fn new(
        stat_type: impl Into<String>,
        check_in: impl Into<String>,
        check_out: impl Into<String>,
    ) -> Self {
        Self {
            stat_type: stat_type.into(),
            status_check_in: Some(check_in.into()),
            status_check_out: Some(check_out.into()),
            ..Self::default()
        }
    }

    pub fn with_details(
        mut self,
        check_in_details: impl Into<String>,
        check_out_details: impl Into<String>,
    ) -> Self {
        self.status_check_in_details = Some(check_in_details.into());
        self.status_check_out_details = Some(check_out_details.into());
        self
    }
}

impl OutcomeRecord for StatRecord {
    fn channel_type(&self) -> &str {
        &self.stat_type
    }

    fn outcomes(&self) -> impl Iterator<Item = Outcome<'_>> {
        [
            Outcome {
                phase: Phase::CheckIn,
                state: self.status_check_in.as_deref().unwrap_or_default(),
                reason: self.status_check_in_details.as_deref().unwrap_or_default(),
            },
            Outcome {
                phase: Phase::CheckOut,
                state: self.status_check_out.as_deref().unwrap_or_default(),
                reason: self.status_check_out_details.as_deref().unwrap_or_default(),
            },
        ]
        .into_iter()
    }
}

/// A named category of states (success, error, in-progress)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSet(BTreeSet<String>);

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(states: &[&str]) -> Self {
        states.iter().copied().collect()
    }

    pub fn contains(&self, state: &str) -> bool {
        self.0.contains(state)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// States present in both sets
    pub fn intersection<'a>(&'a self, other: &'a StateSet) -> impl Iterator<Item = &'a str> {
        self.0.intersection(&other.0).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for StateSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Occurrence count per state name
///
/// Keys are open-ended: unknown states are counted like any other.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateCounts(BTreeMap<String, u64>);

impl StateCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally every state in the iterator once
    pub fn from_states<'a>(states: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts = Self::new();
        for state in states {
            counts.add(state, 1);
        }
        counts
    }

    pub fn add(&mut self, state: impl Into<String>, count: u64) {
        *self.0.entry(state.into()).or_insert(0) += count;
    }

    pub fn get(&self, state: &str) -> u64 {
        self.0.get(state).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Sum of counts for states in the set
    pub fn count_in(&self, states: &StateSet) -> u64 {
        self.0
            .iter()
            .filter(|(state, _)| states.contains(state))
            .map(|(_, count)| count)
            .sum()
    }

    /// Sum of counts for states that have concluded (not in-progress)
    pub fn completed(&self, in_progress: &StateSet) -> u64 {
        self.0
            .iter()
            .filter(|(state, _)| !in_progress.contains(state))
            .map(|(_, count)| count)
            .sum()
    }

    pub fn merge(&mut self, other: &StateCounts) {
        for (state, count) in &other.0 {
            self.add(state.clone(), *count);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(state, count)| (state.as_str(), *count))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for StateCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (state, count) in iter {
            counts.add(state, count);
        }
        counts
    }
}

/// Grouped counts and sample documents for one channel
///
/// Produced by the record source; the counts come from the grouping query
/// while `docs` carries the raw state/reason data needed for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSample<R> {
    pub channel_type: String,
    pub counts: StateCounts,
    pub docs: Vec<R>,
}

impl<R> ChannelSample<R> {
    pub fn new(channel_type: impl Into<String>) -> Self {
        Self {
            channel_type: channel_type.into(),
            counts: StateCounts::new(),
            docs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_counts_tolerates_unknown_states() {
        let counts = StateCounts::from_states(["SUCCESS", "ERROR", "SOMETHING_NEW", "SUCCESS"]);

        assert_eq!(counts.get("SUCCESS"), 2);
        assert_eq!(counts.get("SOMETHING_NEW"), 1);
        assert_eq!(counts.get("MISSING"), 0);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_state_counts_completed_excludes_in_progress() {
        let counts: StateCounts = [("SUCCESS", 5), ("NEW", 3), ("PROGRESS", 2), ("ERROR", 1)]
            .into_iter()
            .collect();
        let in_progress = StateSet::from_slice(&["NEW", "IN_PROGRESS", "PROGRESS"]);

        assert_eq!(counts.completed(&in_progress), 6);
        assert_eq!(
            counts.count_in(&StateSet::from_slice(&["SUCCESS", "COMPLETE"])),
            5
        );
    }

    #[test]
    fn test_state_counts_merge() {
        let mut first: StateCounts = [("SUCCESS", 2)].into_iter().collect();
        let second: StateCounts = [("SUCCESS", 1), ("ERROR", 4)].into_iter().collect();

        first.merge(&second);

        assert_eq!(first.get("SUCCESS"), 3);
        assert_eq!(first.get("ERROR"), 4);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_police_record_missing_fields_are_empty() {
        let record = PoliceRecord {
            police_type: "MOS".to_string(),
            ..PoliceRecord::default()
        };

        let outcomes: Vec<_> = record.outcomes().collect();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].state, "");
        assert_eq!(outcomes[0].reason, "");
        assert_eq!(outcomes[0].phase, Phase::Single);
    }

    #[test]
    fn test_stat_record_yields_check_in_then_check_out() {
        let record = StatRecord::new("ITLA", "ERROR", "COMPLETE").with_details("in", "out");

        let outcomes: Vec<_> = record.outcomes().collect();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].phase, Phase::CheckIn);
        assert_eq!(outcomes[0].state, "ERROR");
        assert_eq!(outcomes[0].reason, "in");
        assert_eq!(outcomes[1].phase, Phase::CheckOut);
        assert_eq!(outcomes[1].state, "COMPLETE");
        assert_eq!(outcomes[1].reason, "out");
    }

    #[test]
    fn test_state_set_serializes_as_sorted_list() {
        let set = StateSet::from_slice(&["INVALID", "ERROR"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["ERROR","INVALID"]"#);
    }
}
