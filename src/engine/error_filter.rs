//! Genuine error filtering
//!
//! Keeps the error-state outcomes that the channel's classifier does not
//! excuse. Single-status records contribute at most one event; dual-status
//! records are tested per side and may contribute two, so the output counts
//! error *events*, not documents.

use super::classifier::ErrorClassifier;
use super::registry::ClassifierRegistry;
use crate::models::{OutcomeRecord, Phase, StateSet};

/// An error outcome that counts against the success rate
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent<'a, R> {
    pub record: &'a R,
    pub phase: Phase,
    pub state: &'a str,
    pub reason: &'a str,
}

/// Error-state outcomes not classified as expected for `channel_type`
///
/// Output keeps input traversal order. Unknown channels use the default
/// classifier, so every error-state outcome passes through.
pub fn filter_genuine_errors<'a, R: OutcomeRecord>(
    registry: &ClassifierRegistry,
    docs: &'a [R],
    channel_type: &str,
    error_states: &StateSet,
) -> Vec<ErrorEvent<'a, R>> {
    let classifier = registry.get_classifier(channel_type);
    let mut genuine = Vec::new();

    for record in docs {
        for outcome in record.outcomes() {
            if error_states.contains(outcome.state)
                && !classifier.is_expected_error(outcome.reason, outcome.state)
            {
                genuine.push(ErrorEvent {
                    record,
                    phase: outcome.phase,
                    state: outcome.state,
                    reason: outcome.reason,
                });
            }
        }
    }

    genuine
}

/// Number of error-state outcomes the classifier excused
pub fn count_expected_errors<R: OutcomeRecord>(
    registry: &ClassifierRegistry,
    docs: &[R],
    channel_type: &str,
    error_states: &StateSet,
) -> usize {
    let classifier: &dyn ErrorClassifier = registry.get_classifier(channel_type);
    docs.iter()
        .flat_map(|record| record.outcomes())
        .filter(|outcome| {
            error_states.contains(outcome.state)
                && classifier.is_expected_error(outcome.reason, outcome.state)
        })
        .count()
}
