//! Tests for genuine error filtering

use super::*;
use crate::engine::{ClassifierRegistry, count_expected_errors, filter_genuine_errors};
use crate::models::Phase;

#[test]
fn test_empty_docs_give_empty_output() {
    let registry = ClassifierRegistry::builtin();
    let docs: Vec<PoliceRecord> = Vec::new();

    let errors = filter_genuine_errors(&registry, &docs, "MOS", &fixture_error_states());
    assert!(errors.is_empty());
}

#[test]
fn test_expected_invalid_is_filtered_out() {
    let registry = ClassifierRegistry::builtin();
    let docs = spain_hos_docs();

    let errors = filter_genuine_errors(&registry, &docs, "SPAIN_HOS", &fixture_error_states());

    assert!(errors.is_empty());
    assert_eq!(
        count_expected_errors(&registry, &docs, "SPAIN_HOS", &fixture_error_states()),
        1
    );
}

#[test]
fn test_unknown_channel_passes_every_error_through() {
    let registry = ClassifierRegistry::builtin();
    let docs = spain_hos_docs();

    // Same documents attributed to a channel without rules
    let errors = filter_genuine_errors(&registry, &docs, "GERMANY", &fixture_error_states());

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].state, "INVALID");
    assert_eq!(
        count_expected_errors(&registry, &docs, "GERMANY", &fixture_error_states()),
        0
    );
}

#[test]
fn test_states_outside_error_set_are_ignored() {
    let registry = ClassifierRegistry::builtin();
    let docs = vec![
        police("MOS", "NEW", ""),
        police("MOS", "PROGRESS", ""),
        police("MOS", "FAILED", "boom"),
        police("MOS", "SUCCESS", "ok"),
    ];

    let errors = filter_genuine_errors(&registry, &docs, "MOS", &fixture_error_states());
    assert!(errors.is_empty());

    let with_failed = StateSet::from_slice(&["ERROR", "FAILED", "INVALID"]);
    let errors = filter_genuine_errors(&registry, &docs, "MOS", &with_failed);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].reason, "boom");
}

#[test]
fn test_output_keeps_input_order() {
    let registry = ClassifierRegistry::builtin();
    let docs = vec![
        police("MOS", "ERROR", "first"),
        police("MOS", "ERROR", "Validation error on field 4"),
        police("MOS", "INVALID", "second"),
        police("MOS", "ERROR", "third"),
    ];

    let errors = filter_genuine_errors(&registry, &docs, "MOS", &fixture_error_states());

    let reasons: Vec<&str> = errors.iter().map(|e| e.reason).collect();
    assert_eq!(reasons, vec!["first", "second", "third"]);
    assert!(std::ptr::eq(errors[1].record, &docs[2]));
}

#[test]
fn test_missing_reason_counts_as_genuine() {
    let registry = ClassifierRegistry::builtin();
    let docs = vec![PoliceRecord::new("MOS", "ERROR")];

    let errors = filter_genuine_errors(&registry, &docs, "MOS", &fixture_error_states());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].reason, "");
}

#[test]
fn test_missing_state_is_never_an_error() {
    let registry = ClassifierRegistry::builtin();
    let docs = vec![PoliceRecord {
        police_type: "MOS".to_string(),
        reason: Some("Unknown failure XYZ".to_string()),
        ..PoliceRecord::default()
    }];

    let errors = filter_genuine_errors(&registry, &docs, "MOS", &fixture_error_states());
    assert!(errors.is_empty());
}

#[test]
fn test_dual_status_sides_are_tested_independently() {
    let registry = ClassifierRegistry::builtin();
    let docs = itla_docs();

    let errors = filter_genuine_errors(&registry, &docs, "ITLA", &fixture_error_states());

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].phase, Phase::CheckIn);
    assert!(std::ptr::eq(errors[0].record, &docs[1]));
}

#[test]
fn test_dual_status_document_can_yield_two_events() {
    let registry = ClassifierRegistry::builtin();
    let docs = vec![
        stat("ITLA", "ERROR", "ERROR", "in failed", "out failed"),
        stat("ITLA", "COMPLETE", "INVALID", "ok", "bad checkout"),
        stat("ITLA", "COMPLETE", "COMPLETE", "ok", "ok"),
    ];

    let errors = filter_genuine_errors(&registry, &docs, "ITLA", &fixture_error_states());

    let phases: Vec<Phase> = errors.iter().map(|e| e.phase).collect();
    assert_eq!(phases, vec![Phase::CheckIn, Phase::CheckOut, Phase::CheckOut]);
    assert!(std::ptr::eq(errors[0].record, errors[1].record));
}

#[test]
fn test_dual_status_uses_channel_classifier_per_side() {
    let mut registry = ClassifierRegistry::builtin();
    registry.register(
        "ITLA",
        crate::engine::PatternClassifier::new("ITLA", &["ERROR"], &["Struttura non abilitata"]),
    );
    let docs = vec![stat(
        "ITLA",
        "ERROR",
        "ERROR",
        "Struttura non abilitata",
        "connection reset",
    )];

    let errors = filter_genuine_errors(&registry, &docs, "ITLA", &fixture_error_states());

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].phase, Phase::CheckOut);
    assert_eq!(
        count_expected_errors(&registry, &docs, "ITLA", &fixture_error_states()),
        1
    );
}

#[test]
fn test_filter_does_not_mutate_input() {
    let registry = ClassifierRegistry::builtin();
    let docs = spain_hos_docs();
    let before = docs.clone();

    let _ = filter_genuine_errors(&registry, &docs, "SPAIN_HOS", &fixture_error_states());

    assert_eq!(docs, before);
}
