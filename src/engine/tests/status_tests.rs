//! Tests for status classification

use super::*;
use crate::engine::{Status, StatusThresholds};

#[test]
fn test_threshold_boundaries() {
    assert_eq!(Status::from_rate(100.0), Status::Good);
    assert_eq!(Status::from_rate(90.0), Status::Good);
    assert_eq!(Status::from_rate(89.9), Status::Warning);
    assert_eq!(Status::from_rate(70.0), Status::Warning);
    assert_eq!(Status::from_rate(69.9), Status::Error);
    assert_eq!(Status::from_rate(0.0), Status::Error);
}

#[test]
fn test_nan_is_error() {
    assert_eq!(Status::from_rate(f64::NAN), Status::Error);
}

#[test]
fn test_presentation_values() {
    assert_eq!(Status::Good.label(), "Good");
    assert_eq!(Status::Good.color(), "green");
    assert_eq!(Status::Good.icon(), "check");

    assert_eq!(Status::Warning.label(), "Warning");
    assert_eq!(Status::Warning.color(), "orange");
    assert_eq!(Status::Warning.icon(), "triangle-alert");

    assert_eq!(Status::Error.label(), "Error");
    assert_eq!(Status::Error.color(), "red");
    assert_eq!(Status::Error.icon(), "circle-x");

    assert_eq!(Status::Warning.to_string(), "Warning");
}

#[test]
fn test_custom_thresholds() {
    let thresholds = StatusThresholds {
        good: 95.0,
        warning: 50.0,
    };

    assert_eq!(thresholds.classify(94.9), Status::Warning);
    assert_eq!(thresholds.classify(95.0), Status::Good);
    assert_eq!(thresholds.classify(50.0), Status::Warning);
    assert_eq!(thresholds.classify(49.9), Status::Error);
}

#[test]
fn test_scenario_rates_map_to_status() {
    let registry = crate::engine::ClassifierRegistry::builtin();
    let rate = crate::engine::compute_rate(
        &registry,
        2,
        &fixture_error_states(),
        &spain_hos_docs(),
        "SPAIN_HOS",
    );
    assert_eq!(Status::from_rate(rate), Status::Good);

    let rate = crate::engine::compute_rate(&registry, 1, &fixture_error_states(), &itla_docs(), "ITLA");
    assert_eq!(Status::from_rate(rate), Status::Error);
}

#[test]
fn test_status_serializes_as_variant_name() {
    let json = serde_json::to_string(&Status::Warning).unwrap();
    assert_eq!(json, r#""Warning""#);
}
