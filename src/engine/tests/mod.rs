//! Tests for the success-rate engine
//!
//! Unit tests for classification, error filtering, rate calculation, status
//! mapping and the dashboard aggregation built on top of them.

pub mod error_filter_tests;
pub mod status_tests;

// Test helper functions and fixtures
use crate::models::{PoliceRecord, StatRecord, StateSet};
use chrono::{TimeZone, Utc};

/// Error states used by the source test fixtures
pub fn fixture_error_states() -> StateSet {
    StateSet::from_slice(&["ERROR", "INVALID"])
}

/// Create a police record with a reason
pub fn police(channel: &str, state: &str, reason: &str) -> PoliceRecord {
    PoliceRecord::new(channel, state).with_reason(reason)
}

/// Create a police record with a reason and a creation day in May 2024
pub fn police_on_day(channel: &str, state: &str, reason: &str, day: u32) -> PoliceRecord {
    police(channel, state, reason)
        .with_created_at(Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap())
}

/// Create a statistics record with check-in / check-out details
pub fn stat(
    channel: &str,
    check_in: &str,
    check_out: &str,
    check_in_details: &str,
    check_out_details: &str,
) -> StatRecord {
    StatRecord::new(channel, check_in, check_out).with_details(check_in_details, check_out_details)
}

/// The SPAIN_HOS sample documents: two confirmations and one expected INVALID
pub fn spain_hos_docs() -> Vec<PoliceRecord> {
    vec![
        police("SPAIN_HOS", "SUCCESS", "Confirmed"),
        police("SPAIN_HOS", "SUCCESS", "Confirmed"),
        police(
            "SPAIN_HOS",
            "INVALID",
            "Invalid name format. Name and first surname are required.",
        ),
    ]
}

/// The ITLA sample documents: one clean pair and one failed check-in
pub fn itla_docs() -> Vec<StatRecord> {
    vec![
        stat(
            "ITLA",
            "COMPLETE",
            "COMPLETE",
            "Reservation(3b58258d980040709a57959dd0ee0153) check-in: status - COMPLETE, response - <soap:Envelope ...>",
            "Reservation(3b58258d980040709a57959dd0ee0153) check-out: status - COMPLETE, response - <soap:Envelope ...>",
        ),
        stat(
            "ITLA",
            "ERROR",
            "COMPLETE",
            "Reservation(57304ddceba5492e9a01981eddaa9095) check-in: status - ERROR, response - <soap:Envelope ...>",
            "Reservation(57304ddceba5492e9a01981eddaa9095) check-out: status - COMPLETE, response - <soap:Envelope ...>",
        ),
    ]
}
