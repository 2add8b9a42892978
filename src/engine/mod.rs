//! Success-rate and expected-error classification engine
//!
//! This module turns raw per-record state/reason data into per-channel
//! success rates and status labels. Both submission pipelines (single-status
//! police records and dual-status statistics records) go through the same
//! components.
//!
//! # Architecture
//!
//! - [`classifier`] - The [`ErrorClassifier`] policy and the built-in per-channel classifiers
//! - [`registry`] - Channel id to classifier lookup with a default fallback
//! - [`error_filter`] - Selects the genuine (not expected) error outcomes
//! - [`success_rate`] - Success percentage with expected errors excluded
//! - [`status`] - Good / Warning / Error mapping of a rate
//! - [`summary`] - Dashboard-wide aggregation of channel reports
//! - [`detail`] - Per-channel recent records and reason breakdowns
//!
//! # Pipeline
//!
//! 1. **Grouping** (done by the record source): state counts and sample documents per channel
//! 2. **Error filtering**: error-state outcomes minus those the channel classifier expects
//! 3. **Rate**: `success / (success + genuine_errors) * 100`, 0.0 when nothing was decided
//! 4. **Status**: thresholds at 90 (Good) and 70 (Warning)
//!
//! The engine performs no I/O and holds no state between calls, so one
//! [`RateEngine`] can be shared across threads and requests.
//!
//! # Example Usage
//!
//! ```rust
//! use legal_monitor::engine::{RateEngine, Status};
//! use legal_monitor::models::{PoliceRecord, StateCounts};
//!
//! let engine = RateEngine::default();
//! let docs = vec![
//!     PoliceRecord::new("SPAIN_HOS", "SUCCESS").with_reason("Confirmed"),
//!     PoliceRecord::new("SPAIN_HOS", "INVALID")
//!         .with_reason("Invalid name format. Name and first surname are required."),
//! ];
//! let counts = StateCounts::from_states(docs.iter().map(|d| d.state()));
//!
//! let report = engine.report_channel("SPAIN_HOS", &counts, &docs);
//! assert_eq!(report.success_rate, 100.0);
//! assert_eq!(report.status, Status::Good);
//! ```

pub mod classifier;
pub mod detail;
pub mod error_filter;
pub mod registry;
pub mod status;
pub mod success_rate;
pub mod summary;

#[cfg(test)]
pub mod tests;

pub use classifier::{DefaultClassifier, ErrorClassifier, PatternClassifier};
pub use detail::{ReasonCount, reason_breakdown, recent_records};
pub use error_filter::{ErrorEvent, count_expected_errors, filter_genuine_errors};
pub use registry::ClassifierRegistry;
pub use status::{Status, StatusThresholds};
pub use success_rate::{compute_rate, rate_from_counts};
pub use summary::DashboardSummary;

use crate::config::MonitorConfig;
use crate::models::{ChannelSample, OutcomeRecord, StateCounts, StateSet};
use serde::Serialize;
use tracing::debug;

/// Computed result for one channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReport {
    pub channel_type: String,
    /// Percentage in 0.0-100.0, one decimal
    pub success_rate: f64,
    pub status: Status,
    pub success_count: u64,
    pub total_records: u64,
    pub genuine_errors: u64,
    pub expected_errors: u64,
    pub states: StateCounts,
}

/// Registry and configuration bundled for report building
#[derive(Debug, Clone, Default)]
pub struct RateEngine {
    registry: ClassifierRegistry,
    config: MonitorConfig,
}

impl RateEngine {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            registry: ClassifierRegistry::builtin(),
            config,
        }
    }

    pub fn with_registry(mut self, registry: ClassifierRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &ClassifierRegistry {
        &self.registry
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn get_classifier(&self, channel_type: &str) -> &dyn ErrorClassifier {
        self.registry.get_classifier(channel_type)
    }

    pub fn filter_genuine_errors<'a, R: OutcomeRecord>(
        &self,
        docs: &'a [R],
        channel_type: &str,
        error_states: &StateSet,
    ) -> Vec<ErrorEvent<'a, R>> {
        filter_genuine_errors(&self.registry, docs, channel_type, error_states)
    }

    pub fn compute_rate<R: OutcomeRecord>(
        &self,
        success_count: u64,
        error_states: &StateSet,
        docs: &[R],
        channel_type: &str,
    ) -> f64 {
        compute_rate(&self.registry, success_count, error_states, docs, channel_type)
    }

    pub fn classify(&self, rate: f64) -> Status {
        self.config.thresholds.classify(rate)
    }

    /// Build the report for one channel from its grouped counts and sample documents
    pub fn report_channel<R: OutcomeRecord>(
        &self,
        channel_type: &str,
        counts: &StateCounts,
        docs: &[R],
    ) -> ChannelReport {
        let error_states = &self.config.error_states;
        let success_count = counts.count_in(&self.config.success_states);
        let genuine_errors =
            filter_genuine_errors(&self.registry, docs, channel_type, error_states).len() as u64;
        let expected_errors =
            count_expected_errors(&self.registry, docs, channel_type, error_states) as u64;
        let success_rate = rate_from_counts(success_count, genuine_errors);
        let status = self.classify(success_rate);

        debug!(
            "Channel {}: {} successes, {} genuine errors, {} expected errors -> {:.1}% ({})",
            channel_type, success_count, genuine_errors, expected_errors, success_rate, status
        );

        ChannelReport {
            channel_type: channel_type.to_string(),
            success_rate,
            status,
            success_count,
            total_records: counts.total(),
            genuine_errors,
            expected_errors,
            states: counts.clone(),
        }
    }

    /// Reports for every channel, highest success rate first
    pub fn report_channels<R: OutcomeRecord>(
        &self,
        samples: &[ChannelSample<R>],
    ) -> Vec<ChannelReport> {
        let mut reports: Vec<ChannelReport> = samples
            .iter()
            .map(|sample| self.report_channel(&sample.channel_type, &sample.counts, &sample.docs))
            .collect();
        reports.sort_by(|a, b| b.success_rate.total_cmp(&a.success_rate));
        reports
    }

    /// Dashboard overview built from channel reports
    pub fn summarize(&self, reports: Vec<ChannelReport>) -> DashboardSummary {
        DashboardSummary::from_reports(reports, &self.config)
    }
}
