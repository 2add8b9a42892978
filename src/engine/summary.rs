//! Dashboard-wide aggregation of channel reports
//!
//! Two overall rates are reported. The weighted rate averages the per-channel
//! rates (which already exclude expected errors) by record volume. The
//! service rate is the plain `success / completed` ratio over the merged
//! state distribution and drives the overall service status.

use super::ChannelReport;
use super::status::Status;
use super::success_rate::round_to_one_decimal;
use crate::config::MonitorConfig;
use crate::constants::ERROR_STATE;
use crate::models::{StateCounts, StateSet};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_records: u64,
    pub weighted_success_rate: f64,
    pub service_rate: f64,
    pub service_status: Status,
    pub error_count: u64,
    pub active_types: usize,
    pub states: StateCounts,
    /// Sorted by success rate, highest first
    pub channels: Vec<ChannelReport>,
}

impl DashboardSummary {
    pub fn from_reports(mut reports: Vec<ChannelReport>, config: &MonitorConfig) -> Self {
        reports.sort_by(|a, b| b.success_rate.total_cmp(&a.success_rate));

        let mut states = StateCounts::new();
        for report in &reports {
            states.merge(&report.states);
        }

        let service_rate = service_rate(
            &states,
            states.count_in(&config.success_states),
            &config.in_progress_states,
        );

        Self {
            total_records: reports.iter().map(|r| r.total_records).sum(),
            weighted_success_rate: weighted_success_rate(&reports),
            service_rate: round_to_one_decimal(service_rate),
            service_status: config.thresholds.classify(service_rate),
            error_count: states.get(ERROR_STATE),
            active_types: reports.len(),
            states,
            channels: reports,
        }
    }

    pub fn channel(&self, channel_type: &str) -> Option<&ChannelReport> {
        self.channels
            .iter()
            .find(|report| report.channel_type == channel_type)
    }
}

/// Channel rates averaged by record volume; 0.0 without records
pub fn weighted_success_rate(reports: &[ChannelReport]) -> f64 {
    let total: u64 = reports.iter().map(|r| r.total_records).sum();
    if total == 0 {
        return 0.0;
    }
    let weighted: f64 = reports
        .iter()
        .map(|r| r.success_rate * r.total_records as f64)
        .sum();
    round_to_one_decimal(weighted / total as f64)
}

/// Unrounded `success / completed * 100` where completed excludes in-progress states
///
/// The service status is classified on this value, before rounding.
fn service_rate(states: &StateCounts, success_count: u64, in_progress: &StateSet) -> f64 {
    let completed = states.completed(in_progress);
    if completed == 0 {
        return 0.0;
    }
    success_count as f64 / completed as f64 * 100.0
}
