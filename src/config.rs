//! Configuration management and validation.
//!
//! Provides the state categories, status thresholds and listing limits used
//! when building channel reports. Values come from the built-in defaults,
//! optionally overlaid by a TOML file and then by CLI flags.

use crate::constants::{
    DEFAULT_RECENT_RECORDS_LIMIT, ERROR_STATES, IN_PROGRESS_STATES, SUCCESS_STATES,
};
use crate::engine::StatusThresholds;
use crate::error::{MonitorError, Result};
use crate::models::StateSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Settings for success-rate reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// States counted as successful submissions
    pub success_states: StateSet,

    /// States counted as errors unless a channel classifier excuses them
    pub error_states: StateSet,

    /// States excluded from the service-level rate
    pub in_progress_states: StateSet,

    /// Status thresholds (inclusive lower bounds)
    pub thresholds: StatusThresholds,

    /// Number of records in a channel's recent-records listing
    pub recent_records_limit: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            success_states: StateSet::from_slice(SUCCESS_STATES),
            error_states: StateSet::from_slice(ERROR_STATES),
            in_progress_states: StateSet::from_slice(IN_PROGRESS_STATES),
            thresholds: StatusThresholds::default(),
            recent_records_limit: DEFAULT_RECENT_RECORDS_LIMIT,
        }
    }
}

impl MonitorConfig {
    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: MonitorConfig = toml::from_str(text)?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Reading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_success_states(mut self, states: StateSet) -> Self {
        self.success_states = states;
        self
    }

    pub fn with_error_states(mut self, states: StateSet) -> Self {
        self.error_states = states;
        self
    }

    pub fn with_in_progress_states(mut self, states: StateSet) -> Self {
        self.in_progress_states = states;
        self
    }

    pub fn with_thresholds(mut self, good: f64, warning: f64) -> Self {
        self.thresholds = StatusThresholds { good, warning };
        self
    }

    pub fn with_recent_records_limit(mut self, limit: usize) -> Self {
        self.recent_records_limit = limit;
        self
    }

    /// Check thresholds are ordered within 0-100 and state categories don't overlap
    pub fn validate(&self) -> Result<()> {
        let StatusThresholds { good, warning } = self.thresholds;
        if !good.is_finite() || !warning.is_finite() {
            return Err(MonitorError::configuration(
                "status thresholds must be finite numbers",
            ));
        }
        if !(0.0..=100.0).contains(&warning) || !(0.0..=100.0).contains(&good) {
            return Err(MonitorError::configuration(format!(
                "status thresholds must lie within 0-100 (good = {}, warning = {})",
                good, warning
            )));
        }
        if warning > good {
            return Err(MonitorError::configuration(format!(
                "warning threshold {} is above good threshold {}",
                warning, good
            )));
        }

        let categories = [
            ("success", &self.success_states),
            ("error", &self.error_states),
            ("in-progress", &self.in_progress_states),
        ];
        for (i, (name, states)) in categories.iter().enumerate() {
            for (other_name, other) in categories.iter().skip(i + 1) {
                if let Some(state) = states.intersection(other).next() {
                    return Err(MonitorError::configuration(format!(
                        "state {} is listed as both {} and {}",
                        state, name, other_name
                    )));
                }
            }
        }

        if self.recent_records_limit == 0 {
            return Err(MonitorError::configuration(
                "recent_records_limit must be at least 1",
            ));
        }

        Ok(())
    }
}
