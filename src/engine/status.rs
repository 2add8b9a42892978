//! Three-tier status classification of success rates

use crate::constants::{
    GOOD_THRESHOLD, WARNING_THRESHOLD, status_colors, status_icons, status_labels,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Good,
    Warning,
    Error,
}

impl Status {
    /// Classify a rate with the default thresholds
    pub fn from_rate(rate: f64) -> Self {
        StatusThresholds::default().classify(rate)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Good => status_labels::GOOD,
            Status::Warning => status_labels::WARNING,
            Status::Error => status_labels::ERROR,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Status::Good => status_colors::GOOD,
            Status::Warning => status_colors::WARNING,
            Status::Error => status_colors::ERROR,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Status::Good => status_icons::GOOD,
            Status::Warning => status_icons::WARNING,
            Status::Error => status_icons::ERROR,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive lower bounds for Good and Warning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    pub good: f64,
    pub warning: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            good: GOOD_THRESHOLD,
            warning: WARNING_THRESHOLD,
        }
    }
}

impl StatusThresholds {
    /// Anything that is neither Good nor Warning (including NaN) is Error
    pub fn classify(&self, rate: f64) -> Status {
        if rate >= self.good {
            Status::Good
        } else if rate >= self.warning {
            Status::Warning
        } else {
            Status::Error
        }
    }
}
