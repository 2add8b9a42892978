//! Legal Monitor Library
//!
//! Success-rate and expected-error classification for automated police and
//! statistics submissions, as shown on a compliance dashboard.
//!
//! This library provides tools for:
//! - Loading exported police (single-status) and statistics (dual-status) records
//! - Grouping records into per-channel state counts
//! - Classifying channel-specific errors that reflect bad input data rather than failures
//! - Computing success rates with those expected errors excluded
//! - Mapping rates onto Good / Warning / Error status
//! - Dashboard summaries, recent records and reason breakdowns per channel

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod models;
pub mod source;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::MonitorConfig;
pub use engine::{ChannelReport, RateEngine, Status};
pub use error::{MonitorError, Result};
pub use models::{PoliceRecord, StatRecord, StateCounts, StateSet};
