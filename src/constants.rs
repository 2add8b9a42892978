//! Application constants for the submission monitor
//!
//! State categories, status thresholds and presentation values, and the
//! column names used by exported record files.

// =============================================================================
// State Categories
// =============================================================================

/// States denoting work that has not concluded yet
pub const IN_PROGRESS_STATES: &[&str] = &["NEW", "IN_PROGRESS", "PROGRESS"];

/// States counted as a successful submission
pub const SUCCESS_STATES: &[&str] = &["SUCCESS", "CONFIRMED", "COMPLETE"];

/// States counted as a failed submission unless excused by a classifier
pub const ERROR_STATES: &[&str] = &["ERROR", "FAILED", "INVALID"];

/// The state tallied as the dashboard's error count
pub const ERROR_STATE: &str = "ERROR";

/// States hidden from the recent-records listing
pub const RECENT_RECORDS_EXCLUDED_STATES: &[&str] = &["NEW", "SCHEDULED", "CANCELED"];

/// Default number of records shown in a channel's recent-records listing
pub const DEFAULT_RECENT_RECORDS_LIMIT: usize = 10;

// =============================================================================
// Status Thresholds and Presentation
// =============================================================================

/// Success rates at or above this are Good
pub const GOOD_THRESHOLD: f64 = 90.0;

/// Success rates at or above this (and below good) are Warning
pub const WARNING_THRESHOLD: f64 = 70.0;

pub mod status_labels {
    pub const GOOD: &str = "Good";
    pub const WARNING: &str = "Warning";
    pub const ERROR: &str = "Error";
}

pub mod status_colors {
    pub const GOOD: &str = "green";
    pub const WARNING: &str = "orange";
    pub const ERROR: &str = "red";
}

pub mod status_icons {
    pub const GOOD: &str = "check";
    pub const WARNING: &str = "triangle-alert";
    pub const ERROR: &str = "circle-x";
}

// =============================================================================
// Record File Columns
// =============================================================================

/// Columns of exported police (single-status) records
pub mod police_columns {
    pub const CHANNEL: &str = "police_type";
    pub const STATE: &str = "state";
    pub const REASON: &str = "reason";
    pub const CREATED_AT: &str = "created_at";
}

/// Columns of exported statistics (dual-status) records
pub mod stat_columns {
    pub const CHANNEL: &str = "stat_type";
    pub const CHECK_IN_STATE: &str = "status_check_in";
    pub const CHECK_OUT_STATE: &str = "status_check_out";
    pub const CHECK_IN_DETAILS: &str = "status_check_in_details";
    pub const CHECK_OUT_DETAILS: &str = "status_check_out_details";
    pub const CREATED_AT: &str = "created_at";
}

/// Column names of the grouped count frame
pub mod grouped_columns {
    pub const CHANNEL: &str = "channel";
    pub const STATE: &str = "state";
    pub const COUNT: &str = "count";
}

/// Supported record file extensions
pub const CSV_EXTENSION: &str = "csv";
pub const PARQUET_EXTENSION: &str = "parquet";
