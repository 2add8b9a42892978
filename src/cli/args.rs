//! Command-line argument definitions for the submission monitor
//!
//! Defines the CLI interface using the clap derive API.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the submission monitor
///
/// Loads exported police and statistics records, computes per-channel
/// success rates with expected errors excluded, and reports their status.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "legal-monitor",
    version,
    about = "Success rates and status for police and statistics submissions",
    long_about = "Reads exported police (single-status) and statistics (dual-status) \
                  submission records from CSV or Parquet files, groups them per channel \
                  and reports success rates that ignore errors each channel is known to \
                  produce for bad guest data."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Per-channel report for police registrations
    Police(ReportArgs),
    /// Per-channel report for check-in / check-out statistics
    Statistics(ReportArgs),
    /// Reason breakdown and recent records for one police channel
    Reasons(ReasonsArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Parser)]
pub struct CommonArgs {
    /// Record files to load (paths or glob patterns, .csv or .parquet)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH|GLOB",
        required = true,
        num_args = 1..,
        help = "Record files to load (paths or glob patterns)"
    )]
    pub inputs: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to a TOML configuration file"
    )]
    pub config_file: Option<PathBuf>,

    /// Increase logging verbosity
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress log output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Replace the configured success states
    #[arg(
        long = "success-state",
        value_name = "STATE",
        help = "State counted as success, overriding the config (repeatable)"
    )]
    pub success_states: Vec<String>,

    /// Replace the configured error states
    #[arg(
        long = "error-state",
        value_name = "STATE",
        help = "State counted as error, overriding the config (repeatable)"
    )]
    pub error_states: Vec<String>,

    /// Replace the configured in-progress states
    #[arg(
        long = "in-progress-state",
        value_name = "STATE",
        help = "State counted as in progress, overriding the config (repeatable)"
    )]
    pub in_progress_states: Vec<String>,

    /// Lowest rate reported as Good
    #[arg(long = "good-threshold", value_name = "PERCENT")]
    pub good_threshold: Option<f64>,

    /// Lowest rate reported as Warning
    #[arg(long = "warning-threshold", value_name = "PERCENT")]
    pub warning_threshold: Option<f64>,

    /// Output format
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

impl CommonArgs {
    /// Log level implied by `--verbose` / `--quiet`
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Arguments for the police and statistics report commands
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Only report these channels
    #[arg(
        long = "channel",
        value_name = "TYPE",
        help = "Only report the given channel (repeatable)"
    )]
    pub channels: Vec<String>,
}

/// Arguments for the reasons command
#[derive(Debug, Clone, Parser)]
pub struct ReasonsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Police channel to inspect
    #[arg(long = "channel", value_name = "TYPE", help = "Police channel to inspect")]
    pub channel: String,

    /// State whose reasons are tallied
    #[arg(
        long = "state",
        value_name = "STATE",
        default_value = "ERROR",
        help = "State whose reasons are tallied"
    )]
    pub state: String,

    /// Number of recent records to list
    #[arg(
        long = "limit",
        value_name = "N",
        help = "Number of recent records to list (default from config, else 10)"
    )]
    pub limit: Option<usize>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON for scripting
    Json,
}

impl Args {
    /// Common options of whichever subcommand was given
    pub fn common(&self) -> Option<&CommonArgs> {
        match self.command.as_ref()? {
            Commands::Police(args) | Commands::Statistics(args) => Some(&args.common),
            Commands::Reasons(args) => Some(&args.common),
        }
    }
}

impl Default for CommonArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            config_file: None,
            verbose: 0,
            quiet: false,
            success_states: Vec::new(),
            error_states: Vec::new(),
            in_progress_states: Vec::new(),
            good_threshold: None,
            warning_threshold: None,
            output_format: OutputFormat::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing_police() {
        let args = Args::try_parse_from([
            "legal-monitor",
            "police",
            "--input",
            "data/police_*.csv",
            "--channel",
            "MOS",
            "--channel",
            "ISP",
            "--format",
            "json",
        ])
        .unwrap();

        match args.command {
            Some(Commands::Police(report)) => {
                assert_eq!(report.common.inputs, vec!["data/police_*.csv"]);
                assert_eq!(report.channels, vec!["MOS", "ISP"]);
                assert_eq!(report.common.output_format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_require_input() {
        let result = Args::try_parse_from(["legal-monitor", "statistics"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_parsing_reasons_defaults() {
        let args = Args::try_parse_from([
            "legal-monitor",
            "reasons",
            "-i",
            "police.parquet",
            "--channel",
            "MOS",
        ])
        .unwrap();

        match args.command {
            Some(Commands::Reasons(reasons)) => {
                assert_eq!(reasons.channel, "MOS");
                assert_eq!(reasons.state, "ERROR");
                assert_eq!(reasons.limit, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_parsing_config_overrides() {
        let args = Args::try_parse_from([
            "legal-monitor",
            "statistics",
            "-i",
            "stats.csv",
            "--success-state",
            "COMPLETE",
            "--success-state",
            "DONE",
            "--error-state",
            "ERROR",
            "--good-threshold",
            "95",
        ])
        .unwrap();

        let common = args.common().unwrap();
        assert_eq!(common.success_states, vec!["COMPLETE", "DONE"]);
        assert_eq!(common.error_states, vec!["ERROR"]);
        assert!(common.in_progress_states.is_empty());
        assert_eq!(common.good_threshold, Some(95.0));
        assert_eq!(common.warning_threshold, None);
    }

    #[test]
    fn test_log_level() {
        let mut common = CommonArgs::default();
        assert_eq!(common.get_log_level(), "warn");

        common.verbose = 2;
        assert_eq!(common.get_log_level(), "debug");

        common.verbose = 5;
        assert_eq!(common.get_log_level(), "trace");

        common.quiet = true;
        assert_eq!(common.get_log_level(), "error");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result =
            Args::try_parse_from(["legal-monitor", "police", "-i", "a.csv", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_common_accessor() {
        let args = Args::try_parse_from(["legal-monitor", "police", "-i", "a.csv", "-vv"]).unwrap();
        assert_eq!(args.common().map(|c| c.verbose), Some(2));

        let none = Args { command: None };
        assert!(none.common().is_none());
    }
}
