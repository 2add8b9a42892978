//! Command implementations for the submission monitor CLI
//!
//! Each command loads its record files on a blocking task, runs the rate
//! engine and prints either a colored table or JSON to stdout. Logs go to
//! stderr.

use crate::cli::args::{Args, Commands, CommonArgs, OutputFormat, ReasonsArgs, ReportArgs};
use crate::config::MonitorConfig;
use crate::engine::{ChannelReport, DashboardSummary, RateEngine, ReasonCount, Status};
use crate::engine::{reason_breakdown, recent_records};
use crate::models::{OutcomeRecord, Pipeline, PoliceRecord, StateSet};
use crate::source::{RecordSource, group_by_channel};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Instant;
use tracing::{debug, info};

/// Main command runner
///
/// Dispatches to the report or reasons command.
pub async fn run(args: Args) -> Result<()> {
    if let Some(common) = args.common() {
        setup_logging(common)?;
    }
    debug!("Command line arguments: {:?}", args);

    match args.command {
        Some(Commands::Police(report_args)) => run_report(Pipeline::Police, report_args).await,
        Some(Commands::Statistics(report_args)) => {
            run_report(Pipeline::Statistics, report_args).await
        }
        Some(Commands::Reasons(reasons_args)) => run_reasons(reasons_args).await,
        None => anyhow::bail!("No command given"),
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("legal_monitor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load the configuration file if one was given, else defaults, then apply
/// CLI overrides and validate
pub fn load_configuration(args: &CommonArgs) -> Result<MonitorConfig> {
    let config = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            MonitorConfig::load(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?
        }
        None => {
            info!("No config file given, using defaults");
            MonitorConfig::default()
        }
    };

    let config = apply_cli_overrides(config, args);
    config.validate()?;
    debug!(
        "States: success [{}], error [{}], in progress [{}]",
        describe_states(&config.success_states),
        describe_states(&config.error_states),
        describe_states(&config.in_progress_states)
    );
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Replace config values with those given on the command line
fn apply_cli_overrides(mut config: MonitorConfig, args: &CommonArgs) -> MonitorConfig {
    let success: StateSet = args.success_states.iter().cloned().collect();
    if !success.is_empty() {
        config = config.with_success_states(success);
    }
    let errors: StateSet = args.error_states.iter().cloned().collect();
    if !errors.is_empty() {
        config = config.with_error_states(errors);
    }
    let in_progress: StateSet = args.in_progress_states.iter().cloned().collect();
    if !in_progress.is_empty() {
        config = config.with_in_progress_states(in_progress);
    }
    if args.good_threshold.is_some() || args.warning_threshold.is_some() {
        let good = args.good_threshold.unwrap_or(config.thresholds.good);
        let warning = args.warning_threshold.unwrap_or(config.thresholds.warning);
        config = config.with_thresholds(good, warning);
    }
    config
}

fn describe_states(states: &StateSet) -> String {
    let names: Vec<&str> = states.iter().collect();
    format!("{} states: {}", states.len(), names.join(", "))
}

async fn run_report(pipeline: Pipeline, args: ReportArgs) -> Result<()> {
    let start_time = Instant::now();
    info!("Starting {} report", pipeline);

    let engine = RateEngine::new(load_configuration(&args.common)?);
    let source = RecordSource::new(args.common.inputs.clone());

    let reports = match pipeline {
        Pipeline::Police => {
            let mut records = load_records(source, RecordSource::load_police, pipeline).await?;
            retain_channels(&mut records, &args.channels);
            engine.report_channels(&group_by_channel(records)?)
        }
        Pipeline::Statistics => {
            let mut records =
                load_records(source, RecordSource::load_statistics, pipeline).await?;
            retain_channels(&mut records, &args.channels);
            engine.report_channels(&group_by_channel(records)?)
        }
    };

    let summary = engine.summarize(reports);
    info!(
        "Computed {} channel reports over {} records in {:.2?}",
        summary.active_types,
        summary.total_records,
        start_time.elapsed()
    );

    match args.common.output_format {
        OutputFormat::Table => print!("{}", render_report_table(pipeline, &summary)),
        OutputFormat::Json => {
            let output = ReportOutput::new(pipeline, &summary, Utc::now());
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

async fn run_reasons(args: ReasonsArgs) -> Result<()> {
    info!("Inspecting channel {}", args.channel);

    let mut config = load_configuration(&args.common)?;
    if let Some(limit) = args.limit {
        config = config.with_recent_records_limit(limit);
        config.validate()?;
    }
    let limit = config.recent_records_limit;
    let source = RecordSource::new(args.common.inputs.clone());

    let records = load_records(source, RecordSource::load_police, Pipeline::Police).await?;

    let reasons = reason_breakdown(&records, &args.channel, &args.state);
    let recent = recent_records(&records, &args.channel, limit);
    debug!(
        "{} distinct {} reasons, {} recent records for {}",
        reasons.len(),
        args.state,
        recent.len(),
        args.channel
    );

    match args.common.output_format {
        OutputFormat::Table => print!(
            "{}",
            render_reasons_table(&args.channel, &args.state, &reasons, &recent)
        ),
        OutputFormat::Json => {
            let output = ReasonsOutput {
                channel_type: &args.channel,
                state: &args.state,
                reasons: &reasons,
                recent_records: &recent,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Run a blocking Polars load off the async runtime
async fn load_records<R, F>(source: RecordSource, load: F, pipeline: Pipeline) -> Result<Vec<R>>
where
    R: Send + 'static,
    F: FnOnce(&RecordSource) -> crate::Result<Vec<R>> + Send + 'static,
{
    tokio::task::spawn_blocking(move || load(&source))
        .await
        .context("Record loading task failed")?
        .with_context(|| format!("Failed to load {} records", pipeline))
}

/// Drop records of channels not asked for; an empty filter keeps everything
fn retain_channels<R: OutcomeRecord>(records: &mut Vec<R>, channels: &[String]) {
    if channels.is_empty() {
        return;
    }
    let before = records.len();
    records.retain(|record| channels.iter().any(|c| c == record.channel_type()));
    debug!(
        "Channel filter kept {} of {} records",
        records.len(),
        before
    );
}

fn colorize_status(status: Status) -> ColoredString {
    match status {
        Status::Good => status.label().bright_green().bold(),
        Status::Warning => status.label().yellow().bold(),
        Status::Error => status.label().bright_red().bold(),
    }
}

fn render_report_table(pipeline: Pipeline, summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let title = format!("{} submissions", pipeline);

    let _ = writeln!(out, "\n{}", title.bright_green().bold());
    let _ = writeln!(
        out,
        "{:<16} {:>9} {:>8} {:>8} {:>9} {:>8}  {}",
        "CHANNEL", "RATE", "TOTAL", "SUCCESS", "EXPECTED", "ERRORS", "STATUS"
    );
    for report in &summary.channels {
        let _ = writeln!(
            out,
            "{:<16} {:>8.1}% {:>8} {:>8} {:>9} {:>8}  {}",
            report.channel_type,
            report.success_rate,
            report.total_records,
            report.success_count,
            report.expected_errors,
            report.genuine_errors,
            colorize_status(report.status)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Channels:        {}",
        summary.active_types.to_string().bright_white().bold()
    );
    let _ = writeln!(
        out,
        "  Records:         {}",
        summary.total_records.to_string().bright_white().bold()
    );
    let _ = writeln!(out, "  Weighted rate:   {:.1}%", summary.weighted_success_rate);
    let _ = writeln!(
        out,
        "  Service rate:    {:.1}% ({})",
        summary.service_rate,
        colorize_status(summary.service_status)
    );
    let _ = writeln!(out, "  ERROR records:   {}", summary.error_count);
    out
}

fn render_reasons_table(
    channel: &str,
    state: &str,
    reasons: &[ReasonCount],
    recent: &[&PoliceRecord],
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n{}",
        format!("{} reasons for {}", state, channel).bright_green().bold()
    );
    if reasons.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for entry in reasons {
        let _ = writeln!(out, "{:>8}  {}", entry.count, entry.reason);
    }

    let _ = writeln!(out, "\n{}", "Recent records".bright_green().bold());
    if recent.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for record in recent {
        let created = record
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<20} {:<12} {}",
            created,
            record.state(),
            record.reason()
        );
    }
    out
}

/// Status with its presentation values
#[derive(Debug, Serialize)]
struct StatusView {
    status: Status,
    label: &'static str,
    color: &'static str,
    icon: &'static str,
}

impl From<Status> for StatusView {
    fn from(status: Status) -> Self {
        Self {
            status,
            label: status.label(),
            color: status.color(),
            icon: status.icon(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChannelView<'a> {
    #[serde(flatten)]
    report: &'a ChannelReport,
    presentation: StatusView,
}

#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    pipeline: Pipeline,
    generated_at: DateTime<Utc>,
    total_records: u64,
    weighted_success_rate: f64,
    service_rate: f64,
    service_status: StatusView,
    error_count: u64,
    active_types: usize,
    states: &'a crate::models::StateCounts,
    channels: Vec<ChannelView<'a>>,
}

impl<'a> ReportOutput<'a> {
    fn new(pipeline: Pipeline, summary: &'a DashboardSummary, generated_at: DateTime<Utc>) -> Self {
        Self {
            pipeline,
            generated_at,
            total_records: summary.total_records,
            weighted_success_rate: summary.weighted_success_rate,
            service_rate: summary.service_rate,
            service_status: summary.service_status.into(),
            error_count: summary.error_count,
            active_types: summary.active_types,
            states: &summary.states,
            channels: summary
                .channels
                .iter()
                .map(|report| ChannelView {
                    report,
                    presentation: report.status.into(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReasonsOutput<'a> {
    channel_type: &'a str,
    state: &'a str,
    reasons: &'a [ReasonCount],
    recent_records: &'a [&'a PoliceRecord],
}
