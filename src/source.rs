//! Record source backed by exported collection files.
//!
//! Reads CSV or Parquet exports of the police and statistics collections
//! with Polars, converts rows into [`PoliceRecord`] / [`StatRecord`] values
//! and runs the grouping query that yields per-channel state counts. For
//! statistics records the check-in and check-out states are stacked before
//! grouping, so each document contributes two state entries.

use crate::constants::{
    CSV_EXTENSION, PARQUET_EXTENSION, grouped_columns, police_columns, stat_columns,
};
use crate::error::{MonitorError, Result};
use crate::models::{ChannelSample, OutcomeRecord, PoliceRecord, StatRecord, StateCounts};
use chrono::{DateTime, NaiveDateTime, Utc};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Input files given as paths or glob patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSource {
    inputs: Vec<String>,
}

impl RecordSource {
    pub fn new<S: Into<String>>(inputs: impl IntoIterator<Item = S>) -> Self {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new([path.to_string_lossy().into_owned()])
    }

    /// Expand inputs into existing files, sorted and de-duplicated
    pub fn resolve_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();

        for input in &self.inputs {
            let direct = Path::new(input);
            if direct.is_file() {
                paths.push(direct.to_path_buf());
                continue;
            }

            let matches = glob::glob(input).map_err(|e| MonitorError::InvalidPattern {
                pattern: input.clone(),
                reason: e.to_string(),
            })?;

            let mut matched = 0;
            for entry in matches {
                let path = entry.map_err(|e| MonitorError::Io(e.into()))?;
                if path.is_file() {
                    paths.push(path);
                    matched += 1;
                }
            }

            if matched == 0 {
                return Err(MonitorError::InputNotFound {
                    pattern: input.clone(),
                });
            }
        }

        paths.sort();
        paths.dedup();
        debug!("Resolved {} record files", paths.len());
        Ok(paths)
    }

    /// Load police records from every input file
    pub fn load_police(&self) -> Result<Vec<PoliceRecord>> {
        let mut records = Vec::new();
        for path in self.resolve_paths()? {
            let frame = read_frame(&path)?;
            let mut loaded = police_records_from_frame(&frame, &path)?;
            debug!("Loaded {} police records from {}", loaded.len(), path.display());
            records.append(&mut loaded);
        }
        info!("Loaded {} police records", records.len());
        Ok(records)
    }

    /// Load statistics records from every input file
    pub fn load_statistics(&self) -> Result<Vec<StatRecord>> {
        let mut records = Vec::new();
        for path in self.resolve_paths()? {
            let frame = read_frame(&path)?;
            let mut loaded = stat_records_from_frame(&frame, &path)?;
            debug!(
                "Loaded {} statistics records from {}",
                loaded.len(),
                path.display()
            );
            records.append(&mut loaded);
        }
        info!("Loaded {} statistics records", records.len());
        Ok(records)
    }
}

/// Read a CSV or Parquet file into a DataFrame
///
/// CSV columns are all read as strings so that state names and timestamps
/// reach the record conversion untouched.
pub fn read_frame(path: &Path) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some(CSV_EXTENSION) => {
            let frame = CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(0))
                .try_into_reader_with_file_path(Some(path.to_path_buf()))?
                .finish()?;
            Ok(frame)
        }
        Some(PARQUET_EXTENSION) => {
            let file = std::fs::File::open(path)?;
            let frame = ParquetReader::new(file).finish()?;
            Ok(frame)
        }
        _ => Err(MonitorError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Convert a police collection frame into records
pub fn police_records_from_frame(frame: &DataFrame, path: &Path) -> Result<Vec<PoliceRecord>> {
    let channels = required_string_column(frame, police_columns::CHANNEL, path)?;
    let states = optional_string_column(frame, police_columns::STATE, path);
    let reasons = optional_string_column(frame, police_columns::REASON, path);
    let timestamps = timestamp_column(frame, police_columns::CREATED_AT, path);

    let records = (0..frame.height())
        .map(|row| PoliceRecord {
            police_type: channels[row].clone().unwrap_or_default(),
            state: value_at(&states, row),
            reason: value_at(&reasons, row),
            created_at: timestamp_at(&timestamps, row),
        })
        .collect();
    Ok(records)
}

/// Convert a statistics collection frame into records
pub fn stat_records_from_frame(frame: &DataFrame, path: &Path) -> Result<Vec<StatRecord>> {
    let channels = required_string_column(frame, stat_columns::CHANNEL, path)?;
    let check_in = optional_string_column(frame, stat_columns::CHECK_IN_STATE, path);
    let check_out = optional_string_column(frame, stat_columns::CHECK_OUT_STATE, path);
    let check_in_details = optional_string_column(frame, stat_columns::CHECK_IN_DETAILS, path);
    let check_out_details = optional_string_column(frame, stat_columns::CHECK_OUT_DETAILS, path);
    let timestamps = timestamp_column(frame, stat_columns::CREATED_AT, path);

    let records = (0..frame.height())
        .map(|row| StatRecord {
            stat_type: channels[row].clone().unwrap_or_default(),
            status_check_in: value_at(&check_in, row),
            status_check_out: value_at(&check_out, row),
            status_check_in_details: value_at(&check_in_details, row),
            status_check_out_details: value_at(&check_out_details, row),
            created_at: timestamp_at(&timestamps, row),
        })
        .collect();
    Ok(records)
}

/// Group records by channel: state counts from the grouping query plus the
/// channel's documents, ordered by channel id
pub fn group_by_channel<R: OutcomeRecord>(records: Vec<R>) -> Result<Vec<ChannelSample<R>>> {
    let counts = {
        let mut channels = Vec::new();
        let mut states = Vec::new();
        for record in &records {
            for outcome in record.outcomes() {
                channels.push(record.channel_type());
                states.push(outcome.state);
            }
        }
        count_states_by_channel(channels, states)?
    };

    let mut samples: BTreeMap<String, ChannelSample<R>> = BTreeMap::new();
    for record in records {
        samples
            .entry(record.channel_type().to_string())
            .or_insert_with_key(|channel| ChannelSample::new(channel.clone()))
            .docs
            .push(record);
    }

    for (channel, channel_counts) in counts {
        samples
            .entry(channel.clone())
            .or_insert_with(|| ChannelSample::new(channel))
            .counts = channel_counts;
    }

    debug!("Grouped records into {} channels", samples.len());
    Ok(samples.into_values().collect())
}

/// Count occurrences per (channel, state) pair with a Polars group-by
pub fn count_states_by_channel(
    channels: Vec<&str>,
    states: Vec<&str>,
) -> Result<BTreeMap<String, StateCounts>> {
    let mut by_channel: BTreeMap<String, StateCounts> = BTreeMap::new();
    if channels.is_empty() {
        return Ok(by_channel);
    }

    let frame = DataFrame::new(vec![
        Column::new(grouped_columns::CHANNEL.into(), channels),
        Column::new(grouped_columns::STATE.into(), states),
    ])?;

    let grouped = frame
        .lazy()
        .group_by([col(grouped_columns::CHANNEL), col(grouped_columns::STATE)])
        .agg([len().alias(grouped_columns::COUNT)])
        .collect()?;

    let count_column = grouped
        .column(grouped_columns::COUNT)?
        .cast(&DataType::UInt64)?;
    let channel_values = grouped.column(grouped_columns::CHANNEL)?.str()?;
    let state_values = grouped.column(grouped_columns::STATE)?.str()?;
    let count_values = count_column.u64()?;

    for ((channel, state), count) in channel_values
        .into_iter()
        .zip(state_values)
        .zip(count_values)
    {
        by_channel
            .entry(channel.unwrap_or_default().to_string())
            .or_default()
            .add(state.unwrap_or_default(), count.unwrap_or(0));
    }

    Ok(by_channel)
}

type StringValues = Vec<Option<String>>;
type TimestampValues = Vec<Option<DateTime<Utc>>>;

fn string_values(column: &Column) -> PolarsResult<StringValues> {
    let column = column.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

/// Values of an optional column; absent or unreadable columns yield `None`
fn optional_string_column(frame: &DataFrame, name: &str, path: &Path) -> Option<StringValues> {
    let Ok(column) = frame.column(name) else {
        debug!("Column {} not present, treating values as absent", name);
        return None;
    };
    match string_values(column) {
        Ok(values) => Some(values),
        Err(e) => {
            warn!(
                "Column {} in {} could not be read as text and was ignored: {}",
                name,
                path.display(),
                e
            );
            None
        }
    }
}

fn required_string_column(frame: &DataFrame, name: &str, path: &Path) -> Result<StringValues> {
    let column = frame
        .column(name)
        .map_err(|_| MonitorError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })?;
    Ok(string_values(column)?)
}

/// Timestamps of an optional column
///
/// Native `Datetime` columns (with or without a time zone) are read from
/// their epoch values, `Date` columns as midnight UTC, anything else is
/// parsed as text. Values that cannot be converted become `None`.
fn timestamp_column(frame: &DataFrame, name: &str, path: &Path) -> Option<TimestampValues> {
    let column = frame.column(name).ok()?;
    let converted = match column.dtype() {
        DataType::Datetime(unit, _) => epoch_timestamps(column, *unit),
        DataType::Date => date_timestamps(column),
        _ => string_values(column).map(|values| text_timestamps(values, name, path)),
    };
    match converted {
        Ok(values) => Some(values),
        Err(e) => {
            warn!(
                "Column {} in {} could not be read as timestamps and was ignored: {}",
                name,
                path.display(),
                e
            );
            None
        }
    }
}

fn epoch_timestamps(column: &Column, unit: TimeUnit) -> PolarsResult<TimestampValues> {
    let physical = column.cast(&DataType::Int64)?;
    let values = physical
        .i64()?
        .into_iter()
        .map(|value| value.and_then(|value| from_epoch(value, unit)))
        .collect();
    Ok(values)
}

fn date_timestamps(column: &Column) -> PolarsResult<TimestampValues> {
    let days = column.cast(&DataType::Int32)?;
    let values = days
        .i32()?
        .into_iter()
        .map(|value| value.and_then(|days| DateTime::from_timestamp(i64::from(days) * 86_400, 0)))
        .collect();
    Ok(values)
}

fn text_timestamps(values: StringValues, name: &str, path: &Path) -> TimestampValues {
    let mut unparsable = 0;
    let timestamps = values
        .into_iter()
        .map(|value| {
            let raw = value.filter(|raw| !raw.is_empty())?;
            let parsed = parse_timestamp(&raw);
            if parsed.is_none() {
                unparsable += 1;
            }
            parsed
        })
        .collect();

    if unparsable > 0 {
        warn!(
            "{} {} values in {} could not be parsed and were ignored",
            unparsable,
            name,
            path.display()
        );
    }
    timestamps
}

/// Epoch value in the column's time unit as a UTC timestamp
fn from_epoch(value: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    }
}

fn value_at(values: &Option<StringValues>, row: usize) -> Option<String> {
    values
        .as_ref()
        .and_then(|values| values[row].clone())
        .filter(|value| !value.is_empty())
}

fn timestamp_at(values: &Option<TimestampValues>, row: usize) -> Option<DateTime<Utc>> {
    values.as_ref().and_then(|values| values[row])
}

/// Parse RFC 3339 timestamps, or naive `YYYY-MM-DD HH:MM:SS[.f]` values as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
