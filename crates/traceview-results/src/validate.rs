use crate::result_set::{check_time, ResultSet};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use traceview_model::HopRecord;

pub const ADDRESS_KEY: &str = "IP Address";
pub const TIME_KEY: &str = "Time";
pub const ANOMALY_KEY: &str = "Anomaly";

/// A snapshot that exists but does not describe a hop sequence.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedSnapshot {
    #[error("snapshot is not a sequence of hop records")]
    NotASequence,
    #[error("hop {} is not a record", .index + 1)]
    NotARecord { index: usize },
    #[error("hop {} is missing field {field:?}", .index + 1)]
    MissingField { index: usize, field: &'static str },
    #[error("hop {} field {field:?} must be a {expected}", .index + 1)]
    WrongType {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
    #[error("hop {} has invalid time {value}", .index + 1)]
    InvalidTime { index: usize, value: f64 },
}

/// Result of reading the stored snapshot once at view load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    NoResults,
    Unavailable(MalformedSnapshot),
    Loaded(ResultSet),
}

pub fn validate_snapshot(value: &Value) -> Result<ResultSet, MalformedSnapshot> {
    let items = value.as_array().ok_or(MalformedSnapshot::NotASequence)?;

    let mut hops = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let fields = item
            .as_object()
            .ok_or(MalformedSnapshot::NotARecord { index })?;
        hops.push(parse_record(index, fields)?);
    }

    debug!(hops = hops.len(), "validated snapshot");
    ResultSet::new(hops)
}

/// Missing or unparsable text means there is nothing to show; JSON that
/// parses but fails validation is reported as unavailable.
pub fn load_snapshot(raw: Option<&str>) -> LoadOutcome {
    let Some(raw) = raw else {
        debug!("no stored snapshot");
        return LoadOutcome::NoResults;
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!("error parsing results: {err}");
            return LoadOutcome::NoResults;
        }
    };

    match validate_snapshot(&value) {
        Ok(results) if results.is_empty() => LoadOutcome::NoResults,
        Ok(results) => LoadOutcome::Loaded(results),
        Err(err) => {
            warn!("rejected snapshot: {err}");
            LoadOutcome::Unavailable(err)
        }
    }
}

fn parse_record(index: usize, fields: &Map<String, Value>) -> Result<HopRecord, MalformedSnapshot> {
    let address = field(index, fields, ADDRESS_KEY)?
        .as_str()
        .ok_or(MalformedSnapshot::WrongType {
            index,
            field: ADDRESS_KEY,
            expected: "string",
        })?;

    let time_ms = field(index, fields, TIME_KEY)?
        .as_f64()
        .ok_or(MalformedSnapshot::WrongType {
            index,
            field: TIME_KEY,
            expected: "number",
        })?;
    check_time(index, time_ms)?;

    let anomaly = field(index, fields, ANOMALY_KEY)?
        .as_bool()
        .ok_or(MalformedSnapshot::WrongType {
            index,
            field: ANOMALY_KEY,
            expected: "boolean",
        })?;

    Ok(HopRecord::new(address, time_ms, anomaly))
}

fn field<'a>(
    index: usize,
    fields: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Value, MalformedSnapshot> {
    fields
        .get(name)
        .ok_or(MalformedSnapshot::MissingField { index, field: name })
}
