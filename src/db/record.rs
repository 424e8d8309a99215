use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use serde::Deserialize;

/// Completion state of a benchmark event, classified from its `reason`
/// field. Only completed measurements carry data worth charting; the
/// remaining reasons are warm-up or progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    Other,
}

impl Outcome {
    pub fn from_reason(reason: &str) -> Self {
        if reason == "benchmark-complete" {
            Self::Complete
        } else {
            Self::Other
        }
    }

    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }
}

/// Point estimate with confidence bounds for one completed run, mapped
/// verbatim from the record's `typical` object. Well-formed logs satisfy
/// `lower_bound <= estimate <= upper_bound`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Measurement {
    pub estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub unit: String,
}

// serde mirror of one log line; unknown fields are ignored and `id` and
// `typical` may legitimately be absent on non-complete events
#[derive(Debug, Deserialize)]
struct RawRecord {
    reason: String,
    id: Option<String>,
    typical: Option<Measurement>,
}

/// One completed benchmark measurement parsed from a log line.
#[derive(Debug, Clone)]
pub struct BenchmarkRecord {
    id: String,
    outcome: Outcome,
    measurement: Measurement,
}

impl BenchmarkRecord {
    /// Retrieves the benchmark id, e.g. `recover631/single recover`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }
}

/// Removes the literal backslash characters the log producer wraps around
/// the JSON blob; they are line-continuation noise with no semantic
/// meaning and must go before structural parsing.
pub fn sanitize(contents: &str) -> String {
    contents.replace('\\', "")
}

/// Parses one sanitized log line. `Ok(None)` means the line is a
/// well-formed event that is not a completed measurement; an `Err` means
/// the log is structurally broken and the run must abort.
pub fn parse_line(line: &str) -> Result<Option<BenchmarkRecord>, Report> {
    let raw: RawRecord =
        serde_json::from_str(line.trim()).wrap_err("invalid json record")?;

    let outcome = Outcome::from_reason(&raw.reason);
    if !outcome.is_complete() {
        return Ok(None);
    }

    let id = match raw.id {
        Some(id) => id,
        None => eyre::bail!("completed record without an id"),
    };
    let measurement = match raw.typical {
        Some(measurement) => measurement,
        None => {
            eyre::bail!("completed record {} without a typical measurement", id)
        }
    };
    Ok(Some(BenchmarkRecord {
        id,
        outcome,
        measurement,
    }))
}
