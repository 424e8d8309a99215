use crate::db::record::{self, BenchmarkRecord, Measurement};
use crate::id::{DecodedKey, ExperimentSchema};
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use std::path::Path;
use tracing::trace;

/// In-memory database of the completed measurements found in one
/// benchmark log. Measurements are kept unscaled here; unit conversion
/// happens in the series builder so raw bounds stay available to any
/// other consumer of the same load.
#[derive(Debug)]
pub struct ResultsDB {
    records: Vec<BenchmarkRecord>,
}

impl ResultsDB {
    /// Loads a benchmark log: reads the whole file, strips the escape
    /// noise, and parses every line. Lines that are not completed
    /// measurements are skipped; a line that is not valid JSON aborts the
    /// load with the log path and line number.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Report> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("read benchmark log {}", path.display()))?;
        let contents = record::sanitize(&contents);

        let mut records = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            let parsed = record::parse_line(line).wrap_err_with(|| {
                format!("parse line {} of {}", index + 1, path.display())
            })?;
            match parsed {
                Some(record) => records.push(record),
                None => trace!(
                    "[results_db] line {} is not a completed measurement",
                    index + 1
                ),
            }
        }

        trace!(
            "[results_db] loaded {} measurements from {}",
            records.len(),
            path.display()
        );
        Ok(Self { records })
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Decodes every record under the given schema. Records from other
    /// experiment families or with unknown variants are skipped, never
    /// errors: logs hold several interleaved families by design.
    pub fn decode<'a>(
        &'a self,
        schema: &'a ExperimentSchema,
    ) -> impl Iterator<Item = (DecodedKey, &'a Measurement)> + 'a {
        self.records.iter().filter_map(move |record| {
            match schema.decode(record.id()) {
                Some(key) => Some((key, record.measurement())),
                None => {
                    trace!(
                        "[results_db] record {} does not belong to this experiment",
                        record.id()
                    );
                    None
                }
            }
        })
    }
}
