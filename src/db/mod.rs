mod record;
mod results_db;

// Re-exports.
pub use record::{BenchmarkRecord, Measurement, Outcome};
pub use results_db::ResultsDB;
