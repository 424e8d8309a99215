use crate::db::Measurement;
use crate::id::{DecodedKey, Variant};
use crate::metrics::F64;
use color_eyre::Report;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// One charted point: the x parameter value plus the scaled estimate and
/// confidence bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// One plotted line: a variant's measurements over the chart's x
/// parameter, for one combination of the remaining (fixed) parameters.
/// Points are ordered by ascending x.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    variant: Variant,
    fixed_params: Vec<u64>,
    points: Vec<Point>,
}

impl Series {
    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn fixed_params(&self) -> &[u64] {
        &self.fixed_params
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// What to do with a series that has fewer than two points and therefore
/// cannot be drawn as a connected line. Each chart opts in explicitly;
/// the default is to reject the build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SparsePolicy {
    /// Fail the build with a `SparseSeries` error.
    Reject,
    /// Leave the series out of the chart.
    Drop,
    /// Duplicate the single point at the given sentinel x so the series
    /// renders as a short flat segment. The sentinel must not collide
    /// with a real x value of the experiment.
    Pad { x: f64 },
}

/// A series with too few points to draw, surfaced when the chart did not
/// opt into padding or dropping.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseSeries {
    pub variant: Variant,
    pub fixed_params: Vec<u64>,
    pub points: usize,
}

impl fmt::Display for SparseSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "series {:?} with fixed parameters {:?} has {} point(s), too few to draw a line; pad or drop it explicitly",
            self.variant, self.fixed_params, self.points
        )
    }
}

impl std::error::Error for SparseSeries {}

/// Groups decoded measurements into one series per (variant, fixed
/// parameters) pair. Measurements accumulate in arrival order; ordering,
/// scaling and the sparse policy are applied when the builder is closed.
#[derive(Debug)]
pub struct SeriesBuilder {
    x_param: usize,
    scale: f64,
    buckets: BTreeMap<(Variant, Vec<u64>), BTreeMap<F64, Measurement>>,
}

impl SeriesBuilder {
    /// Creates a new builder charting the parameter at position `x_param`
    /// and converting units with the multiplicative `scale` factor.
    pub fn new(x_param: usize, scale: f64) -> Self {
        Self {
            x_param,
            scale,
            buckets: BTreeMap::new(),
        }
    }

    /// Files one measurement under its series bucket. The x parameter is
    /// removed from the decoded parameters; what remains identifies the
    /// series. A duplicate x within one bucket overwrites the earlier
    /// measurement, so a re-run later in the log wins.
    pub fn push(&mut self, key: DecodedKey, measurement: &Measurement) {
        let DecodedKey {
            variant,
            mut params,
        } = key;
        assert!(
            self.x_param < params.len(),
            "x parameter index {} out of range for {} decoded parameters",
            self.x_param,
            params.len()
        );
        let x = params.remove(self.x_param);
        self.buckets
            .entry((variant, params))
            .or_default()
            .insert(F64::new(x as f64), measurement.clone());
    }

    /// Closes the builder: orders each bucket by ascending x, applies the
    /// scale factor uniformly to the estimate and both bounds, and
    /// resolves buckets with fewer than two points per the sparse policy.
    pub fn into_series(self, policy: SparsePolicy) -> Result<Vec<Series>, Report> {
        let scale = self.scale;
        let mut all = Vec::with_capacity(self.buckets.len());

        for ((variant, fixed_params), bucket) in self.buckets {
            let mut points: Vec<_> = bucket
                .into_iter()
                .map(|(x, measurement)| Point {
                    x: x.value(),
                    estimate: measurement.estimate * scale,
                    lower_bound: measurement.lower_bound * scale,
                    upper_bound: measurement.upper_bound * scale,
                })
                .collect();

            if points.len() < 2 {
                match policy {
                    SparsePolicy::Reject => {
                        return Err(SparseSeries {
                            variant,
                            fixed_params,
                            points: points.len(),
                        }
                        .into());
                    }
                    SparsePolicy::Drop => {
                        warn!(
                            "[series] dropping {:?} with fixed parameters {:?}: only {} point(s)",
                            variant,
                            fixed_params,
                            points.len()
                        );
                        continue;
                    }
                    SparsePolicy::Pad { x } => {
                        // a bucket only exists after at least one push
                        let only = points[0];
                        points.push(Point { x, ..only });
                        points.sort_by_key(|point| F64::new(point.x));
                    }
                }
            }

            all.push(Series {
                variant,
                fixed_params,
                points,
            });
        }
        Ok(all)
    }
}
